//! Bundle and report types for save, import/export, and pull.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::documents::{Banner, CarouselSlide, Collaborator, DocKey, Event, Footer, Poster};
use crate::error::SyncError;

/// A successful remote write: the new revision marker and the data
/// version stamped for it.
#[derive(Debug, Clone)]
pub struct RemoteWrite {
    pub sha: String,
    pub data_version: String,
}

/// Outcome of one save operation.
///
/// By the time a `SaveOutcome` exists, the local write has already
/// landed: cache and local store hold the new document whatever
/// `remote` says. Only the remote step can fail.
#[derive(Debug)]
pub struct SaveOutcome {
    pub key: DocKey,
    pub remote: Result<RemoteWrite, SyncError>,
}

impl SaveOutcome {
    /// Whether the remote write succeeded.
    pub fn remote_ok(&self) -> bool {
        self.remote.is_ok()
    }
}

/// Per-field outcomes of an import (or reset).
///
/// Fields absent from the bundle are not attempted and don't appear.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub outcomes: Vec<SaveOutcome>,
}

impl ImportReport {
    /// Number of fields attempted.
    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    /// Whether every attempted field also persisted remotely.
    pub fn all_remote_ok(&self) -> bool {
        self.outcomes.iter().all(SaveOutcome::remote_ok)
    }

    /// The keys whose remote write failed, with the error.
    pub fn remote_failures(&self) -> Vec<(DocKey, &SyncError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.remote.as_ref().err().map(|e| (o.key, e)))
            .collect()
    }
}

/// A document key that failed during a pull, with the error.
#[derive(Debug)]
pub struct SyncFailure {
    pub key: DocKey,
    pub error: SyncError,
}

/// Aggregate result of a pull from the public mirror.
///
/// Keys absent on the mirror land in `missing`, which is not a failure:
/// nothing has been published for them yet and local content is left
/// untouched.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub synced: Vec<DocKey>,
    pub missing: Vec<DocKey>,
    pub failures: Vec<SyncFailure>,
}

/// The export/import bundle: every document, all optional, plus the
/// data version and export timestamp at the time of export.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ContentBundle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banners: Option<Vec<Banner>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posters_index: Option<Vec<Poster>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posters_cn: Option<Vec<Poster>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posters_events: Option<Vec<Poster>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<Event>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collaborators: Option<Vec<Collaborator>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer_global: Option<Footer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer_cn: Option<Footer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carousel: Option<Vec<CarouselSlide>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<DateTime<Utc>>,
}

impl ContentBundle {
    /// The bundle `reset` applies: every key at its default document.
    pub fn defaults() -> Self {
        Self {
            banners: Some(Vec::new()),
            posters_index: Some(Poster::placeholder_set()),
            posters_cn: Some(Poster::placeholder_set()),
            posters_events: Some(Poster::placeholder_set()),
            events: Some(Vec::new()),
            collaborators: Some(Vec::new()),
            footer_global: Some(Footer::site_default()),
            footer_cn: Some(Footer::site_default()),
            carousel: Some(Vec::new()),
            data_version: None,
            exported_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_bundle_serializes_to_empty_object() {
        let bundle = ContentBundle::default();
        let json = serde_json::to_string(&bundle).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn test_partial_bundle_roundtrip() {
        let bundle = ContentBundle {
            banners: Some(vec![Banner {
                image: "./image/b1.jpg".to_string(),
                ..Banner::default()
            }]),
            ..ContentBundle::default()
        };
        let json = serde_json::to_string(&bundle).unwrap();
        let parsed: ContentBundle = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.banners.unwrap().len(), 1);
        assert!(parsed.events.is_none());
        assert!(parsed.footer_cn.is_none());
    }

    #[test]
    fn test_defaults_bundle_covers_every_key() {
        let bundle = ContentBundle::defaults();
        assert!(bundle.banners.is_some());
        assert!(bundle.posters_index.is_some());
        assert!(bundle.posters_cn.is_some());
        assert!(bundle.posters_events.is_some());
        assert!(bundle.events.is_some());
        assert!(bundle.collaborators.is_some());
        assert!(bundle.footer_global.is_some());
        assert!(bundle.footer_cn.is_some());
        assert!(bundle.carousel.is_some());
        assert_eq!(bundle.posters_index.unwrap().len(), 3);
        assert_eq!(bundle.footer_cn.unwrap(), Footer::site_default());
    }

    #[test]
    fn test_unknown_bundle_fields_are_ignored() {
        let parsed: ContentBundle =
            serde_json::from_str(r#"{"banners": [], "legacy_field": 42}"#).unwrap();
        assert_eq!(parsed.banners.unwrap().len(), 0);
    }
}
