//! The sync engine: local-first persistence with best-effort remote
//! writes.
//!
//! Every save lands in the in-memory cache and the local store first,
//! synchronously and unconditionally; the remote write happens after
//! and its result is reported separately in the [`SaveOutcome`]. The
//! data version advances only when a remote write succeeds, so readers
//! on other pages can use it to invalidate their own caches.
//!
//! The pre-write revision fetch and the write are two requests, not a
//! transaction: concurrent writers to the same key can race, and the
//! last writer wins. There is no retry-on-conflict.

use std::collections::HashMap;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};

use crate::config::Config;
use crate::documents::{
    Banner, CarouselSlide, Collaborator, DocKey, Event, Footer, FooterSite, Poster, PosterPage,
};
use crate::error::SyncError;
use crate::remote::{MirrorClient, RepoClient};
use crate::store::{ContentStore, DATA_VERSION_KEY};

use super::bundle::{ContentBundle, ImportReport, RemoteWrite, SaveOutcome, SyncFailure, SyncReport};

/// Orchestrates the local content store, the in-memory cache, and the
/// two remote clients. One instance per process; mutations take
/// `&mut self`, so callers serialize their own concurrent saves.
pub struct SyncEngine {
    store: ContentStore,
    repo: RepoClient,
    mirror: MirrorClient,
    cache: HashMap<DocKey, Value>,
    data_version: Option<String>,
}

impl SyncEngine {
    /// Creates an engine, populating the cache from the local store.
    pub fn new(store: ContentStore, repo: RepoClient, mirror: MirrorClient) -> Self {
        let mut cache = HashMap::new();
        for key in DocKey::ALL {
            if let Some(value) = store.get_raw(key.storage_key()) {
                cache.insert(key, value);
            }
        }
        let data_version = store.data_version();
        Self {
            store,
            repo,
            mirror,
            cache,
            data_version,
        }
    }

    /// Creates an engine from configuration.
    ///
    /// Token resolution order: environment (already applied by
    /// `Config::load`) > config file > token stored in the local store.
    pub fn from_config(config: &Config) -> Self {
        let store = ContentStore::new(config.data_dir.value.clone());
        let token = config.remote.token.clone().or_else(|| store.token());
        let repo = RepoClient::new(&config.remote, token);
        let mirror = MirrorClient::new(config.remote.public_base());
        Self::new(store, repo, mirror)
    }

    /// Returns the underlying content store.
    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    // ------------------------------------------------------------------
    // Accessors: synchronous reads against the cache, never network I/O.
    // ------------------------------------------------------------------

    pub fn get_banners(&self) -> Vec<Banner> {
        self.cached_or(DocKey::Banners, Vec::new())
    }

    pub fn get_posters(&self, page: PosterPage) -> Vec<Poster> {
        self.cached_or(page.doc_key(), Poster::placeholder_set())
    }

    pub fn get_events(&self) -> Vec<Event> {
        self.cached_or(DocKey::Events, Vec::new())
    }

    pub fn get_collaborators(&self) -> Vec<Collaborator> {
        self.cached_or(DocKey::Collaborators, Vec::new())
    }

    pub fn get_carousel(&self) -> Vec<CarouselSlide> {
        self.cached_or(DocKey::Carousel, Vec::new())
    }

    /// Returns the footer for a site.
    ///
    /// A missing footer key yields the site's stock footer; a stored
    /// value that fails to parse degrades to the generic empty skeleton
    /// at the store-bridge layer. The two defaults are deliberately
    /// different.
    pub fn get_footer(&self, site: FooterSite) -> Footer {
        let key = site.doc_key();
        match self.cache.get(&key) {
            Some(value) => match serde_json::from_value(value.clone()) {
                Ok(footer) => footer,
                Err(e) => {
                    tracing::warn!("Stored footer for '{}' has unexpected shape: {}", key, e);
                    Footer::default()
                }
            },
            None => Footer::site_default(),
        }
    }

    /// The current data-version token, if any remote write ever
    /// succeeded.
    pub fn get_data_version(&self) -> Option<String> {
        self.data_version.clone()
    }

    fn cached_or<T: DeserializeOwned>(&self, key: DocKey, default: T) -> T {
        match self.cache.get(&key) {
            Some(value) => match serde_json::from_value(value.clone()) {
                Ok(parsed) => parsed,
                Err(e) => {
                    tracing::warn!("Stored content for '{}' has unexpected shape: {}", key, e);
                    default
                }
            },
            None => default,
        }
    }

    // ------------------------------------------------------------------
    // Saves: write-through locally, then best-effort remote.
    // ------------------------------------------------------------------

    pub async fn save_banners(&mut self, banners: &[Banner]) -> SaveOutcome {
        self.save_document(DocKey::Banners, to_json(banners)).await
    }

    pub async fn save_posters(&mut self, page: PosterPage, posters: &[Poster]) -> SaveOutcome {
        self.save_document(page.doc_key(), to_json(posters)).await
    }

    pub async fn save_collaborators(&mut self, collaborators: &[Collaborator]) -> SaveOutcome {
        self.save_document(DocKey::Collaborators, to_json(collaborators))
            .await
    }

    pub async fn save_carousel(&mut self, slides: &[CarouselSlide]) -> SaveOutcome {
        self.save_document(DocKey::Carousel, to_json(slides)).await
    }

    pub async fn save_footer(&mut self, site: FooterSite, footer: &Footer) -> SaveOutcome {
        self.save_document(site.doc_key(), to_json(footer)).await
    }

    /// Saves the events sequence.
    ///
    /// Locally events are stored as a bare sequence, but the remote
    /// `events.json` is an envelope holding `posters`, `carousel`,
    /// `events` and `footer`; only the `events` field belongs to this
    /// operation, so the existing envelope is read first and written
    /// back with the siblings untouched.
    pub async fn save_events(&mut self, events: &[Event]) -> SaveOutcome {
        let key = DocKey::Events;
        let value = to_json(events);
        self.write_local(key, value.clone());

        let remote = self.push_events_remote(&value).await;
        if let Err(e) = &remote {
            tracing::warn!("Remote write for '{}' failed: {}", key, e);
        }
        SaveOutcome { key, remote }
    }

    async fn save_document(&mut self, key: DocKey, value: Value) -> SaveOutcome {
        self.write_local(key, value.clone());

        let remote = self.push_remote(key, &value).await;
        if let Err(e) = &remote {
            tracing::warn!("Remote write for '{}' failed: {}", key, e);
        }
        SaveOutcome { key, remote }
    }

    /// Updates cache and local store together. Cannot fail the caller;
    /// a store error is logged and the cache still updated.
    fn write_local(&mut self, key: DocKey, value: Value) {
        if let Err(e) = self.store.set(key.storage_key(), &value) {
            tracing::warn!("Local write for '{}' failed: {}", key, e);
        }
        self.cache.insert(key, value);
    }

    /// Read-then-write against the authenticated API: fetch the current
    /// revision marker (absent file means create), write, then stamp
    /// the data version.
    async fn push_remote(&mut self, key: DocKey, value: &Value) -> Result<RemoteWrite, SyncError> {
        let sha = self.repo.get_file(key).await?.map(|f| f.sha);
        let message = format!("Update {}", key.slug());
        let new_sha = self
            .repo
            .put_file(key, value, sha.as_deref(), &message)
            .await?;
        let data_version = self.advance_data_version();
        Ok(RemoteWrite {
            sha: new_sha,
            data_version,
        })
    }

    async fn push_events_remote(&mut self, events: &Value) -> Result<RemoteWrite, SyncError> {
        let key = DocKey::Events;
        let existing = self.repo.get_file(key).await?;
        let (mut envelope, sha) = match existing {
            Some(file) => {
                let sha = file.sha;
                match file.content {
                    Value::Object(map) => (map, Some(sha)),
                    _ => (empty_envelope(), Some(sha)),
                }
            }
            None => (empty_envelope(), None),
        };
        envelope.insert("events".to_string(), events.clone());

        let new_sha = self
            .repo
            .put_file(key, &Value::Object(envelope), sha.as_deref(), "Update events")
            .await?;
        let data_version = self.advance_data_version();
        Ok(RemoteWrite {
            sha: new_sha,
            data_version,
        })
    }

    /// Stamps a new data version after a successful remote write.
    ///
    /// Derived from wall-clock milliseconds, but never allowed to
    /// repeat or go backwards within one store.
    fn advance_data_version(&mut self) -> String {
        let now = Utc::now().timestamp_millis();
        let prev = self
            .data_version
            .as_deref()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(0);
        let next = now.max(prev + 1).to_string();

        if let Err(e) = self.store.set(DATA_VERSION_KEY, &Value::String(next.clone())) {
            tracing::warn!("Failed to persist data version: {}", e);
        }
        self.data_version = Some(next.clone());
        next
    }

    // ------------------------------------------------------------------
    // Bulk operations.
    // ------------------------------------------------------------------

    /// Assembles a bundle from every accessor. Pure read.
    pub fn export(&self) -> ContentBundle {
        ContentBundle {
            banners: Some(self.get_banners()),
            posters_index: Some(self.get_posters(PosterPage::Index)),
            posters_cn: Some(self.get_posters(PosterPage::Cn)),
            posters_events: Some(self.get_posters(PosterPage::Events)),
            events: Some(self.get_events()),
            collaborators: Some(self.get_collaborators()),
            footer_global: Some(self.get_footer(FooterSite::Global)),
            footer_cn: Some(self.get_footer(FooterSite::Cn)),
            carousel: Some(self.get_carousel()),
            data_version: self.get_data_version(),
            exported_at: Some(Utc::now()),
        }
    }

    /// Applies every field present in a bundle, sequentially.
    ///
    /// Absent fields are left untouched. The bundle's `data_version` is
    /// informational and never applied: the version only advances on
    /// successful remote writes.
    pub async fn import(&mut self, bundle: &ContentBundle) -> ImportReport {
        let mut report = ImportReport::default();

        if let Some(banners) = &bundle.banners {
            report.outcomes.push(self.save_banners(banners).await);
        }
        if let Some(posters) = &bundle.posters_index {
            report
                .outcomes
                .push(self.save_posters(PosterPage::Index, posters).await);
        }
        if let Some(posters) = &bundle.posters_cn {
            report
                .outcomes
                .push(self.save_posters(PosterPage::Cn, posters).await);
        }
        if let Some(posters) = &bundle.posters_events {
            report
                .outcomes
                .push(self.save_posters(PosterPage::Events, posters).await);
        }
        if let Some(events) = &bundle.events {
            report.outcomes.push(self.save_events(events).await);
        }
        if let Some(collaborators) = &bundle.collaborators {
            report
                .outcomes
                .push(self.save_collaborators(collaborators).await);
        }
        if let Some(footer) = &bundle.footer_global {
            report
                .outcomes
                .push(self.save_footer(FooterSite::Global, footer).await);
        }
        if let Some(footer) = &bundle.footer_cn {
            report
                .outcomes
                .push(self.save_footer(FooterSite::Cn, footer).await);
        }
        if let Some(slides) = &bundle.carousel {
            report.outcomes.push(self.save_carousel(slides).await);
        }

        report
    }

    /// Restores every document to its default.
    pub async fn reset(&mut self) -> ImportReport {
        self.import(&ContentBundle::defaults()).await
    }

    /// Pulls every known document from the public mirror, overwriting
    /// cache and local store. Pull only, never push: the authenticated
    /// path is not involved and the data version doesn't move.
    ///
    /// A key absent on the mirror is skipped and its local content left
    /// as it was.
    pub async fn sync_from_remote(&mut self) -> SyncReport {
        let mut report = SyncReport::default();

        for key in DocKey::ALL {
            match self.mirror.fetch(key).await {
                Ok(Some(value)) => {
                    let value = if key == DocKey::Events {
                        extract_events(value)
                    } else {
                        value
                    };
                    self.write_local(key, value);
                    report.synced.push(key);
                }
                Ok(None) => {
                    tracing::debug!("'{}' not published on mirror, skipping", key);
                    report.missing.push(key);
                }
                Err(error) => {
                    tracing::warn!("Mirror fetch for '{}' failed: {}", key, error);
                    report.failures.push(SyncFailure { key, error });
                }
            }
        }

        report
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

fn empty_envelope() -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("posters".to_string(), json!([]));
    map.insert("carousel".to_string(), json!([]));
    map.insert("footer".to_string(), json!({}));
    map
}

/// The mirror's events document may be a bare sequence or an envelope
/// with an `events` field; either way the sequence comes out.
fn extract_events(value: Value) -> Value {
    match value {
        Value::Array(_) => value,
        Value::Object(map) => map
            .get("events")
            .cloned()
            .unwrap_or_else(|| Value::Array(Vec::new())),
        _ => Value::Array(Vec::new()),
    }
}
