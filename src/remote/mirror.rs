//! Unauthenticated client for the public content mirror.
//!
//! The mirror exists so page loads can read content without auth
//! headers or cross-origin trouble. It only ever serves reads.

use reqwest::header;
use serde_json::Value;

use crate::documents::DocKey;
use crate::error::SyncError;

const USER_AGENT: &str = concat!("gigsync/", env!("CARGO_PKG_VERSION"));

/// Client for the public read path.
#[derive(Clone, Debug)]
pub struct MirrorClient {
    http: reqwest::Client,
    public_base: String,
}

impl MirrorClient {
    /// Creates a client for a public mirror base URL.
    pub fn new(public_base: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            public_base: public_base.trim_end_matches('/').to_string(),
        }
    }

    /// Mirror URL for a document key.
    fn url(&self, key: DocKey) -> String {
        format!("{}/{}.json", self.public_base, key.slug())
    }

    /// Fetches a document from the mirror.
    ///
    /// Returns `Ok(None)` when the document hasn't been published yet.
    pub async fn fetch(&self, key: DocKey) -> Result<Option<Value>, SyncError> {
        let url = self.url(key);
        tracing::debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .header(header::USER_AGENT, USER_AGENT)
            .send()
            .await
            .map_err(|e| SyncError::Network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(SyncError::Api {
                status: response.status().as_u16(),
                message: format!("mirror returned status {}", response.status()),
            });
        }

        let content = response
            .json()
            .await
            .map_err(|e| SyncError::Decode(e.to_string()))?;
        Ok(Some(content))
    }
}
