//! Authenticated client for the version-controlled content repository.
//!
//! Speaks the contents API: GET returns a base64-encoded body plus the
//! revision marker (sha) for the stored file; PUT writes a new revision
//! and must carry the current sha when updating an existing path,
//! otherwise the host creates a divergent object instead of revising in
//! place.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::header;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::RemoteConfig;
use crate::documents::DocKey;
use crate::error::SyncError;

const USER_AGENT: &str = concat!("gigsync/", env!("CARGO_PKG_VERSION"));

/// A file fetched from the authenticated API: its decoded JSON content
/// and the revision marker needed to overwrite it safely.
#[derive(Debug, Clone)]
pub struct RemoteFile {
    pub content: Value,
    pub sha: String,
}

/// GET response body from the contents API.
#[derive(Debug, Deserialize)]
struct ContentsResponse {
    content: String,
    sha: String,
}

/// PUT request body for the contents API.
#[derive(Debug, Serialize)]
struct PutRequest<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

/// PUT response body from the contents API.
#[derive(Debug, Deserialize)]
struct PutResponse {
    content: PutResponseContent,
}

#[derive(Debug, Deserialize)]
struct PutResponseContent {
    sha: String,
}

/// Error body the host returns on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ApiMessage {
    message: String,
}

/// Client for the authenticated read/write path.
#[derive(Clone, Debug)]
pub struct RepoClient {
    http: reqwest::Client,
    api_base: String,
    owner: String,
    repo: String,
    branch: String,
    content_dir: String,
    token: Option<String>,
}

impl RepoClient {
    /// Creates a client from remote configuration and a resolved token.
    ///
    /// A missing token is not an error here; every call will fail with
    /// `MissingCredential` without touching the network.
    pub fn new(remote: &RemoteConfig, token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: remote.api_base.trim_end_matches('/').to_string(),
            owner: remote.owner.clone(),
            repo: remote.repo.clone(),
            branch: remote.branch.clone(),
            content_dir: remote.content_dir.clone(),
            token: token.filter(|t| !t.is_empty()),
        }
    }

    /// Repository-relative path for a document key.
    pub fn file_path(&self, key: DocKey) -> String {
        format!("{}/{}.json", self.content_dir, key.slug())
    }

    /// Contents-API URL for a document key, path segments encoded.
    fn contents_url(&self, key: DocKey) -> String {
        let path: Vec<String> = self
            .file_path(key)
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_base,
            urlencoding::encode(&self.owner),
            urlencoding::encode(&self.repo),
            path.join("/")
        )
    }

    /// Fetches a document file and its revision marker.
    ///
    /// Returns `Ok(None)` when the path doesn't exist on the branch.
    pub async fn get_file(&self, key: DocKey) -> Result<Option<RemoteFile>, SyncError> {
        let token = self.token.as_ref().ok_or(SyncError::MissingCredential)?;

        let url = format!(
            "{}?ref={}",
            self.contents_url(key),
            urlencoding::encode(&self.branch)
        );
        tracing::debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| SyncError::Network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let body: ContentsResponse = response
            .json()
            .await
            .map_err(|e| SyncError::Network(e.to_string()))?;

        // The host folds the base64 body with newlines.
        let encoded: String = body.content.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = BASE64
            .decode(encoded)
            .map_err(|e| SyncError::Decode(e.to_string()))?;
        let content =
            serde_json::from_slice(&bytes).map_err(|e| SyncError::Decode(e.to_string()))?;

        Ok(Some(RemoteFile {
            content,
            sha: body.sha,
        }))
    }

    /// Writes a document file, revising in place when `sha` is given.
    ///
    /// Returns the new revision marker.
    pub async fn put_file(
        &self,
        key: DocKey,
        content: &Value,
        sha: Option<&str>,
        message: &str,
    ) -> Result<String, SyncError> {
        let token = self.token.as_ref().ok_or(SyncError::MissingCredential)?;

        let url = self.contents_url(key);
        tracing::debug!("PUT {} (sha: {})", url, sha.unwrap_or("none"));

        let serialized = serde_json::to_vec_pretty(content)
            .map_err(|e| SyncError::Decode(e.to_string()))?;
        let body = PutRequest {
            message,
            content: BASE64.encode(serialized),
            branch: &self.branch,
            sha,
        };

        let response = self
            .http
            .put(&url)
            .bearer_auth(token)
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::ACCEPT, "application/vnd.github+json")
            .json(&body)
            .send()
            .await
            .map_err(|e| SyncError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let body: PutResponse = response
            .json()
            .await
            .map_err(|e| SyncError::Network(e.to_string()))?;

        Ok(body.content.sha)
    }
}

/// Maps a non-2xx response to an API error, surfacing the host's own
/// message when it sent one.
async fn api_error(response: reqwest::Response) -> SyncError {
    let status = response.status().as_u16();
    let message = match response.json::<ApiMessage>().await {
        Ok(body) => body.message,
        Err(_) => "remote store returned no error message".to_string(),
    };
    SyncError::Api { status, message }
}
