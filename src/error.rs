//! Error types for remote content operations.

use thiserror::Error;

/// Errors that can occur talking to the remote content repository.
///
/// A missing remote file is not an error: read paths model it as
/// `Ok(None)` so callers can treat "nothing published yet" as a normal
/// outcome.
#[derive(Error, Debug, Clone)]
pub enum SyncError {
    /// No access token is configured for the authenticated API.
    #[error("No access token configured. Run 'gigsync token set' or set GIGSYNC_TOKEN.")]
    MissingCredential,

    /// Transport-level failure (DNS, connect, timeout, malformed response).
    #[error("Network error: {0}")]
    Network(String),

    /// The remote API answered with a non-success status.
    #[error("Remote API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The remote payload could not be base64-decoded or parsed as JSON.
    #[error("Failed to decode remote content: {0}")]
    Decode(String),
}
