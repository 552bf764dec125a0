//! Clients for the two paths to the remote content repository.
//!
//! Reads for page loads go through the public mirror; writes (and the
//! pre-write revision fetch) go through the authenticated contents API.

mod mirror;
mod repo;

pub use mirror::MirrorClient;
pub use repo::{RemoteFile, RepoClient};
