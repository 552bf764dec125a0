//! gigsync
//!
//! Content pipeline for the LIVEGIGS events site: an engine that keeps
//! a local JSON content store, an in-memory cache, and a remote
//! version-controlled content repository in sync, local-first with
//! best-effort remote persistence.

pub mod commands;
pub mod config;
pub mod documents;
pub mod error;
pub mod remote;
pub mod store;
pub mod sync;

pub use config::{Config, ConfigError, ConfigSource, ConfigValue, RemoteConfig};
pub use documents::{
    Banner, CarouselSlide, Collaborator, DocKey, Event, Footer, FooterSite, Poster, PosterPage,
    SocialLink,
};
pub use error::SyncError;
pub use remote::{MirrorClient, RemoteFile, RepoClient};
pub use store::{ContentStore, StoreError};
pub use sync::{
    ContentBundle, ImportReport, RemoteWrite, SaveOutcome, SyncEngine, SyncFailure, SyncReport,
};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
