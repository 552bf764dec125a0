//! The content sync engine and its result types.

mod bundle;
mod engine;

pub use bundle::{ContentBundle, ImportReport, RemoteWrite, SaveOutcome, SyncFailure, SyncReport};
pub use engine::SyncEngine;
