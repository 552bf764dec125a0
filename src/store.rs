//! Local content store: one JSON file per document key.
//!
//! Reads never fail the caller. A missing or unparsable file reads as
//! absent, and typed reads substitute a caller-supplied default.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Local key holding the data-version token.
pub const DATA_VERSION_KEY: &str = "livegigs_data_version";

/// Local key holding the bearer credential for the authenticated API.
pub const TOKEN_KEY: &str = "livegigs_token";

/// Persistent key/value store for JSON content documents.
#[derive(Clone, Debug)]
pub struct ContentStore {
    data_dir: PathBuf,
}

impl ContentStore {
    /// Creates a store rooted at a data directory.
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }

    /// Returns the file path for a store key.
    pub fn path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", key))
    }

    /// Reads the raw JSON value stored under a key.
    ///
    /// Returns `None` if the file doesn't exist or doesn't parse as
    /// JSON; a parse failure is logged and treated as absent.
    pub fn get_raw(&self, key: &str) -> Option<Value> {
        let path = self.path(key);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", path.display(), e);
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Stored content at {} is not valid JSON: {}", path.display(), e);
                None
            }
        }
    }

    /// Reads a typed value, substituting `default` when the stored value
    /// is absent or fails to parse into `T`.
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.get_raw(key) {
            Some(value) => match serde_json::from_value(value) {
                Ok(parsed) => parsed,
                Err(e) => {
                    tracing::warn!("Stored content for '{}' has unexpected shape: {}", key, e);
                    default
                }
            },
            None => default,
        }
    }

    /// Writes a value under a key.
    ///
    /// Creates the data directory if it doesn't exist.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        fs::create_dir_all(&self.data_dir)
            .map_err(|e| StoreError::IoError(self.data_dir.clone(), e))?;

        let path = self.path(key);
        let bytes = serde_json::to_vec_pretty(value)
            .map_err(|e| StoreError::SerializeError(key.to_string(), e))?;
        fs::write(&path, bytes).map_err(|e| StoreError::IoError(path, e))?;
        Ok(())
    }

    /// Removes a key. Missing keys are not an error.
    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::IoError(path, e)),
        }
    }

    /// Returns the stored data-version token, if any.
    pub fn data_version(&self) -> Option<String> {
        self.get_raw(DATA_VERSION_KEY)
            .and_then(|v| v.as_str().map(str::to_string))
    }

    /// Returns the stored bearer credential, if any.
    pub fn token(&self) -> Option<String> {
        self.get_raw(TOKEN_KEY)
            .and_then(|v| v.as_str().map(str::to_string))
            .filter(|t| !t.is_empty())
    }
}

/// Errors that can occur writing to the content store.
#[derive(Debug)]
pub enum StoreError {
    /// I/O error reading or writing a file.
    IoError(PathBuf, io::Error),
    /// Value could not be serialized to JSON.
    SerializeError(String, serde_json::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::IoError(path, e) => {
                write!(f, "I/O error for {}: {}", path.display(), e)
            }
            StoreError::SerializeError(key, e) => {
                write!(f, "Failed to serialize content for '{}': {}", key, e)
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::IoError(_, e) => Some(e),
            StoreError::SerializeError(_, e) => Some(e),
        }
    }
}
