//! Persistence backends behind a single provider interface.
//!
//! A [`StorageProvider`] stores opaque JSON values under logical keys. The raw
//! operations are fallible; [`StorageExt`] layers the lenient typed API on top:
//! reads fall back to a default on any failure and writes log and swallow
//! errors, so nothing in this layer ever fails a caller's operation.

mod directory;
mod kv;
mod service;

pub use directory::{
    DirectoryHandle, DirectoryPicker, DirectoryProvider, FsDirectoryHandle, PermissionState,
};
pub use kv::KeyValueProvider;
pub use service::StorageService;

#[cfg(test)]
pub(crate) use directory::testing;

use crate::schema::{Schema, Typed};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{error, warn};

/// Logical keys of the persisted entries.
pub mod keys {
    /// JSON array of notes.
    pub const NOTES: &str = "notes-app-data";
    /// JSON array of tags.
    pub const TAGS: &str = "notes-app-tags";
    /// `"en"` or `"pt"`; settings provider only.
    pub const LANGUAGE: &str = "notes-app-language";
    /// `"local"` or `"files"`; settings provider only.
    pub const STORAGE_MODE: &str = "notes-app-storage-mode";
    /// Location of the selected directory; settings provider only.
    pub const FILE_HANDLE: &str = "notes-app-file-handle";
}

/// Errors raised by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage not ready: {0}")]
    NotInitialized(String),

    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("malformed JSON under key '{key}': {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// A persistence backend keyed by logical name.
pub trait StorageProvider {
    /// Short description used in log output.
    fn describe(&self) -> String;

    /// Prepares the backend before first use.
    fn init(&self) -> StorageResult<()>;

    /// Reads the value stored under `key`; `Ok(None)` when absent.
    fn read_value(&self, key: &str) -> StorageResult<Option<Value>>;

    /// Writes `value` under `key`, creating the entry if absent.
    fn write_value(&self, key: &str, value: &Value) -> StorageResult<()>;

    /// Deletes the entry under `key`. Removing an absent entry is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;

    /// Reports whether writes are currently permitted.
    fn has_permission(&self) -> StorageResult<bool>;

    /// Asks for write access; returns whether it was granted.
    fn request_permission(&self) -> StorageResult<bool>;
}

/// Lenient typed access on top of any [`StorageProvider`].
pub trait StorageExt {
    /// Reads and validates `key`, returning `default` on a missing key, read
    /// failure, parse error, or validation failure.
    fn get_with<T>(&self, key: &str, default: T, schema: &dyn Schema<T>) -> T;

    /// Reads `key` with plain decoding, returning `default` on any failure.
    fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get_with(key, default, &Typed::new())
    }

    /// Serializes and writes `value`, logging and swallowing failures.
    ///
    /// Returns true if the write reached the backend.
    fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool;
}

impl<P: StorageProvider + ?Sized> StorageExt for P {
    fn get_with<T>(&self, key: &str, default: T, schema: &dyn Schema<T>) -> T {
        match self.read_value(key) {
            Ok(Some(value)) => match schema.parse(value) {
                Ok(parsed) => parsed,
                Err(err) => {
                    warn!(key, backend = %self.describe(), error = %err, "discarding stored value that failed validation");
                    default
                }
            },
            Ok(None) => default,
            Err(err) => {
                error!(key, backend = %self.describe(), error = %err, "failed to read stored value");
                default
            }
        }
    }

    fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(err) => {
                error!(key, error = %err, "failed to serialize value");
                return false;
            }
        };
        match self.write_value(key, &value) {
            Ok(()) => true,
            Err(err) => {
                error!(key, backend = %self.describe(), error = %err, "failed to write stored value");
                false
            }
        }
    }
}
