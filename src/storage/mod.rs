//! Durable key-value storage used for favorites snapshots and the character
//! cache.
//!
//! Every backend is asynchronous and best effort: callers decide what a
//! failure means for them.

mod file;
mod memory;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{StorageBackend, StorageConfig};

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Errors produced by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error for key '{key}' at '{path}': {source}")]
    Io {
        key: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),

    #[error("Storage task failed: {0}")]
    Task(String),
}

/// Asynchronous `get`/`set`/`delete` over opaque byte values.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Returns `None` when the key has never been written or was deleted.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Replaces the whole value stored under `key`.
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError>;

    /// Removes `key`. Deleting an absent key succeeds.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}

/// Builds the backend selected in configuration.
pub fn open_storage(config: &StorageConfig) -> Arc<dyn KeyValueStorage> {
    match config.backend {
        StorageBackend::File => Arc::new(FileStorage::new(config.resolved_dir())),
        StorageBackend::Memory => Arc::new(MemoryStorage::new()),
    }
}

/// Rejects keys that could not be mapped to a single storage slot.
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    if key.is_empty() || key.len() > 200 || key.chars().any(char::is_control) {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}
