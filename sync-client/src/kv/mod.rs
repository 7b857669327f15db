//! Key-value persistence for itemsync.
//!
//! The store treats durable storage as an abstract blob store: a handful of
//! string keys, each holding one serialized value. Backends:
//! - [`FileKv`]: one file per key, atomic replace via rename
//! - [`SqliteKv`]: a single `kv` table (WAL mode)
//! - [`MemoryKv`]: process-local; also the session-scoped store

mod file;
mod memory;
mod sqlite;

pub use file::FileKv;
pub use memory::MemoryKv;
pub use sqlite::SqliteKv;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use crate::config::{StorageBackend, StorageConfig};

/// Key holding the serialized item set.
pub const ITEMS_KEY: &str = "items";
/// Key holding the last selected category filter.
pub const SELECTED_CATEGORY_KEY: &str = "selected_category";
/// Key holding conflicts awaiting manual resolution.
pub const PENDING_CONFLICTS_KEY: &str = "pending_conflicts";
/// Session-store key holding the last displayed item.
pub const LAST_VIEWED_KEY: &str = "last_viewed";

/// Persistence errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem error.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Value could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Key contains characters the backend cannot store.
    #[error("invalid key: {0:?}")]
    InvalidKey(String),

    /// Write rejected by the backend.
    #[error("write failed: {0}")]
    WriteFailed(String),
}

/// Async key-value store.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Read a value; `Ok(None)` when the key was never written.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value. Readers never observe a partially written value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value; deleting a missing key succeeds.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Open the backend selected by `config`, resolving relative paths against
/// `data_dir`.
pub async fn open_kv(
    config: &StorageConfig,
    data_dir: &Path,
) -> Result<Arc<dyn KvStore>, StorageError> {
    let resolve = |default: &str| -> PathBuf {
        match &config.path {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => data_dir.join(path),
            None => data_dir.join(default),
        }
    };

    let kv: Arc<dyn KvStore> = match config.backend {
        StorageBackend::File => Arc::new(FileKv::open(resolve("store")).await?),
        StorageBackend::Sqlite => Arc::new(SqliteKv::new(&resolve("itemsync.db")).await?),
        StorageBackend::Memory => Arc::new(MemoryKv::new()),
    };
    tracing::debug!(backend = ?config.backend, "Opened key-value store");
    Ok(kv)
}

fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
