//! In-memory key-value store.
//!
//! Used for tests and as the session-scoped store, whose contents are
//! cleared on every restart. Supports failure injection for write-through
//! tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::{KvStore, StorageError};

/// In-memory key-value store. Clones share state.
#[derive(Debug, Default, Clone)]
pub struct MemoryKv {
    inner: Arc<Mutex<MemoryKvInner>>,
}

#[derive(Debug, Default)]
struct MemoryKvInner {
    values: HashMap<String, String>,
    fail_next_set: Option<String>,
    fail_all_sets: Option<String>,
    sets: usize,
}

impl MemoryKv {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store behind an `Arc<dyn KvStore>`.
    pub fn shared() -> Arc<dyn KvStore> {
        Arc::new(Self::new())
    }

    /// Cause the next `set()` to fail with the given error.
    pub fn fail_next_set(&self, error: &str) {
        self.lock().fail_next_set = Some(error.to_string());
    }

    /// Cause every `set()` to fail until [`MemoryKv::heal`] is called.
    pub fn fail_all_sets(&self, error: &str) {
        self.lock().fail_all_sets = Some(error.to_string());
    }

    /// Stop injecting failures.
    pub fn heal(&self) {
        let mut inner = self.lock();
        inner.fail_next_set = None;
        inner.fail_all_sets = None;
    }

    /// Read a value synchronously.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.lock().values.get(key).cloned()
    }

    /// Number of successful writes so far.
    pub fn set_count(&self) -> usize {
        self.lock().sets
    }

    fn lock(&self) -> MutexGuard<'_, MemoryKvInner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl KvStore for MemoryKv {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock().values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut inner = self.lock();

        if let Some(error) = inner.fail_next_set.take() {
            return Err(StorageError::WriteFailed(error));
        }
        if let Some(error) = inner.fail_all_sets.clone() {
            return Err(StorageError::WriteFailed(error));
        }

        inner.values.insert(key.to_string(), value.to_string());
        inner.sets += 1;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock().values.remove(key);
        Ok(())
    }
}
