//! Mock remote for testing.
//!
//! Allows queueing snapshots and capturing pushed items for verification.

use super::{RemoteAdapter, RemoteError};
use async_trait::async_trait;
use itemsync_types::Item;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Mock remote for testing.
///
/// `fetch_snapshot()` returns the next queued snapshot, falling back to the
/// sticky snapshot set with [`MockRemote::set_snapshot`] (empty by default).
#[derive(Debug, Default, Clone)]
pub struct MockRemote {
    inner: Arc<Mutex<MockRemoteInner>>,
}

#[derive(Debug, Default)]
struct MockRemoteInner {
    snapshot: Vec<Item>,
    queued: VecDeque<Vec<Item>>,
    pushed: Vec<Item>,
    fetches: usize,
    fetch_delay: Option<Duration>,
    fail_next_fetch: Option<String>,
    fail_next_push: Option<String>,
}

impl MockRemote {
    /// Create a mock remote with an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock remote whose every fetch returns `items`.
    pub fn with_snapshot(items: Vec<Item>) -> Self {
        let remote = Self::new();
        remote.set_snapshot(items);
        remote
    }

    /// Set the snapshot returned once the queue is empty.
    pub fn set_snapshot(&self, items: Vec<Item>) {
        self.lock().snapshot = items;
    }

    /// Queue a snapshot to be returned by the next `fetch_snapshot()` call.
    pub fn queue_snapshot(&self, items: Vec<Item>) {
        self.lock().queued.push_back(items);
    }

    /// Get all items that were pushed.
    pub fn pushed(&self) -> Vec<Item> {
        self.lock().pushed.clone()
    }

    /// Number of `fetch_snapshot()` calls so far, including failed ones.
    pub fn fetch_count(&self) -> usize {
        self.lock().fetches
    }

    /// Delay every fetch by `delay` (simulates a slow remote).
    pub fn set_fetch_delay(&self, delay: Duration) {
        self.lock().fetch_delay = Some(delay);
    }

    /// Cause the next `fetch_snapshot()` to fail with the given error.
    pub fn fail_next_fetch(&self, error: &str) {
        self.lock().fail_next_fetch = Some(error.to_string());
    }

    /// Cause the next `push_item()` to fail with the given error.
    pub fn fail_next_push(&self, error: &str) {
        self.lock().fail_next_push = Some(error.to_string());
    }

    fn lock(&self) -> MutexGuard<'_, MockRemoteInner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl RemoteAdapter for MockRemote {
    async fn fetch_snapshot(&self) -> Result<Vec<Item>, RemoteError> {
        let (result, delay) = {
            let mut inner = self.lock();
            inner.fetches += 1;
            let result = match inner.fail_next_fetch.take() {
                Some(error) => Err(RemoteError::Unavailable(error)),
                None => Ok(inner
                    .queued
                    .pop_front()
                    .unwrap_or_else(|| inner.snapshot.clone())),
            };
            (result, inner.fetch_delay)
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        result
    }

    async fn push_item(&self, item: &Item) -> Result<Item, RemoteError> {
        let mut inner = self.lock();

        // Check for forced failure
        if let Some(error) = inner.fail_next_push.take() {
            return Err(RemoteError::Unavailable(error));
        }

        inner.pushed.push(item.clone());
        Ok(item.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use itemsync_types::ItemId;

    fn item(id: &str) -> Item {
        Item::new(ItemId::new(id).unwrap(), "text", "Server", Utc::now()).unwrap()
    }

    #[tokio::test]
    async fn queued_snapshots_come_before_sticky_one() {
        let remote = MockRemote::with_snapshot(vec![item("sticky")]);
        remote.queue_snapshot(vec![item("q1")]);

        let first = remote.fetch_snapshot().await.unwrap();
        let second = remote.fetch_snapshot().await.unwrap();
        let third = remote.fetch_snapshot().await.unwrap();

        assert_eq!(first[0].id().as_str(), "q1");
        assert_eq!(second[0].id().as_str(), "sticky");
        assert_eq!(third[0].id().as_str(), "sticky");
        assert_eq!(remote.fetch_count(), 3);
    }

    #[tokio::test]
    async fn forced_fetch_failure_is_one_shot() {
        let remote = MockRemote::new();
        remote.fail_next_fetch("offline");

        assert!(matches!(
            remote.fetch_snapshot().await,
            Err(RemoteError::Unavailable(_))
        ));
        assert!(remote.fetch_snapshot().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn pushes_are_captured() {
        let remote = MockRemote::new();
        remote.fail_next_push("offline");

        assert!(remote.push_item(&item("a")).await.is_err());
        let accepted = remote.push_item(&item("b")).await.unwrap();

        assert_eq!(accepted.id().as_str(), "b");
        assert_eq!(remote.pushed().len(), 1);
    }

    #[tokio::test]
    async fn clones_share_state() {
        let remote = MockRemote::new();
        let handle = remote.clone();
        remote.push_item(&item("a")).await.unwrap();
        assert_eq!(handle.pushed().len(), 1);
    }
}
