//! The item store: the single owner of the item collection.
//!
//! [`ItemStore`] is a cheap cloneable handle. Every mutation takes the write
//! lock, updates the in-memory set, and persists it before releasing the
//! lock, so readers never observe a half-applied change. Persistence is
//! write-through: when the save fails the in-memory state stays updated and
//! the caller receives the [`StorageError`].

use itemsync_core::{seed_items, Clock, IdGenerator, ItemSet};
use itemsync_types::{Item, ItemId};
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::kv::{KvStore, StorageError, ITEMS_KEY, LAST_VIEWED_KEY, SELECTED_CATEGORY_KEY};

/// Shared handle to the item collection.
#[derive(Clone)]
pub struct ItemStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    items: RwLock<ItemSet>,
    kv: Arc<dyn KvStore>,
}

impl std::fmt::Debug for ItemStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemStore").finish_non_exhaustive()
    }
}

impl ItemStore {
    /// Restore the persisted collection from `kv`.
    ///
    /// A missing or empty collection is replaced by the seed set, which is
    /// persisted. An unreadable or corrupt collection is also replaced by the
    /// seed set, but only in memory: the stored value is left for recovery
    /// until the next successful save.
    pub async fn load(kv: Arc<dyn KvStore>, ids: &dyn IdGenerator, clock: &dyn Clock) -> Self {
        let (items, persist_seed) = match kv.get(ITEMS_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<ItemSet>(&raw) {
                Ok(set) if !set.is_empty() => {
                    debug!(count = set.len(), "Restored item collection");
                    (set, false)
                }
                Ok(_) => (seed_items(ids, clock), true),
                Err(e) => {
                    warn!(error = %e, "Stored item collection is corrupt, using seed set");
                    (seed_items(ids, clock), false)
                }
            },
            Ok(None) => (seed_items(ids, clock), true),
            Err(e) => {
                warn!(error = %e, "Failed to read item collection, using seed set");
                (seed_items(ids, clock), false)
            }
        };

        let store = Self {
            inner: Arc::new(StoreInner {
                items: RwLock::new(items),
                kv,
            }),
        };

        if persist_seed {
            debug!("Seeding item collection");
            if let Err(e) = store.persist().await {
                warn!(error = %e, "Failed to persist seed set");
            }
        }
        store
    }

    /// Copy of the current collection.
    pub async fn snapshot(&self) -> ItemSet {
        self.inner.items.read().await.clone()
    }

    /// The item with `id`, if present.
    pub async fn get(&self, id: &ItemId) -> Option<Item> {
        self.inner.items.read().await.get(id).cloned()
    }

    /// Number of items.
    pub async fn len(&self) -> usize {
        self.inner.items.read().await.len()
    }

    /// True when the collection holds no items.
    pub async fn is_empty(&self) -> bool {
        self.inner.items.read().await.is_empty()
    }

    /// Sorted categories in use.
    pub async fn categories(&self) -> BTreeSet<String> {
        self.inner.items.read().await.categories()
    }

    /// Swap in a whole new collection and persist it.
    pub async fn replace_all(&self, items: ItemSet) -> Result<(), StorageError> {
        let mut guard = self.inner.items.write().await;
        *guard = items;
        self.save(&guard).await
    }

    /// Insert `item`, or replace the item with the same id in place.
    pub async fn upsert(&self, item: Item) -> Result<(), StorageError> {
        let mut guard = self.inner.items.write().await;
        guard.upsert(item);
        self.save(&guard).await
    }

    /// Replace each item whose id is already present; unknown ids are
    /// skipped. Returns the ids that were replaced. Persists even when
    /// nothing changed.
    pub async fn replace_existing(
        &self,
        items: impl IntoIterator<Item = Item>,
    ) -> (Vec<ItemId>, Result<(), StorageError>) {
        let mut guard = self.inner.items.write().await;
        let replaced = items
            .into_iter()
            .filter_map(|item| {
                let id = item.id().clone();
                guard.replace_existing(item).then_some(id)
            })
            .collect();
        let saved = self.save(&guard).await;
        (replaced, saved)
    }

    /// Compute a new collection from the current one and persist it, all
    /// under the write lock.
    ///
    /// `f` must not block; it runs while writers are excluded.
    pub async fn replace_with<T>(
        &self,
        f: impl FnOnce(&ItemSet) -> (ItemSet, T),
    ) -> (T, Result<(), StorageError>) {
        let mut guard = self.inner.items.write().await;
        let (next, extra) = f(&guard);
        *guard = next;
        let saved = self.save(&guard).await;
        (extra, saved)
    }

    /// Save the current collection again, e.g. after a failed write.
    pub async fn persist(&self) -> Result<(), StorageError> {
        let guard = self.inner.items.read().await;
        self.save(&guard).await
    }

    /// The remembered category filter.
    pub async fn selected_category(&self) -> Result<Option<String>, StorageError> {
        self.inner.kv.get(SELECTED_CATEGORY_KEY).await
    }

    /// Remember a category filter; `None` forgets it.
    pub async fn set_selected_category(&self, category: Option<&str>) -> Result<(), StorageError> {
        match category {
            Some(category) => self.inner.kv.set(SELECTED_CATEGORY_KEY, category).await,
            None => self.inner.kv.remove(SELECTED_CATEGORY_KEY).await,
        }
    }

    pub(crate) fn kv(&self) -> &Arc<dyn KvStore> {
        &self.inner.kv
    }

    async fn save(&self, items: &ItemSet) -> Result<(), StorageError> {
        let json = serde_json::to_string(items)?;
        self.inner.kv.set(ITEMS_KEY, &json).await.map_err(|e| {
            warn!(error = %e, count = items.len(), "Failed to persist item collection");
            e
        })
    }
}

/// State that lives only as long as the session store.
#[derive(Clone)]
pub struct SessionState {
    kv: Arc<dyn KvStore>,
}

impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionState").finish_non_exhaustive()
    }
}

impl SessionState {
    /// Wrap a session-scoped key-value store.
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    /// The most recently displayed item. A corrupt value reads as `None`.
    pub async fn last_viewed(&self) -> Result<Option<Item>, StorageError> {
        let Some(raw) = self.kv.get(LAST_VIEWED_KEY).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(item) => Ok(Some(item)),
            Err(e) => {
                debug!(error = %e, "Ignoring unreadable last viewed item");
                Ok(None)
            }
        }
    }

    /// Record the displayed item.
    pub async fn set_last_viewed(&self, item: &Item) -> Result<(), StorageError> {
        let json = serde_json::to_string(item)?;
        self.kv.set(LAST_VIEWED_KEY, &json).await
    }
}
