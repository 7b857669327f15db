//! Conflict ledger: conflicts auto-resolved by the last sync cycle.
//!
//! Each cycle replaces the pending list wholesale; unresolved conflicts from
//! an earlier cycle are discarded. The list is persisted under
//! `pending_conflicts` so a later process can still review it.

use itemsync_core::plan_resolutions;
use itemsync_types::{Choice, Conflict, ItemId};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::kv::{StorageError, PENDING_CONFLICTS_KEY};
use crate::store::ItemStore;

/// What `apply_resolutions` did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionReport {
    /// Ids whose chosen variant was written to the store.
    pub applied: Vec<ItemId>,
    /// Choice ids that matched no pending conflict.
    pub ignored: Vec<ItemId>,
    /// Whether the pending list was cleared.
    pub cleared: bool,
}

/// Pending conflicts plus the store they resolve into.
#[derive(Debug)]
pub struct ConflictLedger {
    store: ItemStore,
    pending: Mutex<Vec<Conflict>>,
}

impl ConflictLedger {
    /// Create an empty ledger.
    pub fn new(store: ItemStore) -> Self {
        Self {
            store,
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Restore the persisted pending list. Unreadable data yields an empty
    /// list.
    pub async fn load(store: ItemStore) -> Self {
        let pending: Vec<Conflict> = match store.kv().get(PENDING_CONFLICTS_KEY).await {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "Stored conflicts are corrupt, starting empty");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read stored conflicts");
                Vec::new()
            }
        };
        Self {
            store,
            pending: Mutex::new(pending),
        }
    }

    /// Replace the pending list.
    ///
    /// The in-memory list is replaced even when persisting it fails.
    pub async fn set_pending(&self, conflicts: Vec<Conflict>) -> Result<(), StorageError> {
        let mut pending = self.pending.lock().await;
        if !pending.is_empty() {
            debug!(discarded = pending.len(), "Superseding unresolved conflicts");
        }
        *pending = conflicts;
        self.save(&pending).await
    }

    /// Copy of the pending list.
    pub async fn list_pending(&self) -> Vec<Conflict> {
        self.pending.lock().await.clone()
    }

    /// Number of pending conflicts.
    pub async fn pending_count(&self) -> usize {
        self.pending.lock().await.len()
    }

    /// Write each chosen variant back to the store, then clear the pending
    /// list.
    ///
    /// Conflicts without a choice keep the remote variant already stored.
    /// Choices for unknown ids are ignored; when every choice is unknown the
    /// ledger and store are left untouched. Otherwise the store is persisted.
    /// On a storage failure both in-memory changes still apply and the first
    /// error is returned.
    pub async fn apply_resolutions(
        &self,
        choices: &HashMap<ItemId, Choice>,
    ) -> Result<ResolutionReport, StorageError> {
        let mut pending = self.pending.lock().await;
        let plan = plan_resolutions(&pending, choices);
        for id in &plan.ignored {
            debug!(id = %id, "Ignoring choice for unknown conflict");
        }
        if !choices.is_empty() && plan.writes.is_empty() {
            info!(
                ignored = plan.ignored.len(),
                pending = pending.len(),
                "No choice matched a pending conflict, keeping ledger"
            );
            return Ok(ResolutionReport {
                applied: Vec::new(),
                ignored: plan.ignored,
                cleared: false,
            });
        }

        let (applied, store_saved) = self.store.replace_existing(plan.writes).await;
        pending.clear();
        let ledger_saved = self.save(&pending).await;

        info!(
            applied = applied.len(),
            ignored = plan.ignored.len(),
            "Applied conflict resolutions"
        );
        store_saved?;
        ledger_saved?;
        Ok(ResolutionReport {
            applied,
            ignored: plan.ignored,
            cleared: true,
        })
    }

    async fn save(&self, pending: &[Conflict]) -> Result<(), StorageError> {
        let kv = self.store.kv();
        if pending.is_empty() {
            kv.remove(PENDING_CONFLICTS_KEY).await
        } else {
            kv.set(PENDING_CONFLICTS_KEY, &serde_json::to_string(pending)?)
                .await
        }
    }
}
