//! SyncClient - the main interface for itemsync.
//!
//! This module provides [`SyncClient`], which wires the item store, the
//! conflict ledger, the scheduler and a remote together.
//!
//! # Architecture
//!
//! Reconciliation and status logic are pure functions from sync-core; the
//! client performs the I/O around them.
//!
//! ```text
//! Application → SyncClient → RemoteAdapter → Network
//!                   ↓
//!              ItemStore → KvStore → Disk
//! ```
//!
//! # Example
//!
//! ```ignore
//! use itemsync_client::{Config, MockRemote, SyncClient};
//!
//! let client = SyncClient::builder(Config::default(), MockRemote::new())
//!     .data_dir("/tmp/itemsync")
//!     .build()
//!     .await?;
//!
//! let added = client.add_item("Stay hungry", "Motivation").await?;
//! let outcome = client.run_cycle_now().await;
//! ```

use itemsync_core::{
    pick_random, Banner, Clock, CycleOutcome, IdGenerator, ItemSet, RandomIds, SyncStatus,
    SystemClock,
};
use itemsync_types::{Choice, Conflict, Item, ItemError, ItemId};
use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::{Config, ConfigError};
use crate::kv::{open_kv, KvStore, MemoryKv, StorageError};
use crate::ledger::{ConflictLedger, ResolutionReport};
use crate::remote::{RemoteAdapter, RemoteError};
use crate::scheduler::SyncScheduler;
use crate::store::{ItemStore, SessionState};

/// Client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Item failed validation.
    #[error("invalid item: {0}")]
    Item(#[from] ItemError),

    /// Persistence error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Remote error.
    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Polling interval must be positive.
    #[error("sync interval must be greater than zero")]
    InvalidInterval,
}

/// Result of [`SyncClient::add_item`].
///
/// The item is committed in memory whenever this is returned; persistence
/// and the remote push are reported separately.
#[derive(Debug)]
pub struct AddOutcome {
    /// The created item.
    pub item: Item,
    /// Whether the remote accepted the push.
    pub pushed: bool,
    /// Set when the item could not be persisted.
    pub persist_error: Option<StorageError>,
}

/// Builder for [`SyncClient`].
pub struct SyncClientBuilder<R> {
    config: Config,
    remote: R,
    data_dir: PathBuf,
    kv: Option<Arc<dyn KvStore>>,
    session_kv: Option<Arc<dyn KvStore>>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl<R: RemoteAdapter + 'static> SyncClientBuilder<R> {
    /// Directory against which relative storage paths resolve
    /// (default: current directory).
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Use `kv` instead of the configured storage backend.
    pub fn kv(mut self, kv: Arc<dyn KvStore>) -> Self {
        self.kv = Some(kv);
        self
    }

    /// Use `kv` as the session store (default: fresh in-memory store).
    pub fn session_kv(mut self, kv: Arc<dyn KvStore>) -> Self {
        self.session_kv = Some(kv);
        self
    }

    /// Set the id generator for new items.
    pub fn ids(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Set the clock.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Open storage, restore state and assemble the client.
    pub async fn build(self) -> Result<SyncClient<R>, ClientError> {
        let kv = match self.kv {
            Some(kv) => kv,
            None => open_kv(&self.config.storage, &self.data_dir).await?,
        };
        let session_kv = self.session_kv.unwrap_or_else(MemoryKv::shared);

        let store = ItemStore::load(kv, self.ids.as_ref(), self.clock.as_ref()).await;
        let ledger = Arc::new(ConflictLedger::load(store.clone()).await);
        let remote = Arc::new(self.remote);
        let scheduler = SyncScheduler::new(Arc::clone(&remote), store.clone(), Arc::clone(&ledger));
        let pending = ledger.pending_count().await;
        scheduler.restore_pending(pending);

        debug!(items = store.len().await, pending, "Client opened");
        Ok(SyncClient {
            config: self.config,
            remote,
            store,
            ledger,
            scheduler,
            session: SessionState::new(session_kv),
            ids: self.ids,
            clock: self.clock,
        })
    }
}

/// The main sync client.
///
/// Owns the item store, conflict ledger and scheduler for one collection.
pub struct SyncClient<R: RemoteAdapter + 'static> {
    config: Config,
    remote: Arc<R>,
    store: ItemStore,
    ledger: Arc<ConflictLedger>,
    scheduler: SyncScheduler<R>,
    session: SessionState,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl<R: RemoteAdapter + 'static> SyncClient<R> {
    /// Start building a client.
    pub fn builder(config: Config, remote: R) -> SyncClientBuilder<R> {
        SyncClientBuilder {
            config,
            remote,
            data_dir: PathBuf::from("."),
            kv: None,
            session_kv: None,
            ids: Arc::new(RandomIds),
            clock: Arc::new(SystemClock),
        }
    }

    /// Open a client with the configured storage under `data_dir`.
    pub async fn open(
        config: Config,
        remote: R,
        data_dir: impl Into<PathBuf>,
    ) -> Result<Self, ClientError> {
        Self::builder(config, remote).data_dir(data_dir).build().await
    }

    /// The active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The item store.
    pub fn store(&self) -> &ItemStore {
        &self.store
    }

    /// Create an item, commit it locally, then push it to the remote.
    ///
    /// A failed push is logged and never retried; the next sync cycle
    /// reconciles the item once the remote knows it.
    pub async fn add_item(
        &self,
        text: &str,
        category: &str,
    ) -> Result<AddOutcome, ClientError> {
        let item = Item::new(self.ids.next_id(), text, category, self.clock.now())?;

        let persist_error = self.store.upsert(item.clone()).await.err();

        let pushed = match self.remote.push_item(&item).await {
            Ok(_) => true,
            Err(e) => {
                warn!(id = %item.id(), error = %e, "Failed to push new item");
                false
            }
        };

        info!(id = %item.id(), category = item.category(), pushed, "Added item");
        Ok(AddOutcome {
            item,
            pushed,
            persist_error,
        })
    }

    /// All items, in store order.
    pub async fn items(&self) -> ItemSet {
        self.store.snapshot().await
    }

    /// Items in `category` (`None` or `"all"` for every item).
    pub async fn items_in(&self, category: Option<&str>) -> Vec<Item> {
        self.store
            .snapshot()
            .await
            .filter_category(category)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Sorted categories in use.
    pub async fn categories(&self) -> BTreeSet<String> {
        self.store.categories().await
    }

    /// Pick a random item from `category` and remember it as last viewed.
    pub async fn show_random(&self, category: Option<&str>) -> Option<Item> {
        let items = self.store.snapshot().await;
        let picked = pick_random(&items, category, &mut rand::thread_rng()).cloned()?;

        if let Err(e) = self.session.set_last_viewed(&picked).await {
            warn!(error = %e, "Failed to record last viewed item");
        }
        Some(picked)
    }

    /// The item most recently returned by [`SyncClient::show_random`] in
    /// this session.
    pub async fn last_viewed(&self) -> Result<Option<Item>, ClientError> {
        Ok(self.session.last_viewed().await?)
    }

    /// Remember the category filter; `None` clears it.
    pub async fn select_category(&self, category: Option<&str>) -> Result<(), ClientError> {
        Ok(self.store.set_selected_category(category).await?)
    }

    /// The remembered category filter.
    pub async fn selected_category(&self) -> Result<Option<String>, ClientError> {
        Ok(self.store.selected_category().await?)
    }

    /// Run one sync cycle and wait for it.
    pub async fn run_cycle_now(&self) -> CycleOutcome {
        self.scheduler.run_cycle_now().await
    }

    /// Poll the remote every `interval`, replacing any running schedule.
    pub fn start_polling(&self, interval: Duration) -> Result<(), ClientError> {
        self.scheduler.start(interval)
    }

    /// Start polling at the configured interval if `[sync] enabled` is set.
    /// Returns whether polling started.
    pub fn start_configured_polling(&self) -> Result<bool, ClientError> {
        if !self.config.sync.enabled {
            debug!("Periodic sync disabled by configuration");
            return Ok(false);
        }
        self.scheduler.start(self.config.sync.interval())?;
        Ok(true)
    }

    /// Stop polling. A cycle in flight completes.
    pub fn stop_polling(&self) {
        self.scheduler.stop();
    }

    /// True while a polling schedule is active.
    pub fn is_polling(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Current sync status.
    pub fn status(&self) -> SyncStatus {
        self.scheduler.status()
    }

    /// Receive every status change.
    pub fn subscribe(&self) -> watch::Receiver<SyncStatus> {
        self.scheduler.subscribe()
    }

    /// Banner for the last completed cycle.
    pub fn last_banner(&self) -> Option<Banner> {
        self.scheduler.last_banner()
    }

    /// Conflicts auto-resolved by the last cycle.
    pub async fn pending_conflicts(&self) -> Vec<Conflict> {
        self.ledger.list_pending().await
    }

    /// Apply user choices to the pending conflicts.
    pub async fn apply_resolutions(
        &self,
        choices: &HashMap<ItemId, Choice>,
    ) -> Result<ResolutionReport, ClientError> {
        match self.ledger.apply_resolutions(choices).await {
            Ok(report) => {
                if report.cleared {
                    self.scheduler.mark_conflicts_resolved();
                }
                Ok(report)
            }
            Err(e) => {
                // The pending list is cleared even when persisting fails
                self.scheduler.mark_conflicts_resolved();
                Err(e.into())
            }
        }
    }
}
