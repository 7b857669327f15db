//! Sync scheduler: serialized fetch → reconcile → persist cycles.
//!
//! At most one cycle runs at a time. A cycle started while another is in
//! flight returns [`CycleOutcome::AlreadyRunning`] instead of queueing.
//! Periodic cycles run on a spawned tokio task; stopping the schedule never
//! interrupts a cycle already in flight.

use itemsync_core::{reconcile, Banner, CycleFailure, CycleOutcome, StatusEvent, SyncStatus};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::client::ClientError;
use crate::ledger::ConflictLedger;
use crate::remote::RemoteAdapter;
use crate::store::ItemStore;

/// Drives sync cycles and publishes their status.
pub struct SyncScheduler<R> {
    inner: Arc<SchedulerInner<R>>,
    schedule: Mutex<Option<Schedule>>,
}

struct SchedulerInner<R> {
    remote: Arc<R>,
    store: ItemStore,
    ledger: Arc<ConflictLedger>,
    in_flight: AtomicBool,
    status: watch::Sender<SyncStatus>,
    last_banner: Mutex<Option<Banner>>,
}

struct Schedule {
    // Dropping the sender ends the loop after the current cycle
    _shutdown: watch::Sender<()>,
    handle: JoinHandle<()>,
}

/// Clears the in-flight flag when a cycle ends, however it ends.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<R: RemoteAdapter + 'static> SyncScheduler<R> {
    /// Create an idle scheduler.
    pub fn new(remote: Arc<R>, store: ItemStore, ledger: Arc<ConflictLedger>) -> Self {
        let (status, _) = watch::channel(SyncStatus::Idle);
        Self {
            inner: Arc::new(SchedulerInner {
                remote,
                store,
                ledger,
                in_flight: AtomicBool::new(false),
                status,
                last_banner: Mutex::new(None),
            }),
            schedule: Mutex::new(None),
        }
    }

    /// Run one cycle now and wait for it.
    pub async fn run_cycle_now(&self) -> CycleOutcome {
        self.inner.run_cycle().await
    }

    /// Run a cycle every `interval`, starting immediately.
    ///
    /// Any previous schedule is stopped first.
    pub fn start(&self, interval: Duration) -> Result<(), ClientError> {
        if interval.is_zero() {
            return Err(ClientError::InvalidInterval);
        }

        let mut schedule = self.lock_schedule();
        if schedule.take().is_some() {
            debug!("Replacing running sync schedule");
        }

        let (shutdown, mut shutdown_rx) = watch::channel(());
        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            let mut timer = tokio::time::interval(interval);
            timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    biased;
                    _ = shutdown_rx.changed() => break,
                    _ = timer.tick() => {}
                }
                inner.run_cycle().await;
            }
            debug!("Sync schedule stopped");
        });

        *schedule = Some(Schedule {
            _shutdown: shutdown,
            handle,
        });
        info!(interval_ms = interval.as_millis() as u64, "Sync schedule started");
        Ok(())
    }

    /// Stop scheduling cycles. A cycle in flight runs to completion.
    pub fn stop(&self) {
        if self.lock_schedule().take().is_some() {
            info!("Sync schedule stopping");
        }
    }

    /// True while a schedule is active.
    pub fn is_running(&self) -> bool {
        self.lock_schedule()
            .as_ref()
            .is_some_and(|schedule| !schedule.handle.is_finished())
    }

    /// True while a cycle is in flight.
    pub fn is_syncing(&self) -> bool {
        self.inner.in_flight.load(Ordering::Acquire)
    }

    /// Current status.
    pub fn status(&self) -> SyncStatus {
        self.inner.status.borrow().clone()
    }

    /// Receive every status change.
    pub fn subscribe(&self) -> watch::Receiver<SyncStatus> {
        self.inner.status.subscribe()
    }

    /// Banner for the most recent completed cycle.
    pub fn last_banner(&self) -> Option<Banner> {
        self.inner.lock_banner().clone()
    }

    /// Start from `IdleWithConflicts` when conflicts were restored from
    /// storage. Only applies while the status is `Idle`.
    pub fn restore_pending(&self, pending: usize) {
        if pending == 0 {
            return;
        }
        self.inner.status.send_if_modified(|status| match status {
            SyncStatus::Idle => {
                *status = SyncStatus::IdleWithConflicts { pending };
                true
            }
            _ => false,
        });
    }

    /// Record that the user resolved the pending conflicts.
    pub fn mark_conflicts_resolved(&self) {
        self.inner.publish(StatusEvent::ConflictsResolved);
    }

    fn lock_schedule(&self) -> MutexGuard<'_, Option<Schedule>> {
        self.schedule
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<R> Drop for SyncScheduler<R> {
    fn drop(&mut self) {
        if let Ok(mut schedule) = self.schedule.lock() {
            schedule.take();
        }
    }
}

impl<R: RemoteAdapter> SchedulerInner<R> {
    async fn run_cycle(&self) -> CycleOutcome {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Sync cycle already running");
            return CycleOutcome::AlreadyRunning;
        }
        let _guard = InFlightGuard(&self.in_flight);

        self.publish(StatusEvent::CycleStarted);
        let outcome = self.cycle().await;

        // Subscribers read the banner once they see the status change
        *self.lock_banner() = Banner::for_outcome(&outcome);
        if let Some(event) = outcome.status_event() {
            self.publish(event);
        }

        match &outcome {
            CycleOutcome::Failed(failure) => warn!(%failure, "Sync cycle failed"),
            other => info!(outcome = %other, "Sync cycle finished"),
        }
        outcome
    }

    async fn cycle(&self) -> CycleOutcome {
        let remote = match self.remote.fetch_snapshot().await {
            Ok(items) => items,
            Err(e) => {
                return CycleOutcome::Failed(CycleFailure::RemoteUnavailable(e.to_string()));
            }
        };

        // Merge under the store's write lock so concurrent local writes
        // are neither lost nor merged against a stale snapshot.
        let (conflicts, store_saved) = self
            .store
            .replace_with(|local| {
                let result = reconcile(local, &remote);
                (result.merged, result.conflicts)
            })
            .await;

        let count = conflicts.len();
        let ledger_saved = self.ledger.set_pending(conflicts).await;

        match store_saved.and(ledger_saved) {
            Ok(()) => CycleOutcome::from_conflicts(count),
            Err(e) => CycleOutcome::Failed(CycleFailure::Storage(e.to_string())),
        }
    }

    fn publish(&self, event: StatusEvent) {
        self.status
            .send_modify(|status| *status = std::mem::take(status).on_event(event));
    }

    fn lock_banner(&self) -> MutexGuard<'_, Option<Banner>> {
        self.last_banner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
