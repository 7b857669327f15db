//! Sync-cycle status machine for itemsync.
//!
//! A pure, side-effect-free state machine tracking whether a reconciliation
//! cycle is running and how the last one ended. The scheduler in
//! sync-client feeds it events and publishes the resulting status to
//! observers.
//!
//! ```text
//! Idle ──CycleStarted──► Syncing ──CycleSucceeded{0}──► Idle
//!                           │ ──CycleSucceeded{n}──► IdleWithConflicts
//!                           └ ──CycleFailed────────► IdleAfterError
//! ```

use std::fmt;

/// Observable scheduler status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    /// No cycle running; last cycle (if any) was clean.
    Idle,
    /// A cycle is in progress.
    Syncing,
    /// No cycle running; conflicts await optional manual resolution.
    IdleWithConflicts {
        /// Number of pending conflicts.
        pending: usize,
    },
    /// No cycle running; the last cycle failed.
    IdleAfterError {
        /// Why the last cycle failed.
        reason: String,
    },
}

impl SyncStatus {
    /// Create a status machine in the Idle state.
    pub fn new() -> Self {
        Self::Idle
    }

    /// Process an event and return the new status.
    ///
    /// Invalid transitions keep the current status.
    pub fn on_event(self, event: StatusEvent) -> Self {
        match (self, event) {
            // A new cycle supersedes whatever the previous one left behind
            (_, StatusEvent::CycleStarted) => Self::Syncing,

            (Self::Syncing, StatusEvent::CycleSucceeded { conflicts: 0 }) => Self::Idle,
            (Self::Syncing, StatusEvent::CycleSucceeded { conflicts }) => {
                Self::IdleWithConflicts { pending: conflicts }
            }
            (Self::Syncing, StatusEvent::CycleFailed { reason }) => {
                Self::IdleAfterError { reason }
            }

            (Self::IdleWithConflicts { .. }, StatusEvent::ConflictsResolved) => Self::Idle,

            (state, _) => state,
        }
    }

    /// True while a cycle is running.
    pub fn is_syncing(&self) -> bool {
        matches!(self, Self::Syncing)
    }

    /// Number of conflicts awaiting resolution according to this status.
    pub fn pending_conflicts(&self) -> usize {
        match self {
            Self::IdleWithConflicts { pending } => *pending,
            _ => 0,
        }
    }
}

impl Default for SyncStatus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Syncing => write!(f, "syncing"),
            Self::IdleWithConflicts { pending } => {
                write!(f, "idle ({} pending conflicts)", pending)
            }
            Self::IdleAfterError { reason } => write!(f, "idle after error: {}", reason),
        }
    }
}

/// Inputs to the status machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusEvent {
    /// A cycle acquired the in-flight guard.
    CycleStarted,
    /// A cycle finished; `conflicts` were auto-resolved.
    CycleSucceeded {
        /// Conflicts recorded by the cycle.
        conflicts: usize,
    },
    /// A cycle failed.
    CycleFailed {
        /// Failure description.
        reason: String,
    },
    /// All pending conflicts were resolved by the user.
    ConflictsResolved,
}

/// Why a cycle failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleFailure {
    /// Fetch failed; nothing changed.
    RemoteUnavailable(String),
    /// Merge applied in memory but could not be persisted.
    Storage(String),
}

impl fmt::Display for CycleFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RemoteUnavailable(reason) => write!(f, "remote unavailable: {}", reason),
            Self::Storage(reason) => write!(f, "storage error: {}", reason),
        }
    }
}

/// Result of one fetch → reconcile → persist cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Merged without conflicts.
    Synced,
    /// Merged; this many conflicts were auto-resolved in favour of the remote.
    SyncedWithConflicts(usize),
    /// The cycle failed.
    Failed(CycleFailure),
    /// Another cycle was already running; nothing was done.
    AlreadyRunning,
}

impl CycleOutcome {
    /// Outcome for a completed merge with `conflicts` conflicts.
    pub fn from_conflicts(conflicts: usize) -> Self {
        if conflicts == 0 {
            Self::Synced
        } else {
            Self::SyncedWithConflicts(conflicts)
        }
    }

    /// The status event this outcome produces, if any.
    pub fn status_event(&self) -> Option<StatusEvent> {
        match self {
            Self::Synced => Some(StatusEvent::CycleSucceeded { conflicts: 0 }),
            Self::SyncedWithConflicts(n) => Some(StatusEvent::CycleSucceeded { conflicts: *n }),
            Self::Failed(failure) => Some(StatusEvent::CycleFailed {
                reason: failure.to_string(),
            }),
            Self::AlreadyRunning => None,
        }
    }
}

impl fmt::Display for CycleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Synced => write!(f, "synced"),
            Self::SyncedWithConflicts(n) => write!(f, "synced with {} conflicts", n),
            Self::Failed(failure) => write!(f, "failed: {}", failure),
            Self::AlreadyRunning => write!(f, "already running"),
        }
    }
}

/// How long the clean-sync banner stays visible.
pub const SYNCED_BANNER_MS: u64 = 3000;

/// Banner projection for a presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    /// Message to show.
    pub message: String,
    /// Auto-dismiss delay; `None` keeps the banner until dismissed.
    pub auto_dismiss_ms: Option<u64>,
}

impl Banner {
    /// Banner for a cycle outcome. Failures are logged, not bannered.
    pub fn for_outcome(outcome: &CycleOutcome) -> Option<Self> {
        match outcome {
            CycleOutcome::Synced => Some(Self {
                message: "Synced with server.".to_string(),
                auto_dismiss_ms: Some(SYNCED_BANNER_MS),
            }),
            CycleOutcome::SyncedWithConflicts(n) => Some(Self {
                message: format!("{} conflicts auto-resolved (server version kept).", n),
                auto_dismiss_ms: None,
            }),
            CycleOutcome::Failed(_) | CycleOutcome::AlreadyRunning => None,
        }
    }
}
