//! Injectable capabilities: identifier generation and wall-clock time.
//!
//! Production code uses [`RandomIds`] and [`SystemClock`]; tests swap in
//! [`SequentialIds`] and [`FixedClock`] for deterministic output.

use chrono::{DateTime, Utc};
use itemsync_types::ItemId;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Source of fresh ids for locally created items.
pub trait IdGenerator: Send + Sync {
    /// Produce an id not produced before by this generator.
    fn next_id(&self) -> ItemId;
}

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// UUID v4 ids.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&self) -> ItemId {
        // A v4 UUID is never empty, so construction cannot fail.
        ItemId::new(uuid::Uuid::new_v4().to_string()).unwrap_or_else(|_| unreachable!())
    }
}

/// Deterministic ids: `{prefix}-1`, `{prefix}-2`, ...
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIds {
    /// Create a generator whose first id is `{prefix}-1`.
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            next: AtomicU64::new(1),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> ItemId {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        let prefix = if self.prefix.trim().is_empty() {
            "id"
        } else {
            self.prefix.as_str()
        };
        ItemId::new(format!("{}-{}", prefix, n)).unwrap_or_else(|_| unreachable!())
    }
}

/// The system wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that returns a settable instant.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    /// Create a clock frozen at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Move the clock to `now`.
    pub fn set(&self, now: DateTime<Utc>) {
        if let Ok(mut guard) = self.now.lock() {
            *guard = now;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        match self.now.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}
