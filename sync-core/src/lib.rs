//! # sync-core
//!
//! Pure logic for itemsync (no I/O, instant tests).
//!
//! This crate implements the reconciliation algorithm, conflict resolution
//! planning and the sync-cycle status machine without any network or disk
//! I/O, enabling fast unit tests.
//!
//! ## Design Philosophy
//!
//! All modules in this crate are **pure** - they take input and produce output
//! without side effects. Time and identifier generation are injected through
//! the [`Clock`] and [`IdGenerator`] capabilities so tests stay deterministic.
//!
//! The actual I/O (remote fetch, persistence, timers) is performed by
//! `sync-client`, which feeds inputs into these functions and applies their
//! results.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod capability;
pub mod item_set;
pub mod reconcile;
pub mod resolve;
pub mod seed;
pub mod status;

pub use capability::{Clock, FixedClock, IdGenerator, RandomIds, SequentialIds, SystemClock};
pub use item_set::{categories_of, pick_random, ItemSet, ALL_CATEGORIES};
pub use reconcile::{reconcile, Reconciliation};
pub use resolve::{plan_resolutions, ResolutionPlan};
pub use seed::seed_items;
pub use status::{
    Banner, CycleFailure, CycleOutcome, StatusEvent, SyncStatus, SYNCED_BANNER_MS,
};
