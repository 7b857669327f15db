//! # sync-client
//!
//! Client library for itemsync: an offline-first item collection that
//! periodically reconciles with a remote authoritative source.
//!
//! ## Features
//!
//! - **Write-through persistence**: every mutation is applied in memory and
//!   then saved to a pluggable key-value store (file, SQLite, memory)
//! - **Remote Abstraction**: pluggable remote endpoint (HTTP, mock)
//! - **Conflict Ledger**: auto-resolved conflicts stay available for manual
//!   override
//! - **Serialized Cycles**: a scheduler that never runs two sync cycles at once
//! - **Pure Core**: reconciliation and status logic come from sync-core
//!
//! ## Example
//!
//! ```ignore
//! use itemsync_client::{Config, MemoryKv, MockRemote, SyncClient};
//!
//! let client = SyncClient::builder(Config::default(), MockRemote::new())
//!     .kv(MemoryKv::shared())
//!     .build()
//!     .await;
//!
//! client.add_item("Stay hungry", "Motivation").await?;
//! let outcome = client.run_cycle_now().await;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod config;
pub mod kv;
pub mod ledger;
pub mod remote;
pub mod scheduler;
pub mod store;

pub use client::{AddOutcome, ClientError, SyncClient, SyncClientBuilder};
pub use config::{Config, ConfigError, RemoteConfig, StorageBackend, StorageConfig, SyncSettings};
pub use kv::{open_kv, FileKv, KvStore, MemoryKv, SqliteKv, StorageError};
pub use ledger::{ConflictLedger, ResolutionReport};
pub use remote::{
    normalize_records, HttpRemote, MockRemote, RecordError, RemoteAdapter, RemoteError,
    RemoteRecord,
};
pub use scheduler::SyncScheduler;
pub use store::{ItemStore, SessionState};
