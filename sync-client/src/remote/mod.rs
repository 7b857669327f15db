//! Remote endpoint abstraction.
//!
//! The remote is the authoritative source consulted by each sync cycle:
//! - `fetch_snapshot()` returns normalized items
//! - `push_item()` notifies the remote of a locally created item
//!
//! # Example
//!
//! ```ignore
//! let remote = MockRemote::new();
//! remote.set_snapshot(vec![server_item]);
//! let items = remote.fetch_snapshot().await?;
//! ```

mod http;
mod mock;

pub use http::HttpRemote;
pub use mock::MockRemote;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use itemsync_types::{Item, ItemError, ItemId};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Remote errors. Every variant means the remote is unavailable for this
/// cycle.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Transport failure (connect, DNS, reset).
    #[error("remote unavailable: {0}")]
    Unavailable(String),

    /// Non-success HTTP status.
    #[error("remote returned status {0}")]
    Status(u16),

    /// Response body is not a record list.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Request timed out.
    #[error("remote request timed out")]
    Timeout,
}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RemoteError::Timeout
        } else if let Some(status) = e.status() {
            RemoteError::Status(status.as_u16())
        } else if e.is_decode() {
            RemoteError::Malformed(e.to_string())
        } else {
            RemoteError::Unavailable(e.to_string())
        }
    }
}

/// The authoritative remote collection.
#[async_trait]
pub trait RemoteAdapter: Send + Sync {
    /// Fetch the current remote snapshot, already normalized.
    async fn fetch_snapshot(&self) -> Result<Vec<Item>, RemoteError>;

    /// Notify the remote of a newly created local item.
    ///
    /// Returns the accepted representation. Callers treat failure as
    /// non-fatal.
    async fn push_item(&self, item: &Item) -> Result<Item, RemoteError>;
}

#[async_trait]
impl<R: RemoteAdapter + ?Sized> RemoteAdapter for Arc<R> {
    async fn fetch_snapshot(&self) -> Result<Vec<Item>, RemoteError> {
        (**self).fetch_snapshot().await
    }

    async fn push_item(&self, item: &Item) -> Result<Item, RemoteError> {
        (**self).push_item(item).await
    }
}

/// Why a remote record was dropped from a snapshot.
#[derive(Debug, Error)]
pub enum RecordError {
    /// Record is not a JSON object.
    #[error("record is not an object")]
    NotAnObject,

    /// No usable `id`.
    #[error("record has no id")]
    MissingId,

    /// No `title` or `text`.
    #[error("record has no text")]
    MissingText,

    /// Fields present but invalid.
    #[error(transparent)]
    Invalid(#[from] ItemError),
}

/// A raw remote record before normalization.
///
/// Remote records carry `id` (number or string), `title` or `text`, and an
/// optional `category`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRecord {
    /// Remote identifier, rendered as a string.
    pub id: String,
    /// Record text.
    pub text: String,
    /// Category, if the remote supplied one.
    pub category: Option<String>,
}

impl RemoteRecord {
    /// Extract a record from a JSON value.
    pub fn from_value(value: &Value) -> Result<Self, RecordError> {
        let object = value.as_object().ok_or(RecordError::NotAnObject)?;

        let id = match object.get("id") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => return Err(RecordError::MissingId),
        };

        let text = ["title", "text"]
            .iter()
            .find_map(|field| object.get(*field).and_then(Value::as_str))
            .ok_or(RecordError::MissingText)?
            .to_string();

        let category = object
            .get("category")
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(Self { id, text, category })
    }

    /// Convert into an item stamped with `now`.
    ///
    /// A missing or blank category falls back to `default_category`.
    pub fn into_item(self, default_category: &str, now: DateTime<Utc>) -> Result<Item, RecordError> {
        let id = ItemId::new(self.id)?;
        let category = match self.category {
            Some(category) if !category.trim().is_empty() => category,
            _ => default_category.to_string(),
        };
        Ok(Item::new(id, self.text, category, now)?)
    }
}

/// Normalize a raw snapshot.
///
/// Takes the first `limit` records (0 means all), drops malformed ones with
/// a warning, and stamps the rest with `now`.
pub fn normalize_records(
    values: Vec<Value>,
    default_category: &str,
    limit: usize,
    now: DateTime<Utc>,
) -> Vec<Item> {
    let take = if limit == 0 { values.len() } else { limit };
    values
        .into_iter()
        .take(take)
        .enumerate()
        .filter_map(|(index, value)| {
            match RemoteRecord::from_value(&value)
                .and_then(|record| record.into_item(default_category, now))
            {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!(index, error = %e, "Dropping malformed remote record");
                    None
                }
            }
        })
        .collect()
}
