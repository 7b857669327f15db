//! # sync-types
//!
//! Value types shared by every itemsync crate:
//! - [`ItemId`] - stable, opaque item identity
//! - [`Item`] - an immutable short text record with a category
//! - [`Conflict`] - a local/remote pair that diverged during a sync cycle
//! - [`Choice`] - which side of a conflict a user keeps
//! - [`ItemError`] - validation errors

#![warn(missing_docs)]
#![warn(clippy::all)]

mod conflict;
mod error;
mod ids;
mod item;

pub use conflict::{Choice, Conflict};
pub use error::ItemError;
pub use ids::ItemId;
pub use item::Item;
