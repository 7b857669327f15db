//! Conflict records and resolution choices.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Item, ItemError, ItemId};

/// A divergence detected during a sync cycle.
///
/// Recorded when a local and a remote item share an id but differ in text or
/// category. The remote variant has already been written to the store by the
/// time a conflict is visible; `local` holds what was overwritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    /// The shared item id.
    pub id: ItemId,
    /// The local version before the sync cycle.
    pub local: Item,
    /// The fetched remote version.
    pub remote: Item,
}

impl Conflict {
    /// The variant selected by `choice`.
    pub fn variant(&self, choice: Choice) -> &Item {
        match choice {
            Choice::Local => &self.local,
            Choice::Remote => &self.remote,
        }
    }
}

/// Which side of a conflict to keep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Choice {
    /// Keep the pre-sync local version.
    Local,
    /// Keep the remote version (the default resolution).
    #[default]
    Remote,
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("local"),
            Self::Remote => f.write_str("remote"),
        }
    }
}

impl FromStr for Choice {
    type Err = ItemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "remote" | "server" => Ok(Self::Remote),
            other => Err(ItemError::InvalidChoice(other.to_string())),
        }
    }
}
