//! Three-way reconciliation of a local item set against a remote snapshot.
//!
//! Policy: the remote wins every content divergence, and each overwritten
//! local version is reported as a [`Conflict`] so a user can restore it
//! later. The function is pure: the same inputs always produce the same
//! output.
//!
//! Merge order:
//! 1. remote-derived entries, in remote order (local copy when content is
//!    identical, remote copy otherwise, including server-introduced items)
//! 2. local-only entries, in their original relative order

use itemsync_types::{Conflict, Item, ItemId};
use std::collections::{HashMap, HashSet};

use crate::ItemSet;

/// The result of one reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// The new authoritative item set.
    pub merged: ItemSet,
    /// One entry per id whose content differed, in remote order.
    pub conflicts: Vec<Conflict>,
}

impl Reconciliation {
    /// True when no conflicts were detected.
    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Number of detected conflicts.
    pub fn conflict_count(&self) -> usize {
        self.conflicts.len()
    }
}

/// Merge `remote` into `local`.
///
/// A remote id repeated within the snapshot is merged only at its first
/// occurrence.
pub fn reconcile(local: &ItemSet, remote: &[Item]) -> Reconciliation {
    let mut unmatched: HashMap<&ItemId, &Item> =
        local.iter().map(|item| (item.id(), item)).collect();
    let mut consumed: HashSet<&ItemId> = HashSet::with_capacity(remote.len());

    let mut merged = Vec::with_capacity(local.len() + remote.len());
    let mut conflicts = Vec::new();

    for r in remote {
        if !consumed.insert(r.id()) {
            continue;
        }

        match unmatched.remove(r.id()) {
            // Server-introduced
            None => merged.push(r.clone()),
            // Identical content: keep the local copy to avoid timestamp churn
            Some(l) if l.same_content(r) => merged.push(l.clone()),
            Some(l) => {
                conflicts.push(Conflict {
                    id: r.id().clone(),
                    local: l.clone(),
                    remote: r.clone(),
                });
                merged.push(r.clone());
            }
        }
    }

    // Local-only items keep their relative order
    merged.extend(
        local
            .iter()
            .filter(|item| unmatched.contains_key(item.id()))
            .cloned(),
    );

    Reconciliation {
        merged: ItemSet::from_items(merged),
        conflicts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn item_at(id: &str, text: &str, category: &str, secs: i64) -> Item {
        Item::new(ItemId::new(id).unwrap(), text, category, ts(secs)).unwrap()
    }

    fn item(id: &str, text: &str, category: &str) -> Item {
        item_at(id, text, category, 0)
    }

    fn ids(set: &ItemSet) -> Vec<&str> {
        set.ids().map(ItemId::as_str).collect()
    }

    #[test]
    fn remote_wins_and_conflict_is_recorded() {
        let local = ItemSet::from_items(vec![item("a", "X", "C1")]);
        let remote = vec![item("a", "Y", "C1"), item("b", "Z", "C2")];

        let result = reconcile(&local, &remote);

        assert_eq!(result.merged.as_slice(), remote.as_slice());
        assert_eq!(result.conflicts.len(), 1);
        let conflict = &result.conflicts[0];
        assert_eq!(conflict.id.as_str(), "a");
        assert_eq!(conflict.local.text(), "X");
        assert_eq!(conflict.remote.text(), "Y");
    }

    #[test]
    fn local_only_items_survive_empty_snapshot() {
        let local = ItemSet::from_items(vec![item("a", "X", "C1")]);

        let result = reconcile(&local, &[]);

        assert_eq!(result.merged, local);
        assert!(result.is_clean());
    }

    #[test]
    fn identical_content_keeps_local_copy_without_conflict() {
        let local = ItemSet::from_items(vec![item_at("a", "X", "C1", 10)]);
        let remote = vec![item_at("a", "X", "C1", 99)];

        let result = reconcile(&local, &remote);

        assert!(result.is_clean());
        assert_eq!(result.merged.as_slice()[0].updated_at(), ts(10));
    }

    #[test]
    fn category_change_alone_is_a_conflict() {
        let local = ItemSet::from_items(vec![item("a", "X", "C1")]);
        let remote = vec![item("a", "X", "C2")];

        let result = reconcile(&local, &remote);

        assert_eq!(result.conflict_count(), 1);
        assert_eq!(result.merged.as_slice()[0].category(), "C2");
    }

    #[test]
    fn remote_entries_come_first_then_local_only_in_order() {
        let local = ItemSet::from_items(vec![
            item("l1", "1", "C"),
            item("s", "shared", "C"),
            item("l2", "2", "C"),
        ]);
        let remote = vec![item("n", "new", "C"), item("s", "shared", "C")];

        let result = reconcile(&local, &remote);

        assert_eq!(ids(&result.merged), vec!["n", "s", "l1", "l2"]);
    }

    #[test]
    fn every_id_appears_exactly_once() {
        let local = ItemSet::from_items(vec![
            item("a", "1", "C"),
            item("b", "2", "C"),
            item("c", "3", "C"),
        ]);
        let remote = vec![
            item("c", "3*", "C"),
            item("d", "4", "C"),
            item("a", "1", "C"),
        ];

        let result = reconcile(&local, &remote);

        let mut merged_ids: Vec<&str> = ids(&result.merged);
        merged_ids.sort_unstable();
        assert_eq!(merged_ids, vec!["a", "b", "c", "d"]);
        assert_eq!(result.conflict_count(), 1);
        assert_eq!(result.conflicts[0].id.as_str(), "c");
    }

    #[test]
    fn reconciling_twice_is_idempotent() {
        let local = ItemSet::from_items(vec![item("a", "X", "C1"), item("mine", "M", "C3")]);
        let remote = vec![item("a", "Y", "C1"), item("b", "Z", "C2")];

        let first = reconcile(&local, &remote);
        let second = reconcile(&first.merged, &remote);

        assert!(second.is_clean());
        assert_eq!(second.merged, first.merged);
    }

    #[test]
    fn duplicate_remote_ids_merge_once() {
        let local = ItemSet::from_items(vec![item("a", "X", "C")]);
        let remote = vec![item("a", "Y", "C"), item("a", "W", "C")];

        let result = reconcile(&local, &remote);

        assert_eq!(result.merged.len(), 1);
        assert_eq!(result.merged.as_slice()[0].text(), "Y");
        assert_eq!(result.conflict_count(), 1);
    }

    #[test]
    fn empty_local_takes_whole_snapshot() {
        let remote = vec![item("1", "a", "Server"), item("2", "b", "Server")];

        let result = reconcile(&ItemSet::new(), &remote);

        assert_eq!(result.merged.as_slice(), remote.as_slice());
        assert!(result.is_clean());
    }
}
