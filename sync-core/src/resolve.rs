//! Planning of user-chosen conflict resolutions.
//!
//! The plan is computed purely from the pending conflicts and the user's
//! choices; `sync-client` writes the planned items back into the store.

use itemsync_types::{Choice, Conflict, Item, ItemId};
use std::collections::HashMap;

/// Items to write back, plus choices that matched nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionPlan {
    /// Chosen variant per conflict with an explicit choice, in pending order.
    pub writes: Vec<Item>,
    /// Choice ids with no pending conflict (stale input).
    pub ignored: Vec<ItemId>,
}

impl ResolutionPlan {
    /// True when the plan writes nothing.
    pub fn is_noop(&self) -> bool {
        self.writes.is_empty()
    }
}

/// Resolve `pending` conflicts according to `choices`.
///
/// A conflict without an explicit choice keeps the remote variant already in
/// the store, so it produces no write. Ignored ids are sorted for stable
/// reporting.
pub fn plan_resolutions(
    pending: &[Conflict],
    choices: &HashMap<ItemId, Choice>,
) -> ResolutionPlan {
    let writes = pending
        .iter()
        .filter_map(|conflict| {
            choices
                .get(&conflict.id)
                .map(|&choice| conflict.variant(choice).clone())
        })
        .collect();

    let mut ignored: Vec<ItemId> = choices
        .keys()
        .filter(|id| !pending.iter().any(|c| &c.id == *id))
        .cloned()
        .collect();
    ignored.sort();

    ResolutionPlan { writes, ignored }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn conflict(id: &str, local: &str, remote: &str) -> Conflict {
        let item_id = ItemId::new(id).unwrap();
        let now = Utc::now();
        Conflict {
            id: item_id.clone(),
            local: Item::new(item_id.clone(), local, "C", now).unwrap(),
            remote: Item::new(item_id, remote, "C", now).unwrap(),
        }
    }

    fn choices(pairs: &[(&str, Choice)]) -> HashMap<ItemId, Choice> {
        pairs
            .iter()
            .map(|(id, c)| (ItemId::new(*id).unwrap(), *c))
            .collect()
    }

    #[test]
    fn local_choice_writes_local_variant() {
        let pending = vec![conflict("a", "X", "Y")];
        let plan = plan_resolutions(&pending, &choices(&[("a", Choice::Local)]));

        assert_eq!(plan.writes.len(), 1);
        assert_eq!(plan.writes[0].text(), "X");
        assert!(plan.ignored.is_empty());
    }

    #[test]
    fn missing_choice_produces_no_write() {
        let pending = vec![conflict("a", "X", "Y"), conflict("b", "P", "Q")];
        let plan = plan_resolutions(&pending, &choices(&[("b", Choice::Remote)]));

        assert_eq!(plan.writes.len(), 1);
        assert_eq!(plan.writes[0].text(), "Q");
    }

    #[test]
    fn unknown_ids_are_reported_not_applied() {
        let pending = vec![conflict("a", "X", "Y")];
        let plan = plan_resolutions(
            &pending,
            &choices(&[("z", Choice::Local), ("y", Choice::Remote)]),
        );

        assert!(plan.is_noop());
        let ignored: Vec<&str> = plan.ignored.iter().map(ItemId::as_str).collect();
        assert_eq!(ignored, vec!["y", "z"]);
    }

    #[test]
    fn writes_follow_pending_order() {
        let pending = vec![conflict("b", "1", "2"), conflict("a", "3", "4")];
        let plan = plan_resolutions(
            &pending,
            &choices(&[("a", Choice::Local), ("b", Choice::Local)]),
        );

        let order: Vec<&str> = plan.writes.iter().map(|i| i.id().as_str()).collect();
        assert_eq!(order, vec!["b", "a"]);
    }
}
