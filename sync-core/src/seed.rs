//! Default content for the very first load.

use itemsync_types::Item;

use crate::{Clock, IdGenerator, ItemSet};

const SEED: [(&str, &str); 3] = [
    (
        "The only limit to our realization of tomorrow is our doubts of today.",
        "Motivation",
    ),
    (
        "In the middle of every difficulty lies opportunity.",
        "Inspiration",
    ),
    (
        "Success is not final, failure is not fatal: it is the courage to continue that counts.",
        "Perseverance",
    ),
];

/// The non-empty seed set, with fresh ids and the current time.
pub fn seed_items(ids: &dyn IdGenerator, clock: &dyn Clock) -> ItemSet {
    let now = clock.now();
    SEED.iter()
        .filter_map(|(text, category)| Item::new(ids.next_id(), text, category, now).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FixedClock, SequentialIds};
    use chrono::Utc;

    #[test]
    fn seed_is_never_empty() {
        let seed = seed_items(&SequentialIds::new("seed"), &FixedClock::new(Utc::now()));
        assert_eq!(seed.len(), 3);
        let cats: Vec<String> = seed.categories().into_iter().collect();
        assert_eq!(cats, vec!["Inspiration", "Motivation", "Perseverance"]);
    }

    #[test]
    fn seed_ids_come_from_generator() {
        let seed = seed_items(&SequentialIds::new("seed"), &FixedClock::new(Utc::now()));
        let ids: Vec<&str> = seed.ids().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["seed-1", "seed-2", "seed-3"]);
    }
}
