//! Ordered item collection keyed by id.
//!
//! An [`ItemSet`] holds at most one item per id and preserves insertion
//! order. It is the value the store swaps atomically and the shape that is
//! persisted (a plain JSON array of items).

use itemsync_types::{Item, ItemId};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Category filter value meaning "no filter".
pub const ALL_CATEGORIES: &str = "all";

/// Ordered collection with unique ids.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Item>", into = "Vec<Item>")]
pub struct ItemSet {
    items: Vec<Item>,
    index: HashMap<ItemId, usize>,
}

impl ItemSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from items in order.
    ///
    /// A later item with an id already seen replaces the earlier one in its
    /// original position.
    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Self {
        let mut set = Self::new();
        for item in items {
            set.upsert(item);
        }
        set
    }

    /// Insert `item` at the end if its id is absent, else replace in place.
    ///
    /// Returns the replaced item, if any.
    pub fn upsert(&mut self, item: Item) -> Option<Item> {
        match self.index.get(item.id()) {
            Some(&pos) => Some(std::mem::replace(&mut self.items[pos], item)),
            None => {
                self.index.insert(item.id().clone(), self.items.len());
                self.items.push(item);
                None
            }
        }
    }

    /// Replace the item sharing `item`'s id; does nothing if the id is absent.
    ///
    /// Returns true when a replacement happened.
    pub fn replace_existing(&mut self, item: Item) -> bool {
        match self.index.get(item.id()) {
            Some(&pos) => {
                self.items[pos] = item;
                true
            }
            None => false,
        }
    }

    /// Look up an item by id.
    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.index.get(id).map(|&pos| &self.items[pos])
    }

    /// True if an item with this id is present.
    pub fn contains(&self, id: &ItemId) -> bool {
        self.index.contains_key(id)
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if the set holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.items.iter()
    }

    /// Items as an ordered slice.
    pub fn as_slice(&self) -> &[Item] {
        &self.items
    }

    /// Ids in order.
    pub fn ids(&self) -> impl Iterator<Item = &ItemId> {
        self.items.iter().map(Item::id)
    }

    /// Sorted, de-duplicated categories of this set.
    pub fn categories(&self) -> BTreeSet<String> {
        categories_of(&self.items)
    }

    /// Items matching a category filter, in order.
    ///
    /// `None` or [`ALL_CATEGORIES`] match everything.
    pub fn filter_category<'a>(&'a self, category: Option<&'a str>) -> Vec<&'a Item> {
        self.items
            .iter()
            .filter(|item| matches_category(item, category))
            .collect()
    }

    /// Consume the set, returning the ordered items.
    pub fn into_vec(self) -> Vec<Item> {
        self.items
    }
}

impl PartialEq for ItemSet {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Eq for ItemSet {}

impl From<Vec<Item>> for ItemSet {
    fn from(items: Vec<Item>) -> Self {
        Self::from_items(items)
    }
}

impl From<ItemSet> for Vec<Item> {
    fn from(set: ItemSet) -> Self {
        set.items
    }
}

impl FromIterator<Item> for ItemSet {
    fn from_iter<I: IntoIterator<Item = Item>>(iter: I) -> Self {
        Self::from_items(iter)
    }
}

impl<'a> IntoIterator for &'a ItemSet {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Sorted set of the categories used by `items`.
pub fn categories_of<'a>(items: impl IntoIterator<Item = &'a Item>) -> BTreeSet<String> {
    items
        .into_iter()
        .map(|item| item.category().to_string())
        .collect()
}

/// Pick a random item matching the category filter.
///
/// Returns `None` when nothing matches.
pub fn pick_random<'a, R: Rng + ?Sized>(
    items: &'a ItemSet,
    category: Option<&str>,
    rng: &mut R,
) -> Option<&'a Item> {
    let candidates: Vec<&Item> = items
        .iter()
        .filter(|item| matches_category(item, category))
        .collect();
    if candidates.is_empty() {
        return None;
    }
    Some(candidates[rng.gen_range(0..candidates.len())])
}

fn matches_category(item: &Item, category: Option<&str>) -> bool {
    match category {
        None => true,
        Some(ALL_CATEGORIES) => true,
        Some(wanted) => item.category() == wanted,
    }
}
