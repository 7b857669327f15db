//! The item record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ItemError, ItemId};

/// A short text record with a category.
///
/// Items are immutable values: an update produces a new `Item` with the same
/// id that replaces the old one. Two items with the same id hold the *same
/// content* when `text` and `category` match; `updated_at` is ignored for
/// that comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawItem")]
pub struct Item {
    id: ItemId,
    text: String,
    category: String,
    updated_at: DateTime<Utc>,
}

impl Item {
    /// Create an item, trimming text and category and rejecting empty values.
    pub fn new(
        id: ItemId,
        text: impl AsRef<str>,
        category: impl AsRef<str>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, ItemError> {
        let text = text.as_ref().trim();
        if text.is_empty() {
            return Err(ItemError::EmptyText);
        }
        let category = category.as_ref().trim();
        if category.is_empty() {
            return Err(ItemError::EmptyCategory);
        }
        Ok(Self {
            id,
            text: text.to_string(),
            category: category.to_string(),
            updated_at,
        })
    }

    /// The stable identifier.
    pub fn id(&self) -> &ItemId {
        &self.id
    }

    /// The record text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The record category.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// When this version of the record was produced.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// True when `other` carries the same text and category.
    ///
    /// Ids and timestamps are not compared.
    pub fn same_content(&self, other: &Item) -> bool {
        self.text == other.text && self.category == other.category
    }
}

/// Unvalidated wire shape; every deserialized item goes through [`Item::new`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawItem {
    id: ItemId,
    text: String,
    category: String,
    updated_at: DateTime<Utc>,
}

impl TryFrom<RawItem> for Item {
    type Error = ItemError;

    fn try_from(raw: RawItem) -> Result<Self, Self::Error> {
        Item::new(raw.id, raw.text, raw.category, raw.updated_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn id(s: &str) -> ItemId {
        ItemId::new(s).unwrap()
    }

    #[test]
    fn new_trims_fields() {
        let item = Item::new(id("a"), "  hello ", " Tips ", ts(0)).unwrap();
        assert_eq!(item.text(), "hello");
        assert_eq!(item.category(), "Tips");
    }

    #[test]
    fn new_rejects_blank_text_and_category() {
        assert_eq!(
            Item::new(id("a"), "   ", "C", ts(0)),
            Err(ItemError::EmptyText)
        );
        assert_eq!(
            Item::new(id("a"), "x", "", ts(0)),
            Err(ItemError::EmptyCategory)
        );
    }

    #[test]
    fn same_content_ignores_timestamp() {
        let a = Item::new(id("a"), "X", "C1", ts(0)).unwrap();
        let b = Item::new(id("a"), "X", "C1", ts(999)).unwrap();
        let c = Item::new(id("a"), "Y", "C1", ts(0)).unwrap();
        assert!(a.same_content(&b));
        assert!(!a.same_content(&c));
        assert_ne!(a, b);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let item = Item::new(id("a"), "X", "C1", ts(0)).unwrap();
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["id"], "a");
        assert_eq!(json["text"], "X");
        assert_eq!(json["category"], "C1");
        assert_eq!(json["updatedAt"], "1970-01-01T00:00:00Z");
    }

    #[test]
    fn deserializes_iso_timestamps() {
        let json = r#"{"id":"k2x","text":"Hi","category":"Greeting","updatedAt":"2024-05-01T10:20:30.123Z"}"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.id().as_str(), "k2x");
        assert_eq!(item.updated_at().timestamp(), 1714558830);
    }

    #[test]
    fn deserialize_validates_content() {
        let json = r#"{"id":"k","text":"","category":"C","updatedAt":"2024-05-01T10:20:30Z"}"#;
        assert!(serde_json::from_str::<Item>(json).is_err());
    }
}
