//! Error types for itemsync values.

use thiserror::Error;

/// Validation errors raised when constructing items.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemError {
    /// Identifier was empty after trimming.
    #[error("item id must not be empty")]
    EmptyId,

    /// Text was empty after trimming.
    #[error("item text must not be empty")]
    EmptyText,

    /// Category was empty after trimming.
    #[error("item category must not be empty")]
    EmptyCategory,

    /// A conflict choice string was not recognised.
    #[error("invalid choice: {0} (expected \"local\" or \"remote\")")]
    InvalidChoice(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ItemError::InvalidChoice("both".into());
        assert_eq!(
            err.to_string(),
            "invalid choice: both (expected \"local\" or \"remote\")"
        );
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ItemError>();
    }
}
