//! Text change descriptions.
//!
//! Every mutation of a [`crate::Document`] is described by one [`DocumentChange`]: the offset,
//! the exact removed text and the exact inserted text, all in character offsets. The same
//! value drives segment adjustment, event payloads and undo records.

/// A single replace operation on the document text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentChange {
    /// Character offset where the change starts.
    pub offset: usize,
    /// Text that was removed (may be empty).
    pub removed_text: String,
    /// Text that was inserted (may be empty).
    pub inserted_text: String,
}

impl DocumentChange {
    /// Describe a replacement of `removed_text` at `offset` by `inserted_text`.
    pub fn new(
        offset: usize,
        removed_text: impl Into<String>,
        inserted_text: impl Into<String>,
    ) -> Self {
        Self {
            offset,
            removed_text: removed_text.into(),
            inserted_text: inserted_text.into(),
        }
    }

    /// Number of removed characters.
    pub fn removed_len(&self) -> usize {
        self.removed_text.chars().count()
    }

    /// Number of inserted characters.
    pub fn inserted_len(&self) -> usize {
        self.inserted_text.chars().count()
    }

    /// Exclusive end of the removed range, in pre-change offsets.
    pub fn removed_end(&self) -> usize {
        self.offset + self.removed_len()
    }

    /// The change that undoes this one.
    pub fn inverted(&self) -> Self {
        Self {
            offset: self.offset,
            removed_text: self.inserted_text.clone(),
            inserted_text: self.removed_text.clone(),
        }
    }

    /// Whether applying the change is a no-op.
    pub fn is_empty(&self) -> bool {
        self.removed_text.is_empty() && self.inserted_text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lengths_count_chars() {
        let change = DocumentChange::new(2, "é", "日本語");
        assert_eq!(change.removed_len(), 1);
        assert_eq!(change.inserted_len(), 3);
        assert_eq!(change.removed_end(), 3);
    }

    #[test]
    fn test_inverted_swaps_texts() {
        let change = DocumentChange::new(5, "old", "new!");
        let inverse = change.inverted();
        assert_eq!(inverse.offset, 5);
        assert_eq!(inverse.removed_text, "new!");
        assert_eq!(inverse.inserted_text, "old");
        assert!(!inverse.is_empty());
        assert!(DocumentChange::new(0, "", "").is_empty());
    }
}
