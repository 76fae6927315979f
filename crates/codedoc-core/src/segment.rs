//! Offset-addressed segments and their adjustment on edits.
//!
//! Fold markers, text markers and selections all describe a `[offset, offset + length)` range
//! of the text. After each change the document runs
//! [`update_segment_list_on_document_change`] over every such list so that ranges keep
//! pointing at the same text.

use crate::delta::DocumentChange;

/// Something that covers a character range of the document.
pub trait Segment {
    /// Start offset.
    fn offset(&self) -> usize;
    /// Length in characters.
    fn length(&self) -> usize;
    /// Move the start offset.
    fn set_offset(&mut self, offset: usize);
    /// Change the length.
    fn set_length(&mut self, length: usize);

    /// Exclusive end offset.
    fn end_offset(&self) -> usize {
        self.offset() + self.length()
    }
}

/// Adjust every segment in `list` for `change`, removing the ones the change swallowed.
///
/// Rules, with `removed`/`inserted` the change lengths:
/// - the removal pulls starts and ends that lie after the edit offset back, clamped to the
///   edit offset;
/// - a non-empty segment that collapses to nothing is removed;
/// - the insertion pushes starts at or after the edit offset, and ends strictly after it.
///
/// Empty segments are never removed; they move with the text before them.
///
/// Returns the number of removed segments.
pub fn update_segment_list_on_document_change<T: Segment>(
    list: &mut Vec<T>,
    change: &DocumentChange,
) -> usize {
    let edit = change.offset;
    let removed = change.removed_len();
    let inserted = change.inserted_len();
    let before = list.len();

    list.retain_mut(|segment| {
        let was_empty = segment.length() == 0;
        let mut start = segment.offset();
        let mut end = segment.end_offset();

        if edit <= start {
            start = start.saturating_sub(removed).max(edit);
        }
        if edit < end {
            end = end.saturating_sub(removed).max(edit);
        }
        if start == end && !was_empty {
            return false;
        }

        if edit <= start {
            start += inserted;
        }
        if edit < end {
            end += inserted;
        }
        segment.set_offset(start);
        segment.set_length(end.saturating_sub(start));
        true
    });

    before - list.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Range {
        offset: usize,
        length: usize,
    }

    impl Segment for Range {
        fn offset(&self) -> usize {
            self.offset
        }
        fn length(&self) -> usize {
            self.length
        }
        fn set_offset(&mut self, offset: usize) {
            self.offset = offset;
        }
        fn set_length(&mut self, length: usize) {
            self.length = length;
        }
    }

    fn adjust(offset: usize, length: usize, change: DocumentChange) -> Option<(usize, usize)> {
        let mut list = vec![Range { offset, length }];
        update_segment_list_on_document_change(&mut list, &change);
        list.first().map(|range| (range.offset, range.end_offset()))
    }

    #[test]
    fn test_insert_before_shifts() {
        assert_eq!(adjust(5, 5, DocumentChange::new(2, "", "abc")), Some((8, 13)));
    }

    #[test]
    fn test_insert_at_start_shifts() {
        assert_eq!(adjust(5, 5, DocumentChange::new(5, "", "ab")), Some((7, 12)));
    }

    #[test]
    fn test_insert_inside_grows() {
        assert_eq!(adjust(5, 5, DocumentChange::new(7, "", "xy")), Some((5, 12)));
    }

    #[test]
    fn test_insert_at_end_does_not_grow() {
        assert_eq!(adjust(5, 5, DocumentChange::new(10, "", "xy")), Some((5, 10)));
    }

    #[test]
    fn test_overlapping_delete_clamps() {
        assert_eq!(adjust(5, 5, DocumentChange::new(0, "01234567", "")), Some((0, 2)));
        assert_eq!(adjust(5, 5, DocumentChange::new(8, "8901", "")), Some((5, 8)));
    }

    #[test]
    fn test_contained_segment_is_removed() {
        let mut list = vec![
            Range { offset: 5, length: 5 },
            Range { offset: 20, length: 2 },
        ];
        let removed =
            update_segment_list_on_document_change(&mut list, &DocumentChange::new(4, "0123456", ""));
        assert_eq!(removed, 1);
        assert_eq!(list, vec![Range { offset: 13, length: 2 }]);
    }

    #[test]
    fn test_replace_of_exact_range_removes_segment() {
        assert_eq!(adjust(5, 5, DocumentChange::new(5, "abcde", "xyz")), None);
    }

    #[test]
    fn test_empty_segment_moves_with_insertion() {
        assert_eq!(adjust(5, 0, DocumentChange::new(5, "", "ab")), Some((7, 7)));
        assert_eq!(adjust(5, 0, DocumentChange::new(2, "234", "")), Some((2, 2)));
    }
}
