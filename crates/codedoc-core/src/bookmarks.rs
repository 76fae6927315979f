//! Line bookmarks.
//!
//! Bookmarks are addressed by line, not offset. They follow line insertions and deletions
//! through the [`LineChange`] reported by the line index.

use crate::line_manager::LineChange;

/// A bookmarked line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bookmark {
    /// Line number.
    pub line: usize,
    /// Disabled bookmarks are kept but skipped by navigation.
    pub is_enabled: bool,
}

impl Bookmark {
    /// An enabled bookmark on `line`.
    pub fn new(line: usize) -> Self {
        Self {
            line,
            is_enabled: true,
        }
    }
}

/// Bookmarks of one document, kept sorted by line with at most one per line.
#[derive(Debug, Clone, Default)]
pub struct BookmarkManager {
    marks: Vec<Bookmark>,
}

impl BookmarkManager {
    /// No bookmarks.
    pub fn new() -> Self {
        Self::default()
    }

    /// All bookmarks in line order.
    pub fn marks(&self) -> &[Bookmark] {
        &self.marks
    }

    /// Whether `line` carries a bookmark (enabled or not).
    pub fn is_marked(&self, line: usize) -> bool {
        self.find(line).is_ok()
    }

    /// Add or remove the bookmark on `line`. Returns `true` when one was added.
    pub fn toggle_mark_at(&mut self, line: usize) -> bool {
        match self.find(line) {
            Ok(index) => {
                self.marks.remove(index);
                false
            }
            Err(index) => {
                self.marks.insert(index, Bookmark::new(line));
                true
            }
        }
    }

    /// Add a bookmark, replacing one on the same line.
    pub fn add_mark(&mut self, mark: Bookmark) {
        match self.find(mark.line) {
            Ok(index) => self.marks[index] = mark,
            Err(index) => self.marks.insert(index, mark),
        }
    }

    /// Remove the bookmark on `line`.
    pub fn remove_mark(&mut self, line: usize) -> Option<Bookmark> {
        self.find(line).ok().map(|index| self.marks.remove(index))
    }

    /// Remove every bookmark matching `predicate`. Returns how many were removed.
    pub fn remove_marks(&mut self, mut predicate: impl FnMut(&Bookmark) -> bool) -> usize {
        let before = self.marks.len();
        self.marks.retain(|mark| !predicate(mark));
        before - self.marks.len()
    }

    /// Remove all bookmarks.
    pub fn clear(&mut self) {
        self.marks.clear();
    }

    /// First enabled bookmark.
    pub fn get_first_mark(&self) -> Option<usize> {
        self.enabled().next()
    }

    /// Last enabled bookmark.
    pub fn get_last_mark(&self) -> Option<usize> {
        self.enabled().next_back()
    }

    /// First enabled bookmark after `line`, wrapping to the first one.
    pub fn get_next_mark(&self, line: usize) -> Option<usize> {
        self.enabled()
            .find(|&mark| mark > line)
            .or_else(|| self.get_first_mark())
    }

    /// Last enabled bookmark before `line`, wrapping to the last one.
    pub fn get_prev_mark(&self, line: usize) -> Option<usize> {
        self.enabled()
            .rev()
            .find(|&mark| mark < line)
            .or_else(|| self.get_last_mark())
    }

    /// Follow a line-level edit: bookmarks on deleted lines vanish, later ones shift.
    pub fn on_lines_changed(&mut self, change: &LineChange) {
        if change.removed_line_breaks == 0 && change.line_count_delta() == 0 {
            return;
        }
        let first_removed = change.start_line + 1;
        let last_removed = change.start_line + change.removed_line_breaks;
        let delta = change.line_count_delta();

        self.marks.retain_mut(|mark| {
            if mark.line < first_removed {
                return true;
            }
            if mark.line <= last_removed {
                return false;
            }
            mark.line = (mark.line as isize + delta).max(0) as usize;
            true
        });
    }

    /// Drop bookmarks at or past `line_count`.
    pub fn truncate_to(&mut self, line_count: usize) {
        self.marks.retain(|mark| mark.line < line_count);
    }

    fn find(&self, line: usize) -> Result<usize, usize> {
        self.marks.binary_search_by_key(&line, |mark| mark.line)
    }

    fn enabled(&self) -> impl DoubleEndedIterator<Item = usize> + '_ {
        self.marks
            .iter()
            .filter(|mark| mark.is_enabled)
            .map(|mark| mark.line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager_with(lines: &[usize]) -> BookmarkManager {
        let mut manager = BookmarkManager::new();
        for &line in lines {
            manager.toggle_mark_at(line);
        }
        manager
    }

    fn change(start_line: usize, removed: usize, inserted: usize) -> LineChange {
        LineChange {
            start_line,
            removed_line_breaks: removed,
            inserted_line_breaks: inserted,
            first_line: start_line,
            old_line_count: removed + 1,
            new_line_count: inserted + 1,
        }
    }

    #[test]
    fn test_toggle_keeps_sorted() {
        let mut manager = manager_with(&[7, 2, 5]);
        assert_eq!(manager.marks().iter().map(|m| m.line).collect::<Vec<_>>(), vec![2, 5, 7]);
        assert!(!manager.toggle_mark_at(5));
        assert!(!manager.is_marked(5));
    }

    #[test]
    fn test_next_and_prev_wrap() {
        let manager = manager_with(&[2, 5, 9]);
        assert_eq!(manager.get_next_mark(2), Some(5));
        assert_eq!(manager.get_next_mark(9), Some(2));
        assert_eq!(manager.get_prev_mark(5), Some(2));
        assert_eq!(manager.get_prev_mark(2), Some(9));
        assert_eq!(manager.get_prev_mark(0), Some(9));
    }

    #[test]
    fn test_navigation_skips_disabled() {
        let mut manager = manager_with(&[2, 9]);
        manager.add_mark(Bookmark {
            line: 5,
            is_enabled: false,
        });
        assert_eq!(manager.get_next_mark(2), Some(9));
        assert_eq!(manager.get_first_mark(), Some(2));
        assert!(manager.is_marked(5));
    }

    #[test]
    fn test_no_marks_navigation_is_none() {
        let manager = BookmarkManager::new();
        assert_eq!(manager.get_next_mark(3), None);
        assert_eq!(manager.get_prev_mark(3), None);
    }

    #[test]
    fn test_inserted_lines_shift_marks() {
        let mut manager = manager_with(&[1, 4]);
        manager.on_lines_changed(&change(2, 0, 3));
        assert_eq!(manager.marks().iter().map(|m| m.line).collect::<Vec<_>>(), vec![1, 7]);
    }

    #[test]
    fn test_deleted_lines_drop_marks() {
        let mut manager = manager_with(&[1, 3, 4, 8]);
        // Joining lines 1..=4 removes lines 2, 3 and 4.
        manager.on_lines_changed(&change(1, 3, 0));
        assert_eq!(manager.marks().iter().map(|m| m.line).collect::<Vec<_>>(), vec![1, 5]);
    }

    #[test]
    fn test_remove_marks_by_predicate() {
        let mut manager = manager_with(&[1, 2, 3, 4]);
        assert_eq!(manager.remove_marks(|m| m.line % 2 == 0), 2);
        assert_eq!(manager.remove_mark(3).map(|m| m.line), Some(3));
        manager.truncate_to(1);
        assert!(manager.marks().is_empty());
    }
}
