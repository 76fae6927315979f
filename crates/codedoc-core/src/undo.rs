//! Undo/redo history.
//!
//! Each edit pushes one [`UndoOperation`]. Grouping collapses the last N records into a single
//! [`UndoOperation::Queue`] so one user action undoes in one step. The stack only stores
//! records; the [`crate::Document`] applies their inverse edits.

use crate::delta::DocumentChange;

/// One reversible record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoOperation {
    /// `text` was inserted at `offset`.
    Insert {
        /// Insertion offset.
        offset: usize,
        /// Inserted text.
        text: String,
    },
    /// `text` was removed at `offset`.
    Delete {
        /// Removal offset.
        offset: usize,
        /// Removed text.
        text: String,
    },
    /// `removed` was replaced by `inserted` at `offset`.
    Replace {
        /// Replacement offset.
        offset: usize,
        /// Removed text.
        removed: String,
        /// Inserted text.
        inserted: String,
    },
    /// Several records undone and redone as one.
    Queue(Vec<UndoOperation>),
}

impl UndoOperation {
    /// The record for an applied change.
    pub fn from_change(change: &DocumentChange) -> Self {
        match (change.removed_text.is_empty(), change.inserted_text.is_empty()) {
            (true, _) => Self::Insert {
                offset: change.offset,
                text: change.inserted_text.clone(),
            },
            (false, true) => Self::Delete {
                offset: change.offset,
                text: change.removed_text.clone(),
            },
            (false, false) => Self::Replace {
                offset: change.offset,
                removed: change.removed_text.clone(),
                inserted: change.inserted_text.clone(),
            },
        }
    }

    /// The change this record describes.
    fn forward_change(&self) -> Option<DocumentChange> {
        match self {
            Self::Insert { offset, text } => Some(DocumentChange::new(*offset, "", text.as_str())),
            Self::Delete { offset, text } => Some(DocumentChange::new(*offset, text.as_str(), "")),
            Self::Replace {
                offset,
                removed,
                inserted,
            } => Some(DocumentChange::new(*offset, removed.as_str(), inserted.as_str())),
            Self::Queue(_) => None,
        }
    }

    /// Changes that revert this record, in application order.
    pub fn undo_changes(&self) -> Vec<DocumentChange> {
        let mut changes = Vec::new();
        self.collect_undo(&mut changes);
        changes
    }

    /// Changes that re-apply this record, in application order.
    pub fn redo_changes(&self) -> Vec<DocumentChange> {
        let mut changes = Vec::new();
        self.collect_redo(&mut changes);
        changes
    }

    fn collect_undo(&self, out: &mut Vec<DocumentChange>) {
        match self {
            Self::Queue(operations) => {
                for operation in operations.iter().rev() {
                    operation.collect_undo(out);
                }
            }
            _ => out.extend(self.forward_change().map(|change| change.inverted())),
        }
    }

    fn collect_redo(&self, out: &mut Vec<DocumentChange>) {
        match self {
            Self::Queue(operations) => {
                for operation in operations {
                    operation.collect_redo(out);
                }
            }
            _ => out.extend(self.forward_change()),
        }
    }
}

/// Undo and redo stacks with grouping and an optional size limit.
#[derive(Debug, Clone)]
pub struct UndoStack {
    undo_stack: Vec<UndoOperation>,
    redo_stack: Vec<UndoOperation>,
    accept_changes: bool,
    undo_limit: Option<usize>,
    group_depth: usize,
    group_start: usize,
    /// Saved position in the linear history; `None` once unreachable.
    clean_index: Option<usize>,
}

impl UndoStack {
    /// An empty, unbounded history.
    pub fn new() -> Self {
        Self::with_limit(None)
    }

    /// An empty history keeping at most `undo_limit` records.
    pub fn with_limit(undo_limit: Option<usize>) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            accept_changes: true,
            undo_limit,
            group_depth: 0,
            group_start: 0,
            clean_index: Some(0),
        }
    }

    /// Record an operation. Clears the redo stack.
    ///
    /// Ignored while changes are not accepted (during undo or redo).
    pub fn push(&mut self, operation: UndoOperation) {
        if !self.accept_changes {
            return;
        }
        if let Some(clean_index) = self.clean_index
            && clean_index > self.undo_stack.len()
        {
            self.clean_index = None;
        }
        self.redo_stack.clear();
        self.undo_stack.push(operation);
        self.enforce_limit();
    }

    /// Collapse the last `count` records into one queue.
    ///
    /// Does nothing when `count < 2` or there are fewer than `count` records.
    pub fn undo_last(&mut self, count: usize) {
        if !self.accept_changes || count < 2 || count > self.undo_stack.len() {
            return;
        }
        let start = self.undo_stack.len() - count;
        let operations: Vec<UndoOperation> = self.undo_stack.drain(start..).collect();
        self.undo_stack.push(UndoOperation::Queue(operations));
    }

    /// Open a group; nested groups collapse when the outermost one ends.
    pub fn begin_group(&mut self) {
        if self.group_depth == 0 {
            self.group_start = self.undo_stack.len();
        }
        self.group_depth += 1;
    }

    /// Close a group.
    pub fn end_group(&mut self) {
        if self.group_depth == 0 {
            log::warn!("end_group called without a matching begin_group");
            return;
        }
        self.group_depth -= 1;
        if self.group_depth == 0 {
            let count = self.undo_stack.len().saturating_sub(self.group_start);
            self.undo_last(count);
        }
    }

    /// Whether a group is open.
    pub fn in_group(&self) -> bool {
        self.group_depth > 0
    }

    /// Whether an undo is possible.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Whether a redo is possible.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of undo records.
    pub fn undo_item_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of redo records.
    pub fn redo_item_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Drop all history.
    pub fn clear_all(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.group_depth = 0;
        self.group_start = 0;
        self.clean_index = Some(0);
    }

    /// Whether new records are accepted.
    pub fn accept_changes(&self) -> bool {
        self.accept_changes
    }

    /// Toggle recording; the document turns it off while replaying history.
    pub fn set_accept_changes(&mut self, accept: bool) {
        self.accept_changes = accept;
    }

    /// Maximum number of kept records.
    pub fn undo_limit(&self) -> Option<usize> {
        self.undo_limit
    }

    /// Change the record limit, dropping the oldest records if needed.
    pub fn set_undo_limit(&mut self, undo_limit: Option<usize>) {
        self.undo_limit = undo_limit;
        self.enforce_limit();
    }

    /// Remember the current history position as the saved state.
    pub fn mark_clean(&mut self) {
        self.clean_index = Some(self.undo_stack.len());
    }

    /// Whether the history is at the saved state.
    pub fn is_clean(&self) -> bool {
        self.clean_index == Some(self.undo_stack.len())
    }

    pub(crate) fn pop_undo(&mut self) -> Option<UndoOperation> {
        self.undo_stack.pop()
    }

    pub(crate) fn pop_redo(&mut self) -> Option<UndoOperation> {
        self.redo_stack.pop()
    }

    pub(crate) fn push_redo(&mut self, operation: UndoOperation) {
        self.redo_stack.push(operation);
    }

    /// Put a replayed record back on the undo stack without touching redo.
    pub(crate) fn push_undo_replayed(&mut self, operation: UndoOperation) {
        self.undo_stack.push(operation);
    }

    fn enforce_limit(&mut self) {
        let Some(limit) = self.undo_limit else {
            return;
        };
        while self.undo_stack.len() > limit {
            self.undo_stack.remove(0);
            self.group_start = self.group_start.saturating_sub(1);
            self.clean_index = match self.clean_index {
                Some(0) | None => None,
                Some(index) => Some(index - 1),
            };
        }
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert(offset: usize, text: &str) -> UndoOperation {
        UndoOperation::Insert {
            offset,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_from_change_picks_variant() {
        assert_eq!(
            UndoOperation::from_change(&DocumentChange::new(1, "", "a")),
            insert(1, "a")
        );
        assert!(matches!(
            UndoOperation::from_change(&DocumentChange::new(1, "a", "")),
            UndoOperation::Delete { .. }
        ));
        assert!(matches!(
            UndoOperation::from_change(&DocumentChange::new(1, "a", "b")),
            UndoOperation::Replace { .. }
        ));
    }

    #[test]
    fn test_queue_undoes_in_reverse() {
        let queue = UndoOperation::Queue(vec![insert(0, "a"), insert(1, "b")]);
        let undo: Vec<_> = queue.undo_changes().into_iter().map(|c| c.offset).collect();
        assert_eq!(undo, vec![1, 0]);
        let redo: Vec<_> = queue.redo_changes().into_iter().map(|c| c.offset).collect();
        assert_eq!(redo, vec![0, 1]);
    }

    #[test]
    fn test_push_clears_redo() {
        let mut stack = UndoStack::new();
        stack.push(insert(0, "a"));
        let op = stack.pop_undo().unwrap();
        stack.push_redo(op);
        assert!(stack.can_redo());
        stack.push(insert(0, "b"));
        assert!(!stack.can_redo());
        assert_eq!(stack.undo_item_count(), 1);
    }

    #[test]
    fn test_rejects_while_not_accepting() {
        let mut stack = UndoStack::new();
        stack.set_accept_changes(false);
        stack.push(insert(0, "a"));
        assert!(!stack.can_undo());
    }

    #[test]
    fn test_undo_last_collapses_records() {
        let mut stack = UndoStack::new();
        for i in 0..4 {
            stack.push(insert(i, "x"));
        }
        stack.undo_last(3);
        assert_eq!(stack.undo_item_count(), 2);
        assert!(matches!(stack.pop_undo(), Some(UndoOperation::Queue(ops)) if ops.len() == 3));

        // Too many or too few is a no-op.
        stack.undo_last(5);
        stack.undo_last(1);
        assert_eq!(stack.undo_item_count(), 1);
    }

    #[test]
    fn test_nested_groups_collapse_once() {
        let mut stack = UndoStack::new();
        stack.push(insert(0, "before"));
        stack.begin_group();
        stack.push(insert(0, "a"));
        stack.begin_group();
        stack.push(insert(1, "b"));
        stack.end_group();
        assert_eq!(stack.undo_item_count(), 3);
        stack.push(insert(2, "c"));
        stack.end_group();
        assert_eq!(stack.undo_item_count(), 2);
        assert!(!stack.in_group());
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut stack = UndoStack::with_limit(Some(2));
        stack.push(insert(0, "a"));
        stack.push(insert(1, "b"));
        stack.push(insert(2, "c"));
        assert_eq!(stack.undo_item_count(), 2);
        assert_eq!(stack.pop_undo(), Some(insert(2, "c")));
        assert_eq!(stack.pop_undo(), Some(insert(1, "b")));
    }

    #[test]
    fn test_clean_point_tracking() {
        let mut stack = UndoStack::new();
        assert!(stack.is_clean());
        stack.push(insert(0, "a"));
        assert!(!stack.is_clean());
        stack.mark_clean();
        assert!(stack.is_clean());
        stack.clear_all();
        assert!(stack.is_clean());
    }
}
