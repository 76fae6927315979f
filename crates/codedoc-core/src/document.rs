//! Document Facade
//!
//! [`Document`] owns the text and everything derived from it, and is the only way to mutate
//! the text. One edit runs through a fixed sequence:
//!
//! 1. `AboutToChange` is emitted;
//! 2. the gap buffer and then the line index are updated;
//! 3. fold markers, text markers, bookmarks and selections are adjusted;
//! 4. the highlighter splices its line cache and re-tokenizes the changed lines;
//! 5. an undo record is pushed (unless history is being replayed);
//! 6. repaint requests are queued;
//! 7. `Changed` is emitted.
//!
//! Subscribers therefore always observe a fully reconciled document.
//!
//! # Example
//!
//! ```rust
//! use codedoc_core::{Document, DocumentEvent};
//!
//! let mut document = Document::new("abc\ndef\nghi");
//! document.subscribe(|event| {
//!     if let DocumentEvent::Changed(change) = event {
//!         println!("changed at {}", change.offset);
//!     }
//! });
//!
//! document.insert(4, "X").unwrap();
//! assert_eq!(document.line_text(1).unwrap(), "Xdef");
//!
//! document.undo().unwrap();
//! assert_eq!(document.text_content(), "abc\ndef\nghi");
//! ```

use std::any::Any;

use crate::bookmarks::BookmarkManager;
use crate::config::DocumentConfig;
use crate::content::TextContent;
use crate::delta::DocumentChange;
use crate::error::DocumentResult;
use crate::folding::{FoldingManager, FoldingStrategy};
use crate::highlight::{HighlightingStrategy, PlainHighlighting, TextWord};
use crate::line_manager::{LineChange, LineSegment, TextPosition};
use crate::markers::MarkerStrategy;
use crate::segment::Segment;
use crate::selection::{Selection, SelectionManager};
use crate::text_utilities;
use crate::undo::{UndoOperation, UndoStack};
use crate::update::{TextAreaUpdate, UpdateQueue};

/// More changed lines than this are repainted as a whole.
const MAX_SINGLE_LINE_UPDATES: usize = 20;

/// Notification emitted by a [`Document`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentEvent {
    /// A change is about to be applied; the document still holds the old text.
    AboutToChange(DocumentChange),
    /// A change was applied and every component reconciled.
    Changed(DocumentChange),
    /// The number of lines changed.
    LineCountChanged {
        /// Line where the edit started.
        start_line: usize,
        /// Lines added (positive) or removed (negative).
        lines_moved: isize,
    },
    /// The whole text was replaced.
    TextContentChanged,
    /// The fold marker set changed.
    FoldingsChanged,
    /// Queued repaint requests were committed.
    UpdateCommitted(Vec<TextAreaUpdate>),
}

/// Callback type for [`Document::subscribe`].
pub type DocumentEventCallback = Box<dyn FnMut(&DocumentEvent) + Send>;

/// An editable text document.
pub struct Document {
    config: DocumentConfig,
    content: TextContent,
    read_only: bool,
    version: u64,
    undo_stack: UndoStack,
    folding: FoldingManager,
    markers: MarkerStrategy,
    bookmarks: BookmarkManager,
    selection: SelectionManager,
    highlighting: Box<dyn HighlightingStrategy>,
    updates: UpdateQueue,
    callbacks: Vec<DocumentEventCallback>,
}

impl Document {
    /// A document holding `text`, with default configuration.
    pub fn new(text: &str) -> Self {
        Self::with_config(text, DocumentConfig::default())
    }

    /// An empty document.
    pub fn empty() -> Self {
        Self::new("")
    }

    /// A document holding `text`.
    pub fn with_config(text: &str, config: DocumentConfig) -> Self {
        let mut content = TextContent::with_gap_limits(config.min_gap_length, config.max_gap_length);
        content.set_content(text);

        let mut folding = FoldingManager::new();
        folding.set_enabled(config.enable_folding);

        let mut highlighting: Box<dyn HighlightingStrategy> = Box::new(PlainHighlighting::new());
        highlighting.mark_tokens(&content);

        Self {
            undo_stack: UndoStack::with_limit(config.undo_limit),
            config,
            content,
            read_only: false,
            version: 0,
            folding,
            markers: MarkerStrategy::new(),
            bookmarks: BookmarkManager::new(),
            selection: SelectionManager::new(),
            highlighting,
            updates: UpdateQueue::new(),
            callbacks: Vec::new(),
        }
    }

    // ----- configuration -----

    /// Current configuration.
    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    /// Replace the configuration; folding and undo limits take effect immediately.
    pub fn set_config(&mut self, config: DocumentConfig) {
        self.folding.set_enabled(config.enable_folding);
        self.undo_stack.set_undo_limit(config.undo_limit);
        self.config = config;
        self.updates.request(TextAreaUpdate::WholeTextArea);
    }

    /// Whether edits are ignored.
    pub fn read_only(&self) -> bool {
        self.read_only
    }

    /// Make the document read-only or editable.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Incremented on every applied change.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Register a callback for [`DocumentEvent`]s.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&DocumentEvent) + Send + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    // ----- text -----

    /// Read access to the text and line index.
    pub fn content(&self) -> &TextContent {
        &self.content
    }

    /// The full text.
    pub fn text_content(&self) -> String {
        self.content.text()
    }

    /// Replace the whole text. History, markers, folds and selections are reset.
    ///
    /// Loading works even on a read-only document.
    pub fn set_text_content(&mut self, text: &str) {
        let change = DocumentChange::new(0, self.content.text(), text);
        self.emit(DocumentEvent::AboutToChange(change.clone()));

        self.content.set_content(text);
        self.folding.clear();
        self.markers.clear();
        self.selection.clear_selection();
        self.bookmarks.truncate_to(self.content.line_count());
        self.undo_stack.clear_all();
        self.highlighting.reset(self.content.line_count());
        self.highlighting.mark_tokens(&self.content);
        self.version += 1;
        self.updates.request(TextAreaUpdate::WholeTextArea);

        self.emit(DocumentEvent::Changed(change));
        self.emit(DocumentEvent::TextContentChanged);
    }

    /// Text length in characters.
    pub fn text_length(&self) -> usize {
        self.content.text_length()
    }

    /// Text of `[offset, offset + length)`.
    pub fn get_text(&self, offset: usize, length: usize) -> DocumentResult<String> {
        self.content.get_text(offset, length)
    }

    /// Character at `offset`.
    pub fn get_char_at(&self, offset: usize) -> DocumentResult<char> {
        self.content.get_char_at(offset)
    }

    /// Insert `text` at `offset`.
    pub fn insert(&mut self, offset: usize, text: &str) -> DocumentResult<()> {
        self.replace(offset, 0, text)
    }

    /// Remove `length` characters at `offset`.
    pub fn remove(&mut self, offset: usize, length: usize) -> DocumentResult<()> {
        self.replace(offset, length, "")
    }

    /// Replace `[offset, offset + length)` by `text`.
    ///
    /// Invalid ranges are rejected without side effects. On a read-only document this is a
    /// silent no-op.
    pub fn replace(&mut self, offset: usize, length: usize, text: &str) -> DocumentResult<()> {
        if self.read_only {
            return Ok(());
        }
        let removed = self.content.get_text(offset, length)?;
        let change = DocumentChange::new(offset, removed, text);
        if !change.is_empty() {
            self.apply_change(&change);
        }
        Ok(())
    }

    fn apply_change(&mut self, change: &DocumentChange) {
        self.emit(DocumentEvent::AboutToChange(change.clone()));

        let line_change = self.content.replace(
            change.offset,
            change.removed_len(),
            &change.inserted_text,
        );

        self.folding.on_document_changed(change);
        self.markers.on_document_changed(change);
        self.bookmarks.on_lines_changed(&line_change);
        self.selection
            .on_document_changed(self.content.lines(), change);

        self.highlighting.lines_replaced(&line_change);
        let changed_lines: Vec<usize> = line_change.changed_lines().collect();
        let spilled = self
            .highlighting
            .mark_tokens_in_lines(&self.content, &changed_lines);

        self.undo_stack.push(UndoOperation::from_change(change));
        self.version += 1;
        self.request_change_updates(&line_change, spilled);

        if line_change.line_count_delta() != 0 {
            self.emit(DocumentEvent::LineCountChanged {
                start_line: line_change.start_line,
                lines_moved: line_change.line_count_delta(),
            });
        }
        self.emit(DocumentEvent::Changed(change.clone()));
    }

    fn request_change_updates(&mut self, line_change: &LineChange, spilled: bool) {
        if spilled || line_change.new_line_count > MAX_SINGLE_LINE_UPDATES {
            self.updates.request(TextAreaUpdate::WholeTextArea);
        } else if line_change.line_count_delta() != 0 {
            self.updates.request(TextAreaUpdate::PositionToEnd(TextPosition::new(
                line_change.first_line,
                0,
            )));
        } else {
            for line in line_change.changed_lines() {
                self.updates.request(TextAreaUpdate::SingleLine(line));
            }
        }
    }

    /// Insert a line break at `offset`, using the configured terminator and repeating the
    /// indentation of the current line up to `offset`.
    pub fn insert_line_break(&mut self, offset: usize) -> DocumentResult<()> {
        let position = self.content.offset_to_position(offset)?;
        let indentation: String =
            text_utilities::get_leading_whitespace(&self.content, position.line)
                .chars()
                .take(position.column)
                .collect();
        let text = format!("{}{indentation}", self.config.line_terminator.as_str());
        self.insert(offset, &text)
    }

    /// Insert one indentation level at the start of `line`.
    pub fn indent_line(&mut self, line: usize) -> DocumentResult<()> {
        let offset = self.content.line_segment(line)?.offset;
        let indentation = self.config.indentation_string();
        self.insert(offset, &indentation)
    }

    // ----- lines -----

    /// Number of lines; at least 1.
    pub fn total_number_of_lines(&self) -> usize {
        self.content.line_count()
    }

    /// Segment of `line`.
    pub fn get_line_segment(&self, line: usize) -> DocumentResult<LineSegment> {
        self.content.line_segment(line)
    }

    /// Segment of the line containing `offset`.
    pub fn get_line_segment_for_offset(&self, offset: usize) -> DocumentResult<LineSegment> {
        self.content.line_segment_for_offset(offset)
    }

    /// Line number containing `offset`.
    pub fn get_line_number_for_offset(&self, offset: usize) -> DocumentResult<usize> {
        self.content.line_number_for_offset(offset)
    }

    /// Visible text of `line`.
    pub fn line_text(&self, line: usize) -> DocumentResult<String> {
        self.content.line_text(line)
    }

    /// Convert an offset to a line/column position.
    pub fn offset_to_position(&self, offset: usize) -> DocumentResult<TextPosition> {
        self.content.offset_to_position(offset)
    }

    /// Convert a position to an offset.
    pub fn position_to_offset(&self, position: TextPosition) -> DocumentResult<usize> {
        self.content.position_to_offset(position)
    }

    /// Display column of `position`, expanding tabs to the configured tab width.
    pub fn visual_column(&self, position: TextPosition) -> DocumentResult<usize> {
        let line = self.content.line_text(position.line)?;
        Ok(text_utilities::visual_column(&line, position.column, self.config.tab_width))
    }

    /// Visible row of logical `line`.
    pub fn get_visible_line(&self, line: usize) -> usize {
        self.folding.get_visible_line(self.content.lines(), line)
    }

    /// First logical line drawn on `visible_line`.
    pub fn get_first_logical_line(&self, visible_line: usize) -> usize {
        self.folding
            .get_first_logical_line(self.content.lines(), visible_line)
    }

    /// Last logical line drawn on `visible_line`.
    pub fn get_last_logical_line(&self, visible_line: usize) -> usize {
        self.folding
            .get_last_logical_line(self.content.lines(), visible_line)
    }

    /// The line `count` visible lines after `line`.
    pub fn next_visible_line_after(&self, line: usize, count: usize) -> usize {
        self.folding
            .next_visible_line_after(self.content.lines(), line, count)
    }

    /// The line `count` visible lines before `line`.
    pub fn next_visible_line_before(&self, line: usize, count: usize) -> usize {
        self.folding
            .next_visible_line_before(self.content.lines(), line, count)
    }

    /// Number of visible rows.
    pub fn total_visible_lines(&self) -> usize {
        self.folding.total_visible_lines(self.content.lines())
    }

    // ----- undo -----

    /// Undo the most recent record. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> DocumentResult<bool> {
        if self.read_only {
            return Ok(false);
        }
        let Some(operation) = self.undo_stack.pop_undo() else {
            return Ok(false);
        };
        match self.replay(&operation.undo_changes()) {
            Ok(()) => {
                self.undo_stack.push_redo(operation);
                Ok(true)
            }
            Err(err) => {
                self.undo_stack.push_undo_replayed(operation);
                Err(err)
            }
        }
    }

    /// Redo the most recently undone record. Returns `false` when there is nothing to redo.
    pub fn redo(&mut self) -> DocumentResult<bool> {
        if self.read_only {
            return Ok(false);
        }
        let Some(operation) = self.undo_stack.pop_redo() else {
            return Ok(false);
        };
        match self.replay(&operation.redo_changes()) {
            Ok(()) => {
                self.undo_stack.push_undo_replayed(operation);
                Ok(true)
            }
            Err(err) => {
                self.undo_stack.push_redo(operation);
                Err(err)
            }
        }
    }

    /// Apply history changes with recording turned off.
    fn replay(&mut self, changes: &[DocumentChange]) -> DocumentResult<()> {
        self.undo_stack.set_accept_changes(false);
        let mut result = Ok(());
        for change in changes {
            result = self.replace(change.offset, change.removed_len(), &change.inserted_text);
            if result.is_err() {
                log::warn!("undo history does not match the text at offset {}", change.offset);
                break;
            }
        }
        self.undo_stack.set_accept_changes(true);
        result
    }

    /// The history.
    pub fn undo_stack(&self) -> &UndoStack {
        &self.undo_stack
    }

    /// Mutable history, e.g. for [`UndoStack::undo_last`].
    pub fn undo_stack_mut(&mut self) -> &mut UndoStack {
        &mut self.undo_stack
    }

    /// Start a group of edits undone as one.
    pub fn begin_undo_group(&mut self) {
        self.undo_stack.begin_group();
    }

    /// Close the group opened by [`begin_undo_group`](Self::begin_undo_group).
    pub fn end_undo_group(&mut self) {
        self.undo_stack.end_group();
    }

    // ----- folding -----

    /// Fold markers and queries.
    pub fn folding_manager(&self) -> &FoldingManager {
        &self.folding
    }

    /// Mutable fold state. Call [`notify_foldings_changed`](Self::notify_foldings_changed)
    /// after changing it.
    pub fn folding_manager_mut(&mut self) -> &mut FoldingManager {
        &mut self.folding
    }

    /// Install the folding strategy.
    pub fn set_folding_strategy(&mut self, strategy: Box<dyn FoldingStrategy>) {
        self.folding.set_folding_strategy(strategy);
    }

    /// Regenerate fold markers with the installed strategy.
    pub fn update_foldings(&mut self, file_name: &str, parse_info: Option<&dyn Any>) {
        if self
            .folding
            .update_foldings(&self.content, file_name, parse_info)
        {
            self.notify_foldings_changed();
        }
    }

    /// Toggle the innermost fold starting on `line`.
    pub fn toggle_fold_at_line(&mut self, line: usize) -> bool {
        let toggled = self.folding.toggle_fold_at_line(self.content.lines(), line);
        if toggled {
            self.notify_foldings_changed();
        }
        toggled
    }

    /// Collapse every fold.
    pub fn fold_all(&mut self) {
        self.folding.fold_all();
        self.notify_foldings_changed();
    }

    /// Expand every fold.
    pub fn unfold_all(&mut self) {
        self.folding.unfold_all();
        self.notify_foldings_changed();
    }

    /// Restore fold state saved with [`FoldingManager::serialize_to_string`].
    pub fn restore_fold_state(&mut self, data: &str) {
        let text_length = self.content.text_length();
        if self.folding.deserialize_from_string(data, text_length) {
            self.notify_foldings_changed();
        }
    }

    /// Emit `FoldingsChanged` and queue a full repaint.
    pub fn notify_foldings_changed(&mut self) {
        self.updates.request(TextAreaUpdate::WholeTextArea);
        self.emit(DocumentEvent::FoldingsChanged);
    }

    // ----- markers, bookmarks, selection -----

    /// Text markers.
    pub fn marker_strategy(&self) -> &MarkerStrategy {
        &self.markers
    }

    /// Mutable text markers.
    pub fn marker_strategy_mut(&mut self) -> &mut MarkerStrategy {
        &mut self.markers
    }

    /// Bookmarks.
    pub fn bookmark_manager(&self) -> &BookmarkManager {
        &self.bookmarks
    }

    /// Mutable bookmarks.
    pub fn bookmark_manager_mut(&mut self) -> &mut BookmarkManager {
        &mut self.bookmarks
    }

    /// Selections.
    pub fn selection_manager(&self) -> &SelectionManager {
        &self.selection
    }

    /// Mutable selections.
    pub fn selection_manager_mut(&mut self) -> &mut SelectionManager {
        &mut self.selection
    }

    /// Select between two positions, replacing any selection.
    pub fn set_selection(&mut self, start: TextPosition, end: TextPosition) {
        let selection = Selection::new(self.content.lines(), start, end);
        self.selection.set_selection(selection);
    }

    /// Move the selection end at `old` to `new`.
    pub fn extend_selection(&mut self, old: TextPosition, new: TextPosition) {
        self.selection
            .extend_selection(self.content.lines(), old, new);
    }

    /// Text of all selections.
    pub fn selected_text(&self) -> String {
        self.selection.selected_text(self.content.buffer())
    }

    /// Delete every selected range as one undo step.
    pub fn remove_selected_text(&mut self) -> DocumentResult<()> {
        let ranges: Vec<(usize, usize)> = self
            .selection
            .selections()
            .iter()
            .map(|selection| (selection.offset(), selection.length()))
            .collect();
        if ranges.is_empty() || self.read_only {
            return Ok(());
        }

        self.begin_undo_group();
        let mut result = Ok(());
        // Back to front so earlier offsets stay valid.
        for &(offset, length) in ranges.iter().rev() {
            result = self.remove(offset, length);
            if result.is_err() {
                break;
            }
        }
        self.end_undo_group();
        self.selection.clear_selection();
        result
    }

    // ----- highlighting -----

    /// The active highlighting strategy.
    pub fn highlighting_strategy(&self) -> &dyn HighlightingStrategy {
        self.highlighting.as_ref()
    }

    /// Install a highlighting strategy and tokenize the whole document with it.
    pub fn set_highlighting_strategy(&mut self, strategy: Box<dyn HighlightingStrategy>) {
        self.highlighting = strategy;
        self.highlighting.reset(self.content.line_count());
        self.highlighting.mark_tokens(&self.content);
        self.updates.request(TextAreaUpdate::WholeTextArea);
    }

    /// Words of `line` from the highlighting cache.
    pub fn line_words(&self, line: usize) -> Option<&[TextWord]> {
        self.highlighting.line_words(line)
    }

    // ----- updates -----

    /// Queue a repaint request.
    pub fn request_update(&mut self, update: TextAreaUpdate) {
        self.updates.request(update);
    }

    /// Pending repaint requests.
    pub fn update_queue(&self) -> &[TextAreaUpdate] {
        self.updates.pending()
    }

    /// Drain the repaint queue and emit `UpdateCommitted`.
    pub fn commit_update(&mut self) -> Vec<TextAreaUpdate> {
        let updates = self.updates.drain();
        if !updates.is_empty() {
            self.emit(DocumentEvent::UpdateCommitted(updates.clone()));
        }
        updates
    }

    fn emit(&mut self, event: DocumentEvent) {
        for callback in &mut self.callbacks {
            callback(&event);
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DocumentError;
    use crate::line_ending::LineTerminator;
    use std::sync::{Arc, Mutex};

    fn recorded_events(document: &mut Document) -> Arc<Mutex<Vec<DocumentEvent>>> {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        document.subscribe(move |event| sink.lock().unwrap().push(event.clone()));
        events
    }

    #[test]
    fn test_insert_splits_nothing_on_same_line() {
        let mut document = Document::new("abc\ndef\nghi");
        document.insert(4, "X").unwrap();
        assert_eq!(document.text_content(), "abc\nXdef\nghi");
        assert_eq!(document.total_number_of_lines(), 3);
        assert_eq!(document.get_line_segment(2).unwrap().offset, 9);
    }

    #[test]
    fn test_invalid_range_has_no_side_effects() {
        let mut document = Document::new("abc");
        let events = recorded_events(&mut document);
        let err = document.replace(2, 5, "x").unwrap_err();
        assert!(matches!(err, DocumentError::RangeOutOfBounds { .. }));
        assert_eq!(document.text_content(), "abc");
        assert!(!document.undo_stack().can_undo());
        assert!(events.lock().unwrap().is_empty());
    }

    #[test]
    fn test_read_only_ignores_edits() {
        let mut document = Document::new("abc");
        document.set_read_only(true);
        document.insert(0, "x").unwrap();
        assert_eq!(document.text_content(), "abc");
        assert!(!document.undo().unwrap());
    }

    #[test]
    fn test_editing_helpers_follow_config() {
        let config = DocumentConfig::default()
            .with_tab_width(8)
            .with_indentation(2, true)
            .with_line_terminator(LineTerminator::CrLf);
        let mut document = Document::with_config("\tfoo", config);
        assert_eq!(document.visual_column(TextPosition::new(0, 1)).unwrap(), 8);

        document.insert_line_break(4).unwrap();
        assert_eq!(document.text_content(), "\tfoo\r\n\t");
        assert_eq!(document.total_number_of_lines(), 2);

        document.indent_line(1).unwrap();
        assert_eq!(document.line_text(1).unwrap(), "  \t");
        assert!(document.insert_line_break(99).is_err());
    }

    #[test]
    fn test_event_order() {
        let mut document = Document::new("a");
        let events = recorded_events(&mut document);
        document.insert(1, "\nb").unwrap();
        let events = events.lock().unwrap();
        assert!(matches!(events[0], DocumentEvent::AboutToChange(_)));
        assert!(matches!(
            events[1],
            DocumentEvent::LineCountChanged {
                start_line: 0,
                lines_moved: 1
            }
        ));
        assert!(matches!(events[2], DocumentEvent::Changed(_)));
    }

    #[test]
    fn test_undo_redo_restores_text() {
        let mut document = Document::new("hello");
        document.insert(5, " world").unwrap();
        document.replace(0, 1, "J").unwrap();
        assert_eq!(document.text_content(), "Jello world");

        assert!(document.undo().unwrap());
        assert_eq!(document.text_content(), "hello world");
        assert!(document.undo().unwrap());
        assert_eq!(document.text_content(), "hello");
        assert!(!document.undo().unwrap());

        assert!(document.redo().unwrap());
        assert!(document.redo().unwrap());
        assert_eq!(document.text_content(), "Jello world");
        assert!(!document.undo_stack().can_redo());
    }

    #[test]
    fn test_grouped_edits_undo_together() {
        let mut document = Document::new("");
        document.begin_undo_group();
        document.insert(0, "a").unwrap();
        document.insert(1, "b").unwrap();
        document.insert(2, "c").unwrap();
        document.end_undo_group();
        assert_eq!(document.undo_stack().undo_item_count(), 1);
        document.undo().unwrap();
        assert_eq!(document.text_content(), "");
        document.redo().unwrap();
        assert_eq!(document.text_content(), "abc");
    }

    #[test]
    fn test_set_text_content_resets_history() {
        let mut document = Document::new("a");
        let events = recorded_events(&mut document);
        document.insert(0, "b").unwrap();
        document.set_text_content("x\ny");
        assert!(!document.undo_stack().can_undo());
        assert_eq!(document.total_number_of_lines(), 2);
        assert!(matches!(
            events.lock().unwrap().last(),
            Some(DocumentEvent::TextContentChanged)
        ));
    }

    #[test]
    fn test_remove_selected_text_is_one_undo_step() {
        let mut document = Document::new("0123456789");
        let lines = document.content().lines().clone();
        let manager = document.selection_manager_mut();
        manager.add_selection(&lines, Selection::from_offsets(&lines, 1, 2));
        manager.add_selection(&lines, Selection::from_offsets(&lines, 6, 2));
        assert_eq!(document.selected_text(), "1267");

        document.remove_selected_text().unwrap();
        assert_eq!(document.text_content(), "034589");
        assert!(!document.selection_manager().has_something_selected());
        document.undo().unwrap();
        assert_eq!(document.text_content(), "0123456789");
    }

    #[test]
    fn test_selection_follows_edit() {
        let mut document = Document::new("abc def");
        document.set_selection(TextPosition::new(0, 4), TextPosition::new(0, 7));
        document.insert(0, ">>").unwrap();
        let selection = document.selection_manager().selections()[0];
        assert_eq!(selection.offset(), 6);
        assert_eq!(document.selected_text(), "def");
    }

    #[test]
    fn test_updates_are_queued_and_committed() {
        let mut document = Document::new("a\nb");
        document.commit_update();
        document.insert(0, "x").unwrap();
        assert_eq!(document.update_queue(), &[TextAreaUpdate::SingleLine(0)]);
        document.insert(0, "\n").unwrap();
        let events = recorded_events(&mut document);
        let committed = document.commit_update();
        assert!(committed.contains(&TextAreaUpdate::PositionToEnd(TextPosition::new(0, 0))));
        assert!(matches!(
            events.lock().unwrap().as_slice(),
            [DocumentEvent::UpdateCommitted(_)]
        ));
        assert!(document.update_queue().is_empty());
    }

    #[test]
    fn test_line_words_refresh_after_edit() {
        let mut document = Document::new("ab cd");
        document.insert(2, "x").unwrap();
        let words = document.line_words(0).unwrap();
        assert_eq!(words.len(), 3);
        assert_eq!(words[0].length, 3);
    }

    #[test]
    fn test_version_increments() {
        let mut document = Document::new("");
        let before = document.version();
        document.insert(0, "a").unwrap();
        document.remove(0, 1).unwrap();
        assert_eq!(document.version(), before + 2);
    }
}
