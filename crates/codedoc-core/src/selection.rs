//! Selections.
//!
//! A [`Selection`] stores both its positions and its offset range. Offsets are adjusted on every
//! edit like any other segment; positions are then recomputed from the new line index.

use crate::delta::DocumentChange;
use crate::gap_buffer::GapTextBuffer;
use crate::line_manager::{LineManager, TextPosition};
use crate::segment::{Segment, update_segment_list_on_document_change};

/// A selected range; `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    start: TextPosition,
    end: TextPosition,
    offset: usize,
    length: usize,
}

impl Selection {
    /// Select between two positions, in either order. Columns past a line end are clamped.
    pub fn new(lines: &LineManager, a: TextPosition, b: TextPosition) -> Self {
        let (start, end) = if a <= b { (a, b) } else { (b, a) };
        let start_offset = clamp_position(lines, start);
        let end_offset = clamp_position(lines, end);
        Self::from_offsets(lines, start_offset, end_offset.saturating_sub(start_offset))
    }

    /// Select `[offset, offset + length)`.
    pub fn from_offsets(lines: &LineManager, offset: usize, length: usize) -> Self {
        let mut selection = Self {
            start: TextPosition::default(),
            end: TextPosition::default(),
            offset,
            length,
        };
        selection.refresh_positions(lines);
        selection
    }

    /// Start position.
    pub fn start(&self) -> TextPosition {
        self.start
    }

    /// End position.
    pub fn end(&self) -> TextPosition {
        self.end
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Whether `offset` is inside the half-open range.
    pub fn contains_offset(&self, offset: usize) -> bool {
        self.offset <= offset && offset < self.end_offset()
    }

    /// Whether `position` lies between start and end, both inclusive.
    pub fn contains_position(&self, position: TextPosition) -> bool {
        self.start <= position && position <= self.end
    }

    /// Whether the selection spans more than one line.
    pub fn is_multiline(&self) -> bool {
        self.start.line != self.end.line
    }

    /// Selected text.
    pub fn text(&self, buffer: &GapTextBuffer) -> String {
        buffer.get_text(self.offset, self.length)
    }

    fn refresh_positions(&mut self, lines: &LineManager) {
        self.start = lines.offset_to_position(self.offset);
        self.end = lines.offset_to_position(self.end_offset());
    }
}

impl Segment for Selection {
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

fn clamp_position(lines: &LineManager, position: TextPosition) -> usize {
    lines
        .position_to_offset(position)
        .unwrap_or_else(|| lines.text_length())
}

/// The selections of one document, sorted by offset and non-overlapping.
#[derive(Debug, Clone, Default)]
pub struct SelectionManager {
    selections: Vec<Selection>,
    selection_start: Option<TextPosition>,
}

impl SelectionManager {
    /// No selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current selections.
    pub fn selections(&self) -> &[Selection] {
        &self.selections
    }

    /// Whether any non-empty selection exists.
    pub fn has_something_selected(&self) -> bool {
        !self.selections.is_empty()
    }

    /// Anchor of the last interactive selection.
    pub fn selection_start(&self) -> Option<TextPosition> {
        self.selection_start
    }

    /// Replace all selections by `selection`. An empty selection just clears.
    pub fn set_selection(&mut self, selection: Selection) {
        self.selections.clear();
        self.selection_start = Some(selection.start);
        if !selection.is_empty() {
            self.selections.push(selection);
        }
    }

    /// Add a selection, merging it with any it overlaps.
    pub fn add_selection(&mut self, lines: &LineManager, selection: Selection) {
        if selection.is_empty() {
            return;
        }
        self.selections.push(selection);
        self.normalize(lines);
    }

    /// Remove every selection.
    pub fn clear_selection(&mut self) {
        self.selections.clear();
        self.selection_start = None;
    }

    /// Concatenated text of all selections.
    pub fn selected_text(&self, buffer: &GapTextBuffer) -> String {
        self.selections
            .iter()
            .map(|selection| selection.text(buffer))
            .collect()
    }

    /// Whether `offset` is selected.
    pub fn is_selected(&self, offset: usize) -> bool {
        self.get_selection_at(offset).is_some()
    }

    /// The selection containing `offset`.
    pub fn get_selection_at(&self, offset: usize) -> Option<&Selection> {
        self.selections
            .iter()
            .find(|selection| selection.contains_offset(offset))
    }

    /// Move the end at `old` to `new`, keeping the opposite end fixed.
    ///
    /// With no selection, selects between `old` and `new` anchored at `old`.
    pub fn extend_selection(&mut self, lines: &LineManager, old: TextPosition, new: TextPosition) {
        if old == new {
            return;
        }
        let Some(current) = self.selections.first().copied() else {
            self.set_selection(Selection::new(lines, old, new));
            self.selection_start = Some(old);
            return;
        };

        let (start, end, anchor) = if current.start == old {
            if new >= current.end {
                (current.end, new, current.end)
            } else {
                (new, current.end, current.end)
            }
        } else if current.start >= new {
            (new, current.start, current.start)
        } else {
            (current.start, new, current.start)
        };

        self.selection_start = Some(anchor);
        let extended = Selection::new(lines, start, end);
        if extended.is_empty() {
            self.selections.clear();
        } else {
            self.selections.truncate(1);
            self.selections[0] = extended;
            self.normalize(lines);
        }
    }

    /// Follow a text change; `lines` is the already updated index.
    pub fn on_document_changed(&mut self, lines: &LineManager, change: &DocumentChange) {
        update_segment_list_on_document_change(&mut self.selections, change);
        self.selections.retain(|selection| !selection.is_empty());
        for selection in &mut self.selections {
            selection.refresh_positions(lines);
        }
    }

    fn normalize(&mut self, lines: &LineManager) {
        self.selections.sort_by_key(|selection| selection.offset);
        let mut merged: Vec<Selection> = Vec::with_capacity(self.selections.len());
        for selection in self.selections.drain(..) {
            match merged.last_mut() {
                Some(last) if selection.offset < last.end_offset() => {
                    let end = last.end_offset().max(selection.end_offset());
                    *last = Selection::from_offsets(lines, last.offset, end - last.offset);
                }
                _ => merged.push(selection),
            }
        }
        self.selections = merged;
    }
}
