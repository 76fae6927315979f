//! Stage 2: Line Index
//!
//! Keeps one [`LineSegment`] per logical line: the line's start offset, its length including
//! the delimiter, and the delimiter length. `"\n"`, `"\r\n"` and a lone `"\r"` all end a line,
//! and a `"\r\n"` pair is always a single delimiter, even when an edit brings the two
//! characters together.
//!
//! Edits are applied incrementally: only the lines touched by an edit are rescanned from the
//! (already updated) gap buffer, and later lines are shifted by the length delta.

use std::cmp::Ordering;
use std::ops::Range;

use crate::gap_buffer::GapTextBuffer;

/// A logical position (0-based line and column, both in characters).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextPosition {
    /// Line number.
    pub line: usize,
    /// Column within the line.
    pub column: usize,
}

impl TextPosition {
    /// Create a position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Ord for TextPosition {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.line.cmp(&other.line) {
            Ordering::Equal => self.column.cmp(&other.column),
            other => other,
        }
    }
}

impl PartialOrd for TextPosition {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One line of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineSegment {
    /// Offset of the first character.
    pub offset: usize,
    /// Length including the delimiter.
    pub total_length: usize,
    /// Delimiter length: 0 (last line), 1 or 2.
    pub delimiter_length: usize,
}

impl LineSegment {
    /// Length of the visible content, without the delimiter.
    pub fn length(&self) -> usize {
        self.total_length - self.delimiter_length
    }

    /// Offset just past the visible content.
    pub fn end_offset(&self) -> usize {
        self.offset + self.length()
    }

    /// Offset just past the delimiter.
    pub fn total_end_offset(&self) -> usize {
        self.offset + self.total_length
    }
}

/// Line-level summary of one edit, consumed by line-addressed components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineChange {
    /// Line containing the edit offset.
    pub start_line: usize,
    /// Line breaks inside the removed range.
    pub removed_line_breaks: usize,
    /// Line breaks inside the inserted text, as seen by the index.
    pub inserted_line_breaks: usize,
    /// First line whose segment was rebuilt.
    pub first_line: usize,
    /// Number of segments replaced.
    pub old_line_count: usize,
    /// Number of segments that replaced them.
    pub new_line_count: usize,
}

impl LineChange {
    /// Change in total line count.
    pub fn line_count_delta(&self) -> isize {
        self.new_line_count as isize - self.old_line_count as isize
    }

    /// Lines (post-edit numbering) whose content may differ from before the edit.
    pub fn changed_lines(&self) -> Range<usize> {
        self.first_line..self.first_line + self.new_line_count
    }
}

/// Ordered collection of line segments covering the whole text.
#[derive(Debug, Clone)]
pub struct LineManager {
    segments: Vec<LineSegment>,
}

impl LineManager {
    /// An index for the empty text (one empty line).
    pub fn new() -> Self {
        Self {
            segments: vec![LineSegment::default()],
        }
    }

    /// Rebuild the index for the buffer's full content.
    pub fn set_content(&mut self, buffer: &GapTextBuffer) {
        self.segments = scan_lines(buffer.chars(), 0, true);
    }

    /// Number of lines; never zero.
    pub fn line_count(&self) -> usize {
        self.segments.len()
    }

    /// Total text length covered by the index.
    pub fn text_length(&self) -> usize {
        self.segments
            .last()
            .map(LineSegment::total_end_offset)
            .unwrap_or(0)
    }

    /// All segments in order.
    pub fn segments(&self) -> &[LineSegment] {
        &self.segments
    }

    /// Segment of `line`, or `None` when out of range.
    pub fn segment(&self, line: usize) -> Option<LineSegment> {
        self.segments.get(line).copied()
    }

    /// Line containing `offset`.
    ///
    /// Offsets inside a delimiter belong to the line the delimiter ends. Offsets past the end
    /// map to the last line.
    pub fn line_number_for_offset(&self, offset: usize) -> usize {
        self.segments
            .partition_point(|segment| segment.offset <= offset)
            .saturating_sub(1)
    }

    /// Segment of the line containing `offset`.
    pub fn segment_for_offset(&self, offset: usize) -> LineSegment {
        self.segments[self.line_number_for_offset(offset)]
    }

    /// Convert an offset to a line/column position.
    pub fn offset_to_position(&self, offset: usize) -> TextPosition {
        let line = self.line_number_for_offset(offset);
        TextPosition::new(line, offset.saturating_sub(self.segments[line].offset))
    }

    /// Convert a position to an offset; the column is clamped to the line's content.
    pub fn position_to_offset(&self, position: TextPosition) -> Option<usize> {
        let segment = self.segment(position.line)?;
        Some(segment.offset + position.column.min(segment.length()))
    }

    /// Visible text of `line`.
    pub fn line_text(&self, buffer: &GapTextBuffer, line: usize) -> Option<String> {
        let segment = self.segment(line)?;
        Some(buffer.get_text(segment.offset, segment.length()))
    }

    /// Update the index after `buffer` had `[offset, offset + removed)` replaced by
    /// `inserted` characters.
    pub fn replace(
        &mut self,
        buffer: &GapTextBuffer,
        offset: usize,
        removed: usize,
        inserted: usize,
    ) -> LineChange {
        let start_line = self.line_number_for_offset(offset);
        let mut last = self.line_number_for_offset(offset + removed);
        // The start line's delimiter survives when the edit begins inside it.
        let split_delimiter =
            last > start_line && self.segments[start_line].end_offset() < offset;
        let removed_line_breaks = last - start_line - usize::from(split_delimiter);

        let mut first = start_line;
        if first > 0 {
            let prev = self.segments[first - 1];
            // A lone '\r' ending the previous line may pair with a '\n' the edit produced.
            if prev.delimiter_length == 1 && buffer.char_at(prev.end_offset()) == Some('\r') {
                first -= 1;
            }
        }

        let delta = inserted as isize - removed as isize;
        let shift = |offset: usize| (offset as isize + delta) as usize;
        let region_start = self.segments[first].offset;
        while last + 1 < self.segments.len() {
            let new_end = shift(self.segments[last].total_end_offset());
            let ends_with_cr = new_end > region_start && buffer.char_at(new_end - 1) == Some('\r');
            if ends_with_cr && buffer.char_at(new_end) == Some('\n') {
                last += 1;
            } else {
                break;
            }
        }

        let at_end = last + 1 == self.segments.len();
        let region_end = shift(self.segments[last].total_end_offset());
        let rebuilt = scan_lines(
            buffer.chars_range(region_start, region_end - region_start),
            region_start,
            at_end,
        );

        let old_line_count = last - first + 1;
        let new_line_count = rebuilt.len();
        self.segments.splice(first..=last, rebuilt);
        for segment in &mut self.segments[first + new_line_count..] {
            segment.offset = shift(segment.offset);
        }

        // A lone '\r' pairing with a following '\n' drops a break the edit never touched.
        let net = new_line_count as isize - old_line_count as isize;
        let removed_line_breaks = removed_line_breaks.max((-net).max(0) as usize);
        let inserted_line_breaks = (removed_line_breaks as isize + net) as usize;

        LineChange {
            start_line,
            removed_line_breaks,
            inserted_line_breaks,
            first_line: first,
            old_line_count,
            new_line_count,
        }
    }
}

impl Default for LineManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Split characters starting at `base` into line segments.
///
/// When `at_end` is set, the trailing (possibly empty) undelimited line is emitted too.
fn scan_lines(chars: impl Iterator<Item = char>, base: usize, at_end: bool) -> Vec<LineSegment> {
    let mut segments = Vec::new();
    let mut chars = chars.peekable();
    let mut line_start = base;
    let mut offset = base;

    while let Some(ch) = chars.next() {
        offset += 1;
        let delimiter_length = match ch {
            '\n' => 1,
            '\r' if chars.peek() == Some(&'\n') => {
                chars.next();
                offset += 1;
                2
            }
            '\r' => 1,
            _ => continue,
        };
        segments.push(LineSegment {
            offset: line_start,
            total_length: offset - line_start,
            delimiter_length,
        });
        line_start = offset;
    }

    if at_end || offset > line_start {
        segments.push(LineSegment {
            offset: line_start,
            total_length: offset - line_start,
            delimiter_length: 0,
        });
    }
    segments
}
