//! Text storage plus line index, kept in lockstep.
//!
//! [`TextContent`] is the read side handed to folding strategies and highlighters. Mutation
//! goes through the owning [`crate::Document`], which also reconciles markers and events.

use crate::error::{DocumentError, DocumentResult};
use crate::gap_buffer::GapTextBuffer;
use crate::line_manager::{LineChange, LineManager, LineSegment, TextPosition};

/// The document text and its line structure.
#[derive(Debug, Clone, Default)]
pub struct TextContent {
    buffer: GapTextBuffer,
    lines: LineManager,
}

impl TextContent {
    /// Empty content.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty content whose buffer uses the given gap limits.
    pub fn with_gap_limits(min_gap_length: usize, max_gap_length: usize) -> Self {
        Self {
            buffer: GapTextBuffer::with_gap_limits(min_gap_length, max_gap_length),
            lines: LineManager::new(),
        }
    }

    /// The character buffer.
    pub fn buffer(&self) -> &GapTextBuffer {
        &self.buffer
    }

    /// The line index.
    pub fn lines(&self) -> &LineManager {
        &self.lines
    }

    /// Text length in characters.
    pub fn text_length(&self) -> usize {
        self.buffer.len()
    }

    /// The full text.
    pub fn text(&self) -> String {
        self.buffer.text()
    }

    /// Number of lines.
    pub fn line_count(&self) -> usize {
        self.lines.line_count()
    }

    /// Check that `[offset, offset + length)` lies inside the text.
    pub fn check_range(&self, offset: usize, length: usize) -> DocumentResult<()> {
        let text_length = self.text_length();
        if offset > text_length || length > text_length - offset {
            return Err(DocumentError::RangeOutOfBounds {
                offset,
                length,
                text_length,
            });
        }
        Ok(())
    }

    /// Check that `offset` is a valid caret offset (`0..=text_length`).
    pub fn check_offset(&self, offset: usize) -> DocumentResult<()> {
        let text_length = self.text_length();
        if offset > text_length {
            return Err(DocumentError::OffsetOutOfRange {
                offset,
                text_length,
            });
        }
        Ok(())
    }

    /// Text of `[offset, offset + length)`.
    pub fn get_text(&self, offset: usize, length: usize) -> DocumentResult<String> {
        self.check_range(offset, length)?;
        Ok(self.buffer.get_text(offset, length))
    }

    /// Character at `offset`.
    pub fn get_char_at(&self, offset: usize) -> DocumentResult<char> {
        self.buffer
            .char_at(offset)
            .ok_or(DocumentError::OffsetOutOfRange {
                offset,
                text_length: self.text_length(),
            })
    }

    /// Segment of `line`.
    pub fn line_segment(&self, line: usize) -> DocumentResult<LineSegment> {
        self.lines
            .segment(line)
            .ok_or(DocumentError::LineOutOfRange {
                line,
                line_count: self.line_count(),
            })
    }

    /// Line number containing `offset`.
    pub fn line_number_for_offset(&self, offset: usize) -> DocumentResult<usize> {
        self.check_offset(offset)?;
        Ok(self.lines.line_number_for_offset(offset))
    }

    /// Segment of the line containing `offset`.
    pub fn line_segment_for_offset(&self, offset: usize) -> DocumentResult<LineSegment> {
        self.check_offset(offset)?;
        Ok(self.lines.segment_for_offset(offset))
    }

    /// Visible text of `line`.
    pub fn line_text(&self, line: usize) -> DocumentResult<String> {
        let segment = self.line_segment(line)?;
        Ok(self.buffer.get_text(segment.offset, segment.length()))
    }

    /// Visible text of `line`, or an empty string when out of range.
    pub fn line_text_lossy(&self, line: usize) -> String {
        self.line_text(line).unwrap_or_default()
    }

    /// Visible characters of `line`, or nothing when out of range.
    pub fn line_chars(&self, line: usize) -> Vec<char> {
        match self.lines.segment(line) {
            Some(segment) => self
                .buffer
                .chars_range(segment.offset, segment.length())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Convert an offset to a line/column position.
    pub fn offset_to_position(&self, offset: usize) -> DocumentResult<TextPosition> {
        self.check_offset(offset)?;
        Ok(self.lines.offset_to_position(offset))
    }

    /// Convert a position to an offset; the column is clamped to the line's content.
    pub fn position_to_offset(&self, position: TextPosition) -> DocumentResult<usize> {
        self.lines
            .position_to_offset(position)
            .ok_or(DocumentError::LineOutOfRange {
                line: position.line,
                line_count: self.line_count(),
            })
    }

    /// Replace the whole text.
    pub(crate) fn set_content(&mut self, text: &str) {
        self.buffer.set_content(text);
        self.lines.set_content(&self.buffer);
    }

    /// Apply a validated replace to buffer and line index.
    pub(crate) fn replace(&mut self, offset: usize, length: usize, text: &str) -> LineChange {
        self.buffer.replace(offset, length, text);
        self.lines
            .replace(&self.buffer, offset, length, text.chars().count())
    }
}
