//! Error types for document operations.
//!
//! Every public operation that takes an offset, a range or a line number validates it before
//! touching any state. A rejected call leaves the document unchanged.

use thiserror::Error;

/// Error returned when a document operation receives an argument outside the current text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// A character offset lies beyond the end of the text.
    #[error("offset {offset} is out of range (text length {text_length})")]
    OffsetOutOfRange {
        /// Offending offset.
        offset: usize,
        /// Text length at the time of the call.
        text_length: usize,
    },

    /// A `(offset, length)` range does not fit inside the text.
    #[error("range {offset}+{length} is out of bounds (text length {text_length})")]
    RangeOutOfBounds {
        /// Range start.
        offset: usize,
        /// Range length.
        length: usize,
        /// Text length at the time of the call.
        text_length: usize,
    },

    /// A line number is not smaller than the number of lines.
    #[error("line {line} is out of range (line count {line_count})")]
    LineOutOfRange {
        /// Offending line number (0-based).
        line: usize,
        /// Number of lines at the time of the call.
        line_count: usize,
    },
}

/// Shorthand result type used throughout the crate.
pub type DocumentResult<T> = Result<T, DocumentError>;
