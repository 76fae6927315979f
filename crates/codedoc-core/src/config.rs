//! Document configuration.

use crate::gap_buffer::{DEFAULT_MAX_GAP_LENGTH, DEFAULT_MIN_GAP_LENGTH};
use crate::line_ending::LineTerminator;

/// Settings shared by a [`crate::Document`] and the components it owns.
///
/// `DocumentConfig` is a plain value; build it with struct update syntax or the `with_*`
/// helpers:
///
/// ```rust
/// use codedoc_core::{DocumentConfig, LineTerminator};
///
/// let config = DocumentConfig::default()
///     .with_tab_width(8)
///     .with_line_terminator(LineTerminator::CrLf);
/// assert_eq!(config.tab_width, 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentConfig {
    /// Visual width of a tab stop, in cells.
    pub tab_width: usize,
    /// Number of columns one indentation level occupies.
    pub indentation_size: usize,
    /// Whether indentation should be written with spaces instead of tabs.
    pub convert_tabs_to_spaces: bool,
    /// Delimiter inserted for new lines.
    pub line_terminator: LineTerminator,
    /// Whether folded regions hide lines in the visible-line mapping.
    pub enable_folding: bool,
    /// Gap length allocated when the gap buffer grows.
    pub min_gap_length: usize,
    /// Gap length above which the gap buffer compacts itself.
    pub max_gap_length: usize,
    /// Maximum number of undo records kept, `None` for unbounded.
    pub undo_limit: Option<usize>,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            tab_width: 4,
            indentation_size: 4,
            convert_tabs_to_spaces: false,
            line_terminator: LineTerminator::Lf,
            enable_folding: true,
            min_gap_length: DEFAULT_MIN_GAP_LENGTH,
            max_gap_length: DEFAULT_MAX_GAP_LENGTH,
            undo_limit: None,
        }
    }
}

impl DocumentConfig {
    /// Set the tab width (clamped to at least 1).
    pub fn with_tab_width(mut self, tab_width: usize) -> Self {
        self.tab_width = tab_width.max(1);
        self
    }

    /// Set the indentation width and whether it is written with spaces.
    pub fn with_indentation(mut self, indentation_size: usize, convert_tabs_to_spaces: bool) -> Self {
        self.indentation_size = indentation_size.max(1);
        self.convert_tabs_to_spaces = convert_tabs_to_spaces;
        self
    }

    /// Set the new-line delimiter.
    pub fn with_line_terminator(mut self, line_terminator: LineTerminator) -> Self {
        self.line_terminator = line_terminator;
        self
    }

    /// Enable or disable folding in the visible-line mapping.
    pub fn with_folding(mut self, enable_folding: bool) -> Self {
        self.enable_folding = enable_folding;
        self
    }

    /// Bound the undo history.
    pub fn with_undo_limit(mut self, undo_limit: Option<usize>) -> Self {
        self.undo_limit = undo_limit;
        self
    }

    /// Text of one indentation level.
    ///
    /// ```rust
    /// use codedoc_core::DocumentConfig;
    ///
    /// assert_eq!(DocumentConfig::default().with_indentation(2, true).indentation_string(), "  ");
    /// ```
    pub fn indentation_string(&self) -> String {
        if self.convert_tabs_to_spaces {
            " ".repeat(self.indentation_size)
        } else {
            "\t".to_string()
        }
    }
}
