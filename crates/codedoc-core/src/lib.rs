#![warn(missing_docs)]
//! Codedoc Core - Document Model for Embeddable Code Editors
//!
//! # Overview
//!
//! `codedoc-core` is the headless document layer of a code editor control. It owns the text and
//! everything an editor derives from it: the line index, fold markers, text markers, bookmarks,
//! selections, the undo history and per-line highlighting. It never draws anything; a view layer
//! reads words and fold state from it and repaints what the update queue tells it to.
//!
//! # Core Features
//!
//! - **Gap Buffer Storage**: amortized O(1) edits near the last edit position
//! - **Line Index**: O(log n) offset to line lookups, CR/LF/CRLF aware
//! - **Segment Tracking**: markers, folds and selections follow every edit
//! - **Code Folding**: pluggable strategies, fold state preserved across regeneration
//! - **Undo/Redo**: grouped operations, optional size limit
//! - **Highlighting Hook**: per-line word cache spliced and re-tokenized incrementally
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Document (edits, events, undo, updates)    │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Highlighting Strategy (line word cache)    │  ← Coloring
//! ├─────────────────────────────────────────────┤
//! │  Folding / Markers / Bookmarks / Selection  │  ← Tracked Segments
//! ├─────────────────────────────────────────────┤
//! │  Line Manager (line segments)               │  ← Line Access
//! ├─────────────────────────────────────────────┤
//! │  Gap Buffer Storage                         │  ← Text Storage
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use codedoc_core::{BraceFoldingStrategy, Document, TextPosition};
//!
//! let mut document = Document::new("fn main() {\n    body();\n}\n");
//! document.set_folding_strategy(Box::new(BraceFoldingStrategy::new()));
//! document.update_foldings("main.rs", None);
//!
//! assert!(document.toggle_fold_at_line(0));
//! assert_eq!(document.total_visible_lines(), 2);
//!
//! document.insert(0, "// entry\n").unwrap();
//! assert_eq!(document.get_visible_line(1), 1);
//! assert_eq!(
//!     document.offset_to_position(12).unwrap(),
//!     TextPosition::new(1, 3)
//! );
//! ```
//!
//! # Module Description
//!
//! - [`gap_buffer`] - gap buffer text storage
//! - [`line_manager`] - line segments and offset/position conversion
//! - [`content`] - validated read access to text and lines
//! - [`segment`] - offset ranges that follow edits
//! - [`folding`] / [`fold_strategies`] - fold markers, visible lines and built-in strategies
//! - [`markers`], [`bookmarks`], [`selection`] - tracked decorations
//! - [`undo`] - undo/redo history
//! - [`highlight`] - colors, words and the highlighting strategy hook
//! - [`document`] - the facade tying everything together
//!
//! # Unicode Support
//!
//! Offsets and columns count Unicode scalar values (`char`). Display columns with wide
//! characters and tabs, and grapheme-cluster caret steps, live in [`text_utilities`].

pub mod bookmarks;
pub mod config;
pub mod content;
pub mod delta;
pub mod document;
pub mod error;
pub mod fold_strategies;
pub mod folding;
pub mod gap_buffer;
pub mod highlight;
pub mod line_ending;
pub mod line_manager;
pub mod markers;
pub mod segment;
pub mod selection;
pub mod text_utilities;
pub mod undo;
pub mod update;

pub use bookmarks::{Bookmark, BookmarkManager};
pub use config::DocumentConfig;
pub use content::TextContent;
pub use delta::DocumentChange;
pub use document::{Document, DocumentEvent, DocumentEventCallback};
pub use error::{DocumentError, DocumentResult};
pub use fold_strategies::{BraceFoldingStrategy, IndentFoldingStrategy};
pub use folding::{FoldMarker, FoldType, FoldingManager, FoldingStrategy};
pub use gap_buffer::GapTextBuffer;
pub use highlight::{
    Color, HighlightColor, HighlightingStrategy, ParseColorError, PlainHighlighting, TextWord,
    WordKind, default_environment_colors,
};
pub use line_ending::LineTerminator;
pub use line_manager::{LineChange, LineManager, LineSegment, TextPosition};
pub use markers::{MarkerStrategy, TextMarker, TextMarkerType};
pub use segment::{Segment, update_segment_list_on_document_change};
pub use selection::{Selection, SelectionManager};
pub use undo::{UndoOperation, UndoStack};
pub use update::{TextAreaUpdate, UpdateQueue};
