#![warn(missing_docs)]
//! `codedoc-highlight` - rule-set syntax highlighting for `codedoc-core` documents.
//!
//! Definitions are YAML files of rule sets (spans, keywords, delimiters, word markers). They are
//! compiled into a [`HighlightingRegistry`], resolved once, and shared behind an `Arc` by any
//! number of [`RuleSetHighlighter`]s plugged into documents with
//! `Document::set_highlighting_strategy`.
//!
//! ```rust
//! use std::sync::Arc;
//! use codedoc_core::Document;
//! use codedoc_highlight::{HighlightingRegistry, RuleSetHighlighter};
//!
//! let mut registry = HighlightingRegistry::new();
//! registry
//!     .load_from_str(
//!         r#"
//! name: Mini
//! extensions: [".mini"]
//! rulesets:
//!   - delimiters: "();"
//!     spans:
//!       - name: Comment
//!         begin: "/*"
//!         end: "*/"
//!         color: Green
//!     keywords:
//!       - color: Blue
//!         words: [let]
//! "#,
//!     )
//!     .unwrap();
//! registry.resolve();
//!
//! let highlighter = RuleSetHighlighter::for_file(Arc::new(registry), "a.mini").unwrap();
//! let mut document = Document::new("let x; /* note\nstill comment */ let");
//! document.set_highlighting_strategy(Box::new(highlighter));
//!
//! let words = document.line_words(1).unwrap();
//! assert_eq!(words[0].color.color, codedoc_core::Color::rgb(0, 128, 0));
//! ```

pub mod rule_syntax;

mod highlighter;

pub use highlighter::RuleSetHighlighter;
pub use rule_syntax::*;
