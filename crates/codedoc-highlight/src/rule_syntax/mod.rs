//! Rule-set syntax definitions.
//!
//! A definition is a YAML file of named rule sets. Each rule set lists spans (comments,
//! strings), keywords, delimiter characters and word markers. Spans may switch to another rule
//! set, and a rule set may delegate to the main rule set of another definition by name.

mod definition;
mod engine;
mod error;
mod grammar;
mod registry;

pub use definition::{RawColor, RawKeywords, RawMarker, RawRuleSet, RawSpan, SyntaxDefinition};
pub use engine::{LineTokens, tokenize_line};
pub use error::{HighlightingError, ResolutionWarning};
pub use grammar::{
    DefinitionId, HighlightDefinition, HighlightRuleSet, KeywordTable, LookupTable, RuleSetId,
    Span, SpanId, SpanStack, WordMarker,
};
pub use registry::HighlightingRegistry;
