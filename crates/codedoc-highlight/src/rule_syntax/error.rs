use thiserror::Error;

#[derive(Debug, Error)]
/// Errors produced while loading grammar definitions.
pub enum HighlightingError {
    #[error("YAML parse error: {0}")]
    /// YAML parsing failed.
    Yaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    /// Filesystem I/O failed.
    Io(#[from] std::io::Error),

    #[error("missing required field: {0}")]
    /// A required field was missing or empty.
    MissingField(&'static str),

    #[error("a definition named '{0}' is already registered")]
    /// Two definitions share a name.
    DuplicateDefinition(String),

    #[error("definition '{definition}' has no rule set named '{rule_set}'")]
    /// A rule set looked up by name does not exist.
    UnknownRuleSet {
        /// Definition searched.
        definition: String,
        /// Requested rule set name.
        rule_set: String,
    },

    #[error("invalid color '{value}': {message}")]
    /// A color string could not be parsed.
    InvalidColor {
        /// The offending value.
        value: String,
        /// Parser message.
        message: String,
    },

    #[error("escape character must be a single character, got '{0}'")]
    /// An `escapecharacter` entry was empty or longer than one character.
    InvalidEscapeCharacter(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Non-fatal problems found by [`HighlightingRegistry::resolve`].
///
/// The affected rule set or span falls back to highlighting with its own rule set.
///
/// [`HighlightingRegistry::resolve`]: crate::HighlightingRegistry::resolve
pub enum ResolutionWarning {
    #[error("{definition}: span '{span}' uses unknown rule set '{rule}'")]
    /// A span's `rule` names no rule set of its definition.
    UnknownSpanRule {
        /// Definition of the span.
        definition: String,
        /// Span name.
        span: String,
        /// The unresolved rule set name.
        rule: String,
    },

    #[error("{definition}: rule set '{rule_set}' references unknown definition '{reference}'")]
    /// A rule set's `reference` names no loaded definition.
    UnknownReference {
        /// Definition of the rule set.
        definition: String,
        /// Rule set name.
        rule_set: String,
        /// The unresolved definition name.
        reference: String,
    },

    #[error("{definition}: references from rule set '{rule_set}' form a cycle")]
    /// Following `reference` links from this rule set revisits a rule set.
    ReferenceCycle {
        /// Definition of the rule set.
        definition: String,
        /// Rule set name.
        rule_set: String,
    },
}
