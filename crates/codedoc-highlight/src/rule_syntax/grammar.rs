use crate::rule_syntax::definition::{RawColor, RawMarker, RawRuleSet, RawSpan, SyntaxDefinition};
use crate::rule_syntax::error::HighlightingError;
use codedoc_core::{Color, HighlightColor, default_environment_colors};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Index of a definition inside a [`HighlightingRegistry`](crate::HighlightingRegistry).
pub struct DefinitionId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// A rule set of a registered definition.
pub struct RuleSetId {
    /// Owning definition.
    pub definition: DefinitionId,
    /// Position in [`HighlightDefinition::rule_sets`].
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// A span of a registered rule set. Span stacks are made of these.
pub struct SpanId {
    /// Owning rule set.
    pub rule_set: RuleSetId,
    /// Position in [`HighlightRuleSet::spans`].
    pub index: usize,
}

/// Spans open at some point of the text, innermost last.
pub type SpanStack = Vec<SpanId>;

#[derive(Debug, Clone, Default)]
/// Word lookup with optional case folding.
pub struct LookupTable<T> {
    ignore_case: bool,
    entries: HashMap<String, T>,
}

impl<T> LookupTable<T> {
    /// An empty table.
    pub fn new(ignore_case: bool) -> Self {
        Self {
            ignore_case,
            entries: HashMap::new(),
        }
    }

    /// Whether lookups fold case.
    pub fn ignore_case(&self) -> bool {
        self.ignore_case
    }

    /// Add or replace `word`.
    pub fn insert(&mut self, word: &str, value: T) {
        let key = self.key(word);
        self.entries.insert(key, value);
    }

    /// Value stored for `word`.
    pub fn get(&self, word: &str) -> Option<&T> {
        if self.ignore_case {
            self.entries.get(&word.to_lowercase())
        } else {
            self.entries.get(word)
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn key(&self, word: &str) -> String {
        if self.ignore_case {
            word.to_lowercase()
        } else {
            word.to_string()
        }
    }
}

/// Keyword to color table of a rule set.
pub type KeywordTable = LookupTable<HighlightColor>;

#[derive(Debug, Clone, PartialEq, Eq)]
/// A word that recolors a neighbouring word.
///
/// As a previous marker it recolors the closest non-whitespace word before it; as a next
/// marker it recolors the word right after it.
pub struct WordMarker {
    /// Marker word.
    pub what: String,
    /// Style given to the marked word.
    pub color: HighlightColor,
    /// Whether the marker word itself is restyled too.
    pub mark_marker: bool,
}

impl WordMarker {
    /// Marker recoloring with `color`.
    pub fn new(what: impl Into<String>, color: HighlightColor) -> Self {
        Self {
            what: what.into(),
            color,
            mark_marker: false,
        }
    }

    /// Also restyle the marker word.
    pub fn mark_marker(mut self, mark_marker: bool) -> Self {
        self.mark_marker = mark_marker;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A lexical region such as a comment or string literal.
pub struct Span {
    /// Display name.
    pub name: String,
    /// Opening delimiter.
    pub begin: Vec<char>,
    /// Closing delimiter; `None` runs to the end of the line.
    pub end: Option<Vec<char>>,
    /// Style of the content.
    pub color: HighlightColor,
    /// Style of the opening delimiter.
    pub begin_color: Option<HighlightColor>,
    /// Style of the closing delimiter.
    pub end_color: Option<HighlightColor>,
    /// Name of the rule set active inside the span. Without one, the content is plain.
    pub rule: Option<String>,
    /// Whether the end of the line closes the span.
    pub stop_eol: bool,
    /// Escape character inside the span.
    pub escape_character: Option<char>,
    /// Disable escapes inside the span.
    pub no_escape_sequences: bool,
    /// Opening delimiter must start a word.
    pub is_begin_single_word: bool,
    /// Closing delimiter must start a word.
    pub is_end_single_word: bool,
    /// `Some(true)`: only at line start; `Some(false)`: never at line start.
    pub is_begin_start_of_line: Option<bool>,
    /// Case-insensitive delimiters; `None` follows the containing rule set.
    pub ignore_case: Option<bool>,
    pub(crate) resolved_rule_set: Option<RuleSetId>,
}

impl Span {
    /// A span opened by `begin`, closed by the end of the line until [`with_end`] is called.
    ///
    /// [`with_end`]: Self::with_end
    pub fn new(name: impl Into<String>, begin: &str) -> Self {
        Self {
            name: name.into(),
            begin: begin.chars().collect(),
            end: None,
            color: HighlightColor::default(),
            begin_color: None,
            end_color: None,
            rule: None,
            stop_eol: false,
            escape_character: None,
            no_escape_sequences: false,
            is_begin_single_word: false,
            is_end_single_word: false,
            is_begin_start_of_line: None,
            ignore_case: None,
            resolved_rule_set: None,
        }
    }

    /// Set the closing delimiter.
    pub fn with_end(mut self, end: &str) -> Self {
        self.end = (!end.is_empty()).then(|| end.chars().collect());
        self
    }

    /// Set the content style.
    pub fn with_color(mut self, color: HighlightColor) -> Self {
        self.color = color;
        self
    }

    /// Set the delimiter styles.
    pub fn with_delimiter_colors(
        mut self,
        begin: Option<HighlightColor>,
        end: Option<HighlightColor>,
    ) -> Self {
        self.begin_color = begin;
        self.end_color = end;
        self
    }

    /// Use the rule set `rule` inside the span.
    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = Some(rule.into());
        self
    }

    /// Close the span at the end of the line.
    pub fn stop_at_eol(mut self, stop_eol: bool) -> Self {
        self.stop_eol = stop_eol;
        self
    }

    /// Set the escape character.
    pub fn with_escape_character(mut self, escape: char) -> Self {
        self.escape_character = Some(escape);
        self
    }

    /// Style of the opening delimiter.
    pub fn begin_color(&self) -> HighlightColor {
        self.begin_color.unwrap_or(self.color)
    }

    /// Style of the closing delimiter.
    pub fn end_color(&self) -> HighlightColor {
        self.end_color.unwrap_or(self.color)
    }

    /// Whether the end of a line closes the span: `stop_eol` or no closing delimiter.
    pub fn closes_at_eol(&self) -> bool {
        self.stop_eol || self.end.is_none()
    }

    /// Rule set active inside the span after resolution.
    pub fn resolved_rule_set(&self) -> Option<RuleSetId> {
        self.resolved_rule_set
    }
}

#[derive(Debug, Clone)]
/// A named set of spans, keywords and markers.
pub struct HighlightRuleSet {
    /// Name; empty for the main rule set.
    pub name: String,
    /// Definition whose main rule set highlights in place of this one.
    pub reference: Option<String>,
    /// Case-insensitive keywords and delimiters.
    pub ignore_case: bool,
    /// Escape character active outside spans.
    pub escape_character: Option<char>,
    /// Characters that always end a word.
    pub delimiters: HashSet<char>,
    /// Spans in priority order.
    pub spans: Vec<Span>,
    /// Keyword colors.
    pub keywords: KeywordTable,
    /// Markers recoloring the preceding word.
    pub prev_markers: LookupTable<WordMarker>,
    /// Markers recoloring the following word.
    pub next_markers: LookupTable<WordMarker>,
    pub(crate) effective: Option<RuleSetId>,
}

impl HighlightRuleSet {
    /// An empty, case-sensitive rule set.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_case(name, false)
    }

    /// An empty rule set with the given case sensitivity.
    pub fn with_case(name: impl Into<String>, ignore_case: bool) -> Self {
        Self {
            name: name.into(),
            reference: None,
            ignore_case,
            escape_character: None,
            delimiters: HashSet::new(),
            spans: Vec::new(),
            keywords: KeywordTable::new(ignore_case),
            prev_markers: LookupTable::new(ignore_case),
            next_markers: LookupTable::new(ignore_case),
            effective: None,
        }
    }

    /// Add a span.
    pub fn with_span(mut self, span: Span) -> Self {
        self.spans.push(span);
        self
    }

    /// Add keywords sharing one color.
    pub fn with_keywords<'a>(
        mut self,
        color: HighlightColor,
        words: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        for word in words {
            self.keywords.insert(word, color);
        }
        self
    }

    /// Set the delimiter characters.
    pub fn with_delimiters(mut self, delimiters: &str) -> Self {
        self.delimiters = delimiters.chars().collect();
        self
    }

    /// Add a previous-word marker.
    pub fn with_prev_marker(mut self, marker: WordMarker) -> Self {
        let what = marker.what.clone();
        self.prev_markers.insert(&what, marker);
        self
    }

    /// Add a next-word marker.
    pub fn with_next_marker(mut self, marker: WordMarker) -> Self {
        let what = marker.what.clone();
        self.next_markers.insert(&what, marker);
        self
    }

    /// Set the escape character.
    pub fn with_escape_character(mut self, escape: char) -> Self {
        self.escape_character = Some(escape);
        self
    }

    /// Delegate highlighting to the main rule set of definition `reference`.
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Whether `ch` ends a word.
    pub fn is_delimiter(&self, ch: char) -> bool {
        self.delimiters.contains(&ch)
    }

    /// The rule set that actually highlights in place of this one after resolution.
    pub fn effective_rule_set(&self) -> Option<RuleSetId> {
        self.effective
    }
}

#[derive(Debug, Clone)]
/// A complete grammar: rule sets plus the colors shared by all of them.
pub struct HighlightDefinition {
    /// Unique name.
    pub name: String,
    /// File extensions with leading dot.
    pub extensions: Vec<String>,
    /// Style of numeric literals.
    pub digit_color: HighlightColor,
    /// Environment colors, seeded from the defaults.
    pub environment: HashMap<String, HighlightColor>,
    /// Rule sets.
    pub rule_sets: Vec<HighlightRuleSet>,
}

impl HighlightDefinition {
    /// A definition with default environment colors and no rule sets.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extensions: Vec::new(),
            digit_color: HighlightColor::default(),
            environment: default_environment_colors(),
            rule_sets: Vec::new(),
        }
    }

    /// Set the handled extensions.
    pub fn with_extensions<'a>(mut self, extensions: impl IntoIterator<Item = &'a str>) -> Self {
        self.extensions = extensions.into_iter().map(str::to_string).collect();
        self
    }

    /// Set the digit color.
    pub fn with_digit_color(mut self, color: HighlightColor) -> Self {
        self.digit_color = color;
        self
    }

    /// Override one environment color.
    pub fn with_environment_color(mut self, name: impl Into<String>, color: HighlightColor) -> Self {
        self.environment.insert(name.into(), color);
        self
    }

    /// Add a rule set.
    pub fn with_rule_set(mut self, rule_set: HighlightRuleSet) -> Self {
        self.rule_sets.push(rule_set);
        self
    }

    /// Default text style (`Default` environment color).
    pub fn default_color(&self) -> HighlightColor {
        self.environment.get("Default").copied().unwrap_or_default()
    }

    /// Index of the main rule set: the unnamed one, else the first.
    pub fn main_rule_set(&self) -> Option<usize> {
        if self.rule_sets.is_empty() {
            return None;
        }
        Some(
            self.rule_sets
                .iter()
                .position(|rule_set| rule_set.name.is_empty())
                .unwrap_or(0),
        )
    }

    /// Index of the rule set named `name`.
    pub fn rule_set_index(&self, name: &str) -> Option<usize> {
        self.rule_sets.iter().position(|rule_set| rule_set.name == name)
    }

    /// Whether `file_name` ends with one of the extensions (case-insensitive).
    pub fn handles_file(&self, file_name: &str) -> bool {
        let lower = file_name.to_lowercase();
        self.extensions
            .iter()
            .any(|extension| lower.ends_with(&extension.to_lowercase()))
    }

    /// Build a definition from its raw YAML form.
    pub fn compile(definition: SyntaxDefinition) -> Result<Self, HighlightingError> {
        if definition.name.trim().is_empty() {
            return Err(HighlightingError::MissingField("name"));
        }
        if definition.rulesets.is_empty() {
            return Err(HighlightingError::MissingField("rulesets"));
        }

        let mut compiled = Self::new(definition.name);
        compiled.extensions = definition.extensions;
        for (name, raw) in &definition.environment {
            compiled.environment.insert(name.clone(), compile_color(raw)?);
        }
        compiled.digit_color = match &definition.digits {
            Some(digits) => compile_color(digits)?,
            None => compiled.default_color(),
        };
        for raw in definition.rulesets {
            compiled.rule_sets.push(compile_rule_set(raw)?);
        }
        Ok(compiled)
    }
}

fn compile_rule_set(raw: RawRuleSet) -> Result<HighlightRuleSet, HighlightingError> {
    let mut rule_set = HighlightRuleSet::with_case(raw.name, raw.ignorecase)
        .with_delimiters(&raw.delimiters);
    rule_set.reference = raw.reference.filter(|reference| !reference.is_empty());
    rule_set.escape_character = compile_escape(raw.escapecharacter.as_deref())?;

    for span in raw.spans {
        rule_set.spans.push(compile_span(span)?);
    }
    for group in raw.keywords {
        let color = compile_color(&group.color)?;
        for word in &group.words {
            rule_set.keywords.insert(word, color);
        }
    }
    for marker in raw.markprevious {
        let marker = compile_marker(marker)?;
        rule_set = rule_set.with_prev_marker(marker);
    }
    for marker in raw.markfollowing {
        let marker = compile_marker(marker)?;
        rule_set = rule_set.with_next_marker(marker);
    }
    Ok(rule_set)
}

fn compile_span(raw: RawSpan) -> Result<Span, HighlightingError> {
    if raw.begin.is_empty() {
        return Err(HighlightingError::MissingField("spans.begin"));
    }
    let mut span = Span::new(raw.name, &raw.begin)
        .with_end(raw.end.as_deref().unwrap_or_default())
        .with_color(compile_color(&raw.color)?)
        .stop_at_eol(raw.stopateol);
    span.begin_color = raw.begin_color.as_ref().map(compile_color).transpose()?;
    span.end_color = raw.end_color.as_ref().map(compile_color).transpose()?;
    span.rule = raw.rule.filter(|rule| !rule.is_empty());
    span.escape_character = compile_escape(raw.escapecharacter.as_deref())?;
    span.no_escape_sequences = raw.noescapesequences;
    span.is_begin_single_word = raw.isbeginsingleword;
    span.is_end_single_word = raw.isendsingleword;
    span.is_begin_start_of_line = raw.isbeginstartofline;
    span.ignore_case = raw.ignorecase;
    Ok(span)
}

fn compile_marker(raw: RawMarker) -> Result<WordMarker, HighlightingError> {
    if raw.what.is_empty() {
        return Err(HighlightingError::MissingField("what"));
    }
    Ok(WordMarker::new(raw.what, compile_color(&raw.color)?).mark_marker(raw.markmarker))
}

fn compile_escape(raw: Option<&str>) -> Result<Option<char>, HighlightingError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(Some(ch)),
        _ => Err(HighlightingError::InvalidEscapeCharacter(raw.to_string())),
    }
}

fn parse_color(value: &str) -> Result<Color, HighlightingError> {
    value
        .parse::<Color>()
        .map_err(|err| HighlightingError::InvalidColor {
            value: value.to_string(),
            message: err.to_string(),
        })
}

fn compile_color(raw: &RawColor) -> Result<HighlightColor, HighlightingError> {
    let color = match &raw.color {
        Some(value) => parse_color(value)?,
        None => Color::BLACK,
    };
    let mut compiled = HighlightColor::new(color).bold(raw.bold).italic(raw.italic);
    if let Some(background) = &raw.bgcolor {
        compiled = compiled.with_background(parse_color(background)?);
    }
    Ok(compiled)
}
