use crate::rule_syntax::grammar::{
    DefinitionId, HighlightDefinition, HighlightRuleSet, RuleSetId, Span, SpanId, SpanStack,
};
use crate::rule_syntax::registry::HighlightingRegistry;
use codedoc_core::{Color, HighlightColor, TextWord};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Words of one line plus the spans still open after it.
pub struct LineTokens {
    /// Colored words, whitespace included, in column order.
    pub words: Vec<TextWord>,
    /// Spans that continue into the next line, innermost last.
    pub end_stack: SpanStack,
}

/// Tokenizes one line of text.
///
/// - `previous_end` is the span stack the previous line ended with (empty for the first line).
/// - Spans that close at the end of a line never appear in the returned stack.
/// - Columns in the returned words count `char`s, like every offset in `codedoc-core`.
pub fn tokenize_line(
    registry: &HighlightingRegistry,
    definition: DefinitionId,
    line: &str,
    previous_end: &[SpanId],
) -> LineTokens {
    let mut tokenizer = LineTokenizer::new(registry, definition, line, previous_end);
    tokenizer.run();
    tokenizer.finish()
}

struct LineTokenizer<'a> {
    registry: &'a HighlightingRegistry,
    definition: &'a HighlightDefinition,
    root: RuleSetId,
    default_color: HighlightColor,
    chars: Vec<char>,
    stack: SpanStack,
    words: Vec<TextWord>,
    current_length: usize,
    mark_next: Option<HighlightColor>,
}

impl<'a> LineTokenizer<'a> {
    fn new(
        registry: &'a HighlightingRegistry,
        definition: DefinitionId,
        line: &str,
        previous_end: &[SpanId],
    ) -> Self {
        let owner = registry.definition(definition);
        let mut stack = previous_end.to_vec();
        stack.retain(|id| !registry.span(*id).closes_at_eol());
        Self {
            registry,
            definition: owner,
            root: registry.effective_rule_set(registry.main_rule_set(definition)),
            default_color: owner.default_color(),
            chars: line.chars().collect(),
            stack,
            words: Vec::new(),
            current_length: 0,
            mark_next: None,
        }
    }

    fn current_span(&self) -> Option<&'a Span> {
        let registry = self.registry;
        self.stack.last().map(|id| registry.span(*id))
    }

    /// Rule set in effect at the current position; `None` inside a span without a rule.
    fn active_rule_set(&self) -> Option<&'a HighlightRuleSet> {
        let id = match self.stack.last() {
            Some(span) => self.registry.span(*span).resolved_rule_set()?,
            None => self.root,
        };
        Some(self.registry.rule_set(id))
    }

    fn escape_character(&self) -> Option<char> {
        match self.current_span() {
            Some(span) if span.no_escape_sequences => None,
            Some(span) => span
                .escape_character
                .or_else(|| self.active_rule_set().and_then(|rule_set| rule_set.escape_character)),
            None => self.active_rule_set().and_then(|rule_set| rule_set.escape_character),
        }
    }

    fn run(&mut self) {
        let len = self.chars.len();
        let mut i = 0;
        while i < len {
            let ch = self.chars[i];

            if ch == ' ' || ch == '\t' {
                self.flush_word(i);
                let color = match self.current_span() {
                    Some(span) if span.color.background.is_some() => span.color,
                    _ => self.default_color,
                };
                self.words.push(if ch == ' ' {
                    TextWord::space(i, color)
                } else {
                    TextWord::tab(i, color)
                });
                i += 1;
                continue;
            }

            if let Some(escape) = self.escape_character()
                && ch == escape
            {
                let doubling = self
                    .current_span()
                    .and_then(|span| span.end.as_deref())
                    .is_some_and(|end| end.len() == 1 && end[0] == escape);
                if !doubling {
                    let consumed = (len - i).min(2);
                    self.current_length += consumed;
                    i += consumed;
                    continue;
                }
                if self.chars.get(i + 1) == Some(&escape) {
                    self.current_length += 2;
                    i += 2;
                    continue;
                }
            }

            if self.stack.is_empty() && self.current_length == 0 && self.starts_number(i) {
                let length = scan_number(&self.chars, i);
                self.words.push(TextWord::word(
                    i,
                    length,
                    self.definition.digit_color,
                    false,
                ));
                self.mark_next = None;
                i += length;
                continue;
            }

            if let Some(length) = self.try_close_span(i) {
                i += length;
                continue;
            }

            if let Some(length) = self.try_open_span(i) {
                i += length;
                continue;
            }

            if self
                .active_rule_set()
                .is_some_and(|rule_set| rule_set.is_delimiter(ch))
            {
                self.flush_word(i);
                self.push_word(i, 1);
                i += 1;
                continue;
            }

            self.current_length += 1;
            i += 1;
        }
        self.flush_word(len);
    }

    fn finish(mut self) -> LineTokens {
        let registry = self.registry;
        self.stack.retain(|id| !registry.span(*id).closes_at_eol());
        LineTokens {
            words: self.words,
            end_stack: self.stack,
        }
    }

    fn starts_number(&self, i: usize) -> bool {
        let ch = self.chars[i];
        ch.is_ascii_digit()
            || (ch == '.' && self.chars.get(i + 1).is_some_and(|next| next.is_ascii_digit()))
    }

    fn try_close_span(&mut self, i: usize) -> Option<usize> {
        let id = *self.stack.last()?;
        let span = self.registry.span(id);
        let end = span.end.as_deref()?;
        if span.is_end_single_word && self.current_length != 0 {
            return None;
        }
        let ignore_case = span
            .ignore_case
            .unwrap_or_else(|| self.registry.rule_set(id.rule_set).ignore_case);
        if !matches_at(&self.chars, i, end, ignore_case) {
            return None;
        }
        self.flush_word(i);
        self.words
            .push(TextWord::word(i, end.len(), span.end_color(), false));
        self.stack.pop();
        Some(end.len())
    }

    fn try_open_span(&mut self, i: usize) -> Option<usize> {
        let id = match self.stack.last() {
            Some(span) => self.registry.span(*span).resolved_rule_set()?,
            None => self.root,
        };
        let rule_set = self.registry.rule_set(id);
        let at_line_start =
            self.current_length == 0 && self.words.iter().all(TextWord::is_whitespace);

        let (index, span) = rule_set.spans.iter().enumerate().find(|(_, span)| {
            if span.begin.is_empty() {
                return false;
            }
            if span.is_begin_single_word && self.current_length != 0 {
                return false;
            }
            if let Some(start_of_line) = span.is_begin_start_of_line
                && start_of_line != at_line_start
            {
                return false;
            }
            let ignore_case = span.ignore_case.unwrap_or(rule_set.ignore_case);
            matches_at(&self.chars, i, &span.begin, ignore_case)
        })?;

        self.flush_word(i);
        self.words
            .push(TextWord::word(i, span.begin.len(), span.begin_color(), false));
        self.stack.push(SpanId { rule_set: id, index });
        Some(span.begin.len())
    }

    fn flush_word(&mut self, end: usize) {
        if self.current_length == 0 {
            return;
        }
        let length = std::mem::take(&mut self.current_length);
        self.push_word(end - length, length);
    }

    fn push_word(&mut self, offset: usize, length: usize) {
        let text: String = self.chars[offset..offset + length].iter().collect();
        let rule_set = self.active_rule_set();

        let prev_marker = rule_set.and_then(|rule_set| rule_set.prev_markers.get(&text));
        if let Some(marker) = prev_marker
            && let Some(previous) = self.words.iter_mut().rev().find(|word| !word.is_whitespace())
            && previous.has_default_color
        {
            previous.color = marker.color;
            previous.has_default_color = false;
        }

        let keyword = rule_set.and_then(|rule_set| rule_set.keywords.get(&text)).copied();
        let (mut color, mut has_default_color) = match (self.current_span(), keyword) {
            (_, Some(keyword)) => (keyword, false),
            (Some(span), None) if span.color.color == Color::TRANSPARENT => {
                (self.default_color, true)
            }
            (Some(span), None) => (span.color, true),
            (None, None) => (self.default_color, true),
        };

        if let Some(marked) = self.mark_next.take() {
            color = marked;
            has_default_color = false;
        }
        if let Some(marker) = prev_marker
            && marker.mark_marker
        {
            color = marker.color;
            has_default_color = false;
        }
        if let Some(marker) = rule_set.and_then(|rule_set| rule_set.next_markers.get(&text)) {
            self.mark_next = Some(marker.color);
            if marker.mark_marker {
                color = marker.color;
                has_default_color = false;
            }
        }

        self.words
            .push(TextWord::word(offset, length, color, has_default_color));
    }
}

fn matches_at(chars: &[char], at: usize, pattern: &[char], ignore_case: bool) -> bool {
    let Some(window) = chars.get(at..at + pattern.len()) else {
        return false;
    };
    window.iter().zip(pattern).all(|(a, b)| {
        if ignore_case {
            a.to_lowercase().eq(b.to_lowercase())
        } else {
            a == b
        }
    })
}

/// Length of the numeric literal at `start`: decimal, `0x` hex, fraction, exponent and the
/// `F`/`M`/`D`/`U`/`L` suffixes.
fn scan_number(chars: &[char], start: usize) -> usize {
    let len = chars.len();
    let digit_at = |i: usize| chars.get(i).is_some_and(|ch| ch.is_ascii_digit());
    let mut i = start;

    if chars[i] == '0' && matches!(chars.get(i + 1), Some('x' | 'X')) {
        i += 2;
        while i < len && chars[i].is_ascii_hexdigit() {
            i += 1;
        }
    } else {
        while digit_at(i) {
            i += 1;
        }
        if chars.get(i) == Some(&'.') && digit_at(i + 1) {
            i += 1;
            while digit_at(i) {
                i += 1;
            }
        }
        if matches!(chars.get(i), Some('e' | 'E')) {
            let mut exponent = i + 1;
            if matches!(chars.get(exponent), Some('+' | '-')) {
                exponent += 1;
            }
            if digit_at(exponent) {
                i = exponent;
                while digit_at(i) {
                    i += 1;
                }
            }
        }
        if matches!(chars.get(i), Some('f' | 'F' | 'm' | 'M' | 'd' | 'D')) {
            return i + 1 - start;
        }
    }

    match chars.get(i) {
        Some('u' | 'U') => {
            i += 1;
            if matches!(chars.get(i), Some('l' | 'L')) {
                i += 1;
            }
        }
        Some('l' | 'L') => {
            i += 1;
            if matches!(chars.get(i), Some('u' | 'U')) {
                i += 1;
            }
        }
        _ => {}
    }
    i - start
}
