use crate::rule_syntax::{DefinitionId, HighlightingRegistry, SpanId, SpanStack, tokenize_line};
use codedoc_core::{HighlightColor, HighlightingStrategy, LineChange, TextContent, TextWord};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
struct CachedLine {
    words: Option<Vec<TextWord>>,
    end_stack: Option<SpanStack>,
}

/// A [`HighlightingStrategy`] driven by one definition of a shared [`HighlightingRegistry`].
///
/// It caches the words and the closing span stack of every line. After an edit only the
/// changed lines are re-tokenized, continuing downwards while a line's closing stack differs
/// from the one cached before the edit.
#[derive(Debug)]
pub struct RuleSetHighlighter {
    registry: Arc<HighlightingRegistry>,
    definition: DefinitionId,
    lines: Vec<CachedLine>,
}

impl RuleSetHighlighter {
    /// Highlight with `definition` from `registry`.
    pub fn new(registry: Arc<HighlightingRegistry>, definition: DefinitionId) -> Self {
        if !registry.is_resolved() {
            log::warn!(
                "highlighting with '{}' before its registry was resolved",
                registry.definition(definition).name
            );
        }
        Self {
            registry,
            definition,
            lines: Vec::new(),
        }
    }

    /// Highlight with the first definition handling `file_name`, if any.
    pub fn for_file(registry: Arc<HighlightingRegistry>, file_name: &str) -> Option<Self> {
        let definition = registry.find_for_file(file_name)?;
        Some(Self::new(registry, definition))
    }

    /// The shared registry.
    pub fn registry(&self) -> &Arc<HighlightingRegistry> {
        &self.registry
    }

    /// The definition in use.
    pub fn definition(&self) -> DefinitionId {
        self.definition
    }

    /// Spans still open at the end of `line`, if it was tokenized.
    pub fn line_span_stack(&self, line: usize) -> Option<&[SpanId]> {
        self.lines.get(line)?.end_stack.as_deref()
    }

    fn tokenize_into(&mut self, content: &TextContent, line: usize) -> bool {
        let previous = match line {
            0 => None,
            _ => self.lines[line - 1].end_stack.as_deref(),
        };
        let tokens = tokenize_line(
            &self.registry,
            self.definition,
            &content.line_text_lossy(line),
            previous.unwrap_or_default(),
        );
        let cached = &mut self.lines[line];
        let changed = cached.end_stack.as_ref() != Some(&tokens.end_stack);
        cached.words = Some(tokens.words);
        cached.end_stack = Some(tokens.end_stack);
        changed
    }
}

impl HighlightingStrategy for RuleSetHighlighter {
    fn name(&self) -> &str {
        &self.registry.definition(self.definition).name
    }

    fn extensions(&self) -> &[String] {
        &self.registry.definition(self.definition).extensions
    }

    fn default_color(&self) -> HighlightColor {
        self.registry.definition(self.definition).default_color()
    }

    fn environment_color(&self, name: &str) -> Option<HighlightColor> {
        self.registry
            .definition(self.definition)
            .environment
            .get(name)
            .copied()
    }

    fn reset(&mut self, line_count: usize) {
        self.lines = vec![CachedLine::default(); line_count];
    }

    fn lines_replaced(&mut self, change: &LineChange) {
        let start = change.first_line.min(self.lines.len());
        let end = (change.first_line + change.old_line_count).min(self.lines.len());
        let carried = if end > start {
            self.lines[end - 1].end_stack.take()
        } else {
            None
        };
        let mut replacement = vec![CachedLine::default(); change.new_line_count];
        if let Some(last) = replacement.last_mut() {
            last.end_stack = carried;
        }
        self.lines.splice(start..end, replacement);
    }

    fn mark_tokens(&mut self, content: &TextContent) {
        self.reset(content.line_count());
        for line in 0..self.lines.len() {
            self.tokenize_into(content, line);
        }
    }

    fn mark_tokens_in_lines(&mut self, content: &TextContent, lines: &[usize]) -> bool {
        let line_count = content.line_count();
        self.lines.resize(line_count, CachedLine::default());

        let mut requested: Vec<usize> = lines.iter().copied().filter(|&l| l < line_count).collect();
        requested.sort_unstable();
        requested.dedup();

        let mut spilled = false;
        let mut done_until = 0;
        for &first in &requested {
            if first < done_until {
                continue;
            }
            let mut line = first;
            loop {
                let changed = self.tokenize_into(content, line);
                line += 1;
                done_until = line;
                if line >= line_count || !changed {
                    break;
                }
                if requested.binary_search(&line).is_err() {
                    spilled = true;
                }
            }
        }

        if spilled {
            log::debug!(
                "{}: span state change re-tokenized lines up to {done_until}",
                self.name()
            );
        }
        spilled
    }

    fn line_words(&self, line: usize) -> Option<&[TextWord]> {
        self.lines.get(line)?.words.as_deref()
    }
}
