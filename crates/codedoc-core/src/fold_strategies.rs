//! Built-in folding strategies.
//!
//! - [`IndentFoldingStrategy`]: a line followed by more deeply indented lines opens a fold.
//! - [`BraceFoldingStrategy`]: multi-line `{ ... }` blocks and `#region` / `#endregion` pairs.

use std::any::Any;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::DocumentConfig;
use crate::content::TextContent;
use crate::folding::{FoldMarker, FoldType, FoldingStrategy};

static REGION_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*#region\b(.*)$").expect("valid region pattern"));
static REGION_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*#endregion\b").expect("valid endregion pattern"));
static TYPE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(class|struct|enum|interface|trait|impl|record|namespace|module)\b")
        .expect("valid type header pattern")
});

/// Folds blocks by indentation depth.
#[derive(Debug, Clone)]
pub struct IndentFoldingStrategy {
    tab_width: usize,
}

impl IndentFoldingStrategy {
    /// Tabs count as `tab_width` columns.
    pub fn new(tab_width: usize) -> Self {
        Self {
            tab_width: tab_width.max(1),
        }
    }

    /// Use the tab width of `config`.
    pub fn from_config(config: &DocumentConfig) -> Self {
        Self::new(config.tab_width)
    }

    fn indentation(&self, line: &str) -> usize {
        let mut width = 0;
        for ch in line.chars() {
            match ch {
                ' ' => width += 1,
                '\t' => width += self.tab_width - width % self.tab_width,
                _ => break,
            }
        }
        width
    }
}

impl Default for IndentFoldingStrategy {
    fn default() -> Self {
        Self::new(4)
    }
}

impl FoldingStrategy for IndentFoldingStrategy {
    fn generate_fold_markers(
        &self,
        content: &TextContent,
        _file_name: &str,
        _parse_info: Option<&dyn Any>,
    ) -> Vec<FoldMarker> {
        struct Open {
            indent: usize,
            line: usize,
            offset: usize,
        }

        let lines = content.lines();
        let mut markers = Vec::new();
        let mut open: Vec<Open> = Vec::new();
        // (line, end offset of content) of the last non-blank line.
        let mut last_non_blank: Option<(usize, usize)> = None;

        fn close(block: Open, last: Option<(usize, usize)>, markers: &mut Vec<FoldMarker>) {
            if let Some((last_line, end_offset)) = last
                && last_line > block.line
            {
                markers.push(FoldMarker::new(block.offset, end_offset - block.offset));
            }
        }

        for (line, segment) in lines.segments().iter().enumerate() {
            let text = content.line_text_lossy(line);
            if text.trim().is_empty() {
                continue;
            }
            let indent = self.indentation(&text);
            while let Some(top) = open.last() {
                if indent > top.indent {
                    break;
                }
                if let Some(block) = open.pop() {
                    close(block, last_non_blank, &mut markers);
                }
            }
            open.push(Open {
                indent,
                line,
                offset: segment.end_offset(),
            });
            last_non_blank = Some((line, segment.end_offset()));
        }
        while let Some(block) = open.pop() {
            close(block, last_non_blank, &mut markers);
        }

        markers.sort_by_key(|marker| (marker.offset, marker.length));
        markers
    }
}

/// Folds brace blocks spanning several lines and `#region` directives.
///
/// Braces inside `//` and `/* */` comments and inside string or character literals are
/// ignored.
#[derive(Debug, Clone, Default)]
pub struct BraceFoldingStrategy;

impl BraceFoldingStrategy {
    /// Create the strategy.
    pub fn new() -> Self {
        Self
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Code,
    BlockComment,
    Literal(char),
}

impl FoldingStrategy for BraceFoldingStrategy {
    fn generate_fold_markers(
        &self,
        content: &TextContent,
        _file_name: &str,
        _parse_info: Option<&dyn Any>,
    ) -> Vec<FoldMarker> {
        let lines = content.lines();
        let mut markers = Vec::new();
        // (offset of '{', line, fold type)
        let mut braces: Vec<(usize, usize, FoldType)> = Vec::new();
        // (offset of '#region', line, name)
        let mut regions: Vec<(usize, usize, String)> = Vec::new();
        let mut state = ScanState::Code;

        for (line, segment) in lines.segments().iter().enumerate() {
            let chars = content.line_chars(line);
            let text: String = chars.iter().collect();

            if state == ScanState::Code {
                if let Some(captures) = REGION_START.captures(&text) {
                    let column = text.chars().take_while(|c| c.is_whitespace()).count();
                    let name = captures
                        .get(1)
                        .map(|m| m.as_str().trim().to_string())
                        .unwrap_or_default();
                    regions.push((segment.offset + column, line, name));
                    continue;
                }
                if REGION_END.is_match(&text) {
                    if let Some((offset, start_line, name)) = regions.pop()
                        && line > start_line
                    {
                        let fold_text = if name.is_empty() {
                            "#region".to_string()
                        } else {
                            name
                        };
                        markers.push(
                            FoldMarker::new(offset, segment.end_offset() - offset)
                                .with_type(FoldType::Region)
                                .with_fold_text(fold_text),
                        );
                    }
                    continue;
                }
            }

            let mut column = 0;
            while column < chars.len() {
                let ch = chars[column];
                let next = chars.get(column + 1).copied();
                match state {
                    ScanState::BlockComment => {
                        if ch == '*' && next == Some('/') {
                            state = ScanState::Code;
                            column += 1;
                        }
                    }
                    ScanState::Literal(quote) => {
                        if ch == '\\' {
                            column += 1;
                        } else if ch == quote {
                            state = ScanState::Code;
                        }
                    }
                    ScanState::Code => match ch {
                        '/' if next == Some('/') => break,
                        '/' if next == Some('*') => {
                            state = ScanState::BlockComment;
                            column += 1;
                        }
                        '"' | '\'' => state = ScanState::Literal(ch),
                        '{' => {
                            let header: String = chars[..column].iter().collect();
                            braces.push((segment.offset + column, line, classify_header(&header)));
                        }
                        '}' => {
                            if let Some((offset, start_line, fold_type)) = braces.pop()
                                && line > start_line
                            {
                                let end = segment.offset + column + 1;
                                markers.push(
                                    FoldMarker::new(offset, end - offset)
                                        .with_type(fold_type)
                                        .with_fold_text("{...}"),
                                );
                            }
                        }
                        _ => {}
                    },
                }
                column += 1;
            }
            // Literals do not continue past the end of a line.
            if matches!(state, ScanState::Literal(_)) {
                state = ScanState::Code;
            }
        }

        markers.sort_by_key(|marker| (marker.offset, marker.length));
        markers
    }
}

fn classify_header(header: &str) -> FoldType {
    if TYPE_HEADER.is_match(header) {
        FoldType::TypeBody
    } else if header.contains(')') {
        FoldType::MemberBody
    } else {
        FoldType::Unspecified
    }
}
