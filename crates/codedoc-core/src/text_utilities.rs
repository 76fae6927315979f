//! Word navigation and column helpers used by caret movement and indentation.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;

use crate::content::TextContent;

/// Coarse character class used for word boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterType {
    /// Letters, digits and `_`.
    LetterDigitOrUnderscore,
    /// Whitespace.
    WhiteSpace,
    /// Anything else.
    Other,
}

/// Classify `ch`.
pub fn get_character_type(ch: char) -> CharacterType {
    if is_letter_digit_or_underscore(ch) {
        CharacterType::LetterDigitOrUnderscore
    } else if ch.is_whitespace() {
        CharacterType::WhiteSpace
    } else {
        CharacterType::Other
    }
}

/// Whether `ch` belongs to an identifier-like word.
pub fn is_letter_digit_or_underscore(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

fn char_type_at(content: &TextContent, offset: usize) -> Option<CharacterType> {
    content.buffer().char_at(offset).map(get_character_type)
}

/// Start of the word ending at or containing `offset`, not crossing the line start.
pub fn find_word_start(content: &TextContent, offset: usize) -> usize {
    let offset = offset.min(content.text_length());
    let line_start = content.lines().segment_for_offset(offset).offset;
    let mut current = offset;
    while current > line_start
        && content
            .buffer()
            .char_at(current - 1)
            .is_some_and(is_letter_digit_or_underscore)
    {
        current -= 1;
    }
    current
}

/// End of the word starting at or containing `offset`, not crossing the line end.
pub fn find_word_end(content: &TextContent, offset: usize) -> usize {
    let offset = offset.min(content.text_length());
    let line_end = content.lines().segment_for_offset(offset).end_offset();
    let mut current = offset;
    while current < line_end
        && content
            .buffer()
            .char_at(current)
            .is_some_and(is_letter_digit_or_underscore)
    {
        current += 1;
    }
    current
}

/// Offset of the next word start on the same line (Ctrl+Right).
pub fn find_next_word_start(content: &TextContent, offset: usize) -> usize {
    let offset = offset.min(content.text_length());
    let line_end = content.lines().segment_for_offset(offset).end_offset();
    let mut current = offset;
    if let Some(kind) = char_type_at(content, current) {
        while current < line_end && char_type_at(content, current) == Some(kind) {
            current += 1;
        }
    }
    while current < line_end && char_type_at(content, current) == Some(CharacterType::WhiteSpace) {
        current += 1;
    }
    current
}

/// Offset of the previous word start on the same line (Ctrl+Left).
pub fn find_prev_word_start(content: &TextContent, offset: usize) -> usize {
    let offset = offset.min(content.text_length());
    if offset == 0 {
        return 0;
    }
    let line_start = content.lines().segment_for_offset(offset).offset;
    let mut current = offset;
    let Some(mut kind) = char_type_at(content, current - 1) else {
        return current;
    };
    while current > line_start && char_type_at(content, current - 1) == Some(kind) {
        current -= 1;
    }
    // Skipped whitespace: continue over the word before it.
    if kind == CharacterType::WhiteSpace && current > line_start {
        if let Some(previous) = char_type_at(content, current - 1) {
            kind = previous;
        }
        while current > line_start && char_type_at(content, current - 1) == Some(kind) {
            current -= 1;
        }
    }
    current
}

/// The identifier-like word containing `offset`, or an empty string.
pub fn get_word_at(content: &TextContent, offset: usize) -> String {
    let on_word = content
        .buffer()
        .char_at(offset)
        .is_some_and(is_letter_digit_or_underscore);
    if !on_word {
        return String::new();
    }
    let start = find_word_start(content, offset);
    let end = find_word_end(content, offset);
    content.buffer().get_text(start, end - start)
}

/// Leading whitespace of `line`, or an empty string for unknown lines.
pub fn get_leading_whitespace(content: &TextContent, line: usize) -> String {
    content
        .line_text_lossy(line)
        .chars()
        .take_while(|ch| ch.is_whitespace())
        .collect()
}

/// Display column of character column `column` in `line`, expanding tabs and wide chars.
pub fn visual_column(line: &str, column: usize, tab_width: usize) -> usize {
    let tab_width = tab_width.max(1);
    line.chars().take(column).fold(0, |visual, ch| {
        if ch == '\t' {
            visual + tab_width - visual % tab_width
        } else {
            visual + ch.width().unwrap_or(0)
        }
    })
}

/// Character column whose cell covers display column `visual`; clamps to the line length.
pub fn logical_column(line: &str, visual: usize, tab_width: usize) -> usize {
    let tab_width = tab_width.max(1);
    let mut current = 0;
    for (column, ch) in line.chars().enumerate() {
        let width = if ch == '\t' {
            tab_width - current % tab_width
        } else {
            ch.width().unwrap_or(0)
        };
        if current + width > visual {
            return column;
        }
        current += width;
    }
    line.chars().count()
}

/// Character column after the grapheme cluster starting at `column`.
pub fn next_grapheme_column(line: &str, column: usize) -> usize {
    let mut current = 0;
    for grapheme in line.graphemes(true) {
        let next = current + grapheme.chars().count();
        if next > column {
            return next;
        }
        current = next;
    }
    current
}

/// Character column of the grapheme cluster before `column`.
pub fn prev_grapheme_column(line: &str, column: usize) -> usize {
    let mut current = 0;
    for grapheme in line.graphemes(true) {
        let next = current + grapheme.chars().count();
        if next >= column {
            return current;
        }
        current = next;
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content_for(text: &str) -> TextContent {
        let mut content = TextContent::new();
        content.set_content(text);
        content
    }

    #[test]
    fn test_word_boundaries() {
        let content = content_for("let foo_bar = 1;\nnext");
        assert_eq!(find_word_start(&content, 7), 4);
        assert_eq!(find_word_end(&content, 5), 11);
        assert_eq!(get_word_at(&content, 6), "foo_bar");
        assert_eq!(get_word_at(&content, 3), "");
        // Words stop at the line start.
        assert_eq!(find_word_start(&content, 19), 17);
    }

    #[test]
    fn test_next_and_prev_word_start() {
        let content = content_for("foo  bar(baz)");
        assert_eq!(find_next_word_start(&content, 0), 5);
        assert_eq!(find_next_word_start(&content, 5), 8);
        assert_eq!(find_prev_word_start(&content, 8), 5);
        assert_eq!(find_prev_word_start(&content, 5), 0);
        assert_eq!(find_prev_word_start(&content, 0), 0);
    }

    #[test]
    fn test_leading_whitespace() {
        let content = content_for("a\n \t  b\n");
        assert_eq!(get_leading_whitespace(&content, 1), " \t  ");
        assert_eq!(get_leading_whitespace(&content, 0), "");
        assert_eq!(get_leading_whitespace(&content, 9), "");
    }

    #[test]
    fn test_visual_and_logical_columns() {
        assert_eq!(visual_column("\tab", 1, 4), 4);
        assert_eq!(visual_column("a\tb", 2, 4), 4);
        assert_eq!(visual_column("你好x", 2, 4), 4);
        assert_eq!(logical_column("你好x", 3, 4), 1);
        assert_eq!(logical_column("\tab", 2, 4), 0);
        assert_eq!(logical_column("ab", 10, 4), 2);
    }

    #[test]
    fn test_grapheme_steps() {
        let line = "ae\u{301}x";
        assert_eq!(next_grapheme_column(line, 1), 3);
        assert_eq!(prev_grapheme_column(line, 3), 1);
        assert_eq!(next_grapheme_column(line, 3), 4);
        assert_eq!(prev_grapheme_column(line, 0), 0);
    }
}
