//! Highlighting contract.
//!
//! The document does not know how tokens are produced. It owns one boxed
//! [`HighlightingStrategy`], tells it which lines were replaced after each edit, asks it to
//! re-tokenize the changed lines, and serves the resulting [`TextWord`]s to views.
//!
//! [`PlainHighlighting`] is the built-in strategy: words, spaces and tabs, all in the default
//! color. Rule-set driven highlighting lives in the `codedoc-highlight` crate.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::content::TextContent;
use crate::line_manager::LineChange;

/// An RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha (255 = opaque).
    pub a: u8,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    /// Fully transparent.
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    /// An opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// A color with alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Look up a named color (case-insensitive); `SystemColors.` prefixes are accepted.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        let name = name.strip_prefix("SystemColors.").unwrap_or(name);
        let lower = name.to_ascii_lowercase();
        let color = match lower.as_str() {
            "black" | "windowtext" | "controltext" => Self::BLACK,
            "white" | "window" | "highlighttext" => Self::WHITE,
            "transparent" => Self::TRANSPARENT,
            "red" => Self::rgb(255, 0, 0),
            "green" => Self::rgb(0, 128, 0),
            "blue" => Self::rgb(0, 0, 255),
            "yellow" => Self::rgb(255, 255, 0),
            "cyan" => Self::rgb(0, 255, 255),
            "magenta" => Self::rgb(255, 0, 255),
            "gray" | "grey" => Self::rgb(128, 128, 128),
            "darkgray" | "darkgrey" => Self::rgb(169, 169, 169),
            "silver" => Self::rgb(192, 192, 192),
            "maroon" => Self::rgb(128, 0, 0),
            "olive" => Self::rgb(128, 128, 0),
            "navy" => Self::rgb(0, 0, 128),
            "purple" => Self::rgb(128, 0, 128),
            "teal" => Self::rgb(0, 128, 128),
            "brown" => Self::rgb(165, 42, 42),
            "orange" => Self::rgb(255, 165, 0),
            "darkblue" => Self::rgb(0, 0, 139),
            "darkgreen" => Self::rgb(0, 100, 0),
            "darkred" => Self::rgb(139, 0, 0),
            "darkcyan" => Self::rgb(0, 139, 139),
            "darkmagenta" => Self::rgb(139, 0, 139),
            "midnightblue" => Self::rgb(25, 25, 112),
            "highlight" => Self::rgb(51, 153, 255),
            "controldark" => Self::rgb(160, 160, 160),
            "controllight" => Self::rgb(227, 227, 227),
            "control" => Self::rgb(240, 240, 240),
            _ => return None,
        };
        Some(color)
    }
}

/// Error returned for unparseable color strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color `{0}`")]
pub struct ParseColorError(pub String);

impl FromStr for Color {
    type Err = ParseColorError;

    /// Parse `#RRGGBB`, `#AARRGGBB` or a color name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let Some(hex) = trimmed.strip_prefix('#') else {
            return Self::from_name(trimmed).ok_or_else(|| ParseColorError(s.to_string()));
        };
        let value = u32::from_str_radix(hex, 16).map_err(|_| ParseColorError(s.to_string()))?;
        let [b0, b1, b2, b3] = value.to_be_bytes();
        match hex.len() {
            6 => Ok(Self::rgb(b1, b2, b3)),
            8 => Ok(Self::rgba(b1, b2, b3, b0)),
            _ => Err(ParseColorError(s.to_string())),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.a, self.r, self.g, self.b)
        }
    }
}

/// Foreground color, optional background and font flags of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HighlightColor {
    /// Foreground.
    pub color: Color,
    /// Background, `None` to use the view's background.
    pub background: Option<Color>,
    /// Bold font.
    pub bold: bool,
    /// Italic font.
    pub italic: bool,
}

impl HighlightColor {
    /// A plain foreground color.
    pub const fn new(color: Color) -> Self {
        Self {
            color,
            background: None,
            bold: false,
            italic: false,
        }
    }

    /// Set the background.
    pub const fn with_background(mut self, background: Color) -> Self {
        self.background = Some(background);
        self
    }

    /// Set the bold flag.
    pub const fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Set the italic flag.
    pub const fn italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }
}

impl Default for HighlightColor {
    fn default() -> Self {
        Self::new(Color::BLACK)
    }
}

/// Environment colors every strategy starts from; definitions may override them.
pub fn default_environment_colors() -> HashMap<String, HighlightColor> {
    let control_dark = Color::rgb(160, 160, 160);
    let control_light = Color::rgb(227, 227, 227);
    [
        ("Default", HighlightColor::new(Color::BLACK).with_background(Color::WHITE)),
        ("Selection", HighlightColor::new(Color::WHITE).with_background(Color::rgb(51, 153, 255))),
        ("VRuler", HighlightColor::new(control_light)),
        ("InvalidLines", HighlightColor::new(Color::rgb(255, 0, 0))),
        ("CaretMarker", HighlightColor::new(Color::rgb(255, 255, 0))),
        ("LineNumbers", HighlightColor::new(control_dark).with_background(Color::WHITE)),
        ("FoldLine", HighlightColor::new(control_dark)),
        ("FoldMarker", HighlightColor::new(Color::BLACK).with_background(Color::WHITE)),
        ("SelectedFoldLine", HighlightColor::new(Color::BLACK)),
        ("EOLMarkers", HighlightColor::new(control_light)),
        ("SpaceMarkers", HighlightColor::new(control_light)),
        ("TabMarkers", HighlightColor::new(control_light)),
    ]
    .into_iter()
    .map(|(name, color)| (name.to_string(), color))
    .collect()
}

/// What a [`TextWord`] stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WordKind {
    /// A run of non-whitespace characters.
    Word,
    /// A single space.
    Space,
    /// A single tab.
    Tab,
}

/// A colored run of characters within one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextWord {
    /// Kind of run.
    pub kind: WordKind,
    /// Column where the run starts (characters from the line start).
    pub offset: usize,
    /// Length in characters.
    pub length: usize,
    /// Style.
    pub color: HighlightColor,
    /// Whether `color` is the rule set's default rather than a matched rule.
    pub has_default_color: bool,
}

impl TextWord {
    /// A non-whitespace word.
    pub fn word(offset: usize, length: usize, color: HighlightColor, has_default_color: bool) -> Self {
        Self {
            kind: WordKind::Word,
            offset,
            length,
            color,
            has_default_color,
        }
    }

    /// A single space.
    pub fn space(offset: usize, color: HighlightColor) -> Self {
        Self {
            kind: WordKind::Space,
            offset,
            length: 1,
            color,
            has_default_color: true,
        }
    }

    /// A single tab.
    pub fn tab(offset: usize, color: HighlightColor) -> Self {
        Self {
            kind: WordKind::Tab,
            offset,
            length: 1,
            color,
            has_default_color: true,
        }
    }

    /// Whether the word is a space or tab.
    pub fn is_whitespace(&self) -> bool {
        self.kind != WordKind::Word
    }

    /// The word's characters taken from its line.
    pub fn text(&self, line: &str) -> String {
        line.chars().skip(self.offset).take(self.length).collect()
    }
}

/// Produces per-line [`TextWord`]s for a document.
///
/// The document calls [`lines_replaced`](Self::lines_replaced) after every edit, then
/// [`mark_tokens_in_lines`](Self::mark_tokens_in_lines) with the changed lines.
pub trait HighlightingStrategy {
    /// Display name.
    fn name(&self) -> &str;

    /// File extensions (with leading dot) this strategy applies to.
    fn extensions(&self) -> &[String];

    /// Default text style.
    fn default_color(&self) -> HighlightColor;

    /// Named environment color such as `"Selection"` or `"LineNumbers"`.
    fn environment_color(&self, name: &str) -> Option<HighlightColor>;

    /// Drop all cached state and size the cache for `line_count` lines.
    fn reset(&mut self, line_count: usize);

    /// Splice the per-line cache after an edit replaced some lines.
    fn lines_replaced(&mut self, change: &LineChange);

    /// Tokenize the whole document.
    fn mark_tokens(&mut self, content: &TextContent);

    /// Re-tokenize the given lines, continuing past them while the carried state changes.
    ///
    /// Returns `true` when tokenization spilled over into lines not in `lines`.
    fn mark_tokens_in_lines(&mut self, content: &TextContent, lines: &[usize]) -> bool;

    /// Cached words of `line`, if tokenized.
    fn line_words(&self, line: usize) -> Option<&[TextWord]>;
}

/// Strategy that splits lines into words and whitespace without coloring anything.
#[derive(Debug, Clone)]
pub struct PlainHighlighting {
    default_color: HighlightColor,
    environment: HashMap<String, HighlightColor>,
    extensions: Vec<String>,
    lines: Vec<Option<Vec<TextWord>>>,
}

impl PlainHighlighting {
    /// Create the strategy.
    pub fn new() -> Self {
        let environment = default_environment_colors();
        let default_color = environment
            .get("Default")
            .copied()
            .unwrap_or_default();
        Self {
            default_color,
            environment,
            extensions: Vec::new(),
            lines: Vec::new(),
        }
    }

    fn tokenize_line(&self, line: &str) -> Vec<TextWord> {
        let mut words = Vec::new();
        let mut word_start = None;
        for (column, ch) in line.chars().enumerate() {
            if ch == ' ' || ch == '\t' {
                if let Some(start) = word_start.take() {
                    words.push(TextWord::word(start, column - start, self.default_color, true));
                }
                words.push(if ch == ' ' {
                    TextWord::space(column, self.default_color)
                } else {
                    TextWord::tab(column, self.default_color)
                });
            } else if word_start.is_none() {
                word_start = Some(column);
            }
        }
        if let Some(start) = word_start {
            let length = line.chars().count() - start;
            words.push(TextWord::word(start, length, self.default_color, true));
        }
        words
    }
}

impl Default for PlainHighlighting {
    fn default() -> Self {
        Self::new()
    }
}

impl HighlightingStrategy for PlainHighlighting {
    fn name(&self) -> &str {
        "Default"
    }

    fn extensions(&self) -> &[String] {
        &self.extensions
    }

    fn default_color(&self) -> HighlightColor {
        self.default_color
    }

    fn environment_color(&self, name: &str) -> Option<HighlightColor> {
        self.environment.get(name).copied()
    }

    fn reset(&mut self, line_count: usize) {
        self.lines = vec![None; line_count];
    }

    fn lines_replaced(&mut self, change: &LineChange) {
        let start = change.first_line.min(self.lines.len());
        let end = (change.first_line + change.old_line_count).min(self.lines.len());
        self.lines
            .splice(start..end, std::iter::repeat_n(None, change.new_line_count));
    }

    fn mark_tokens(&mut self, content: &TextContent) {
        self.lines = (0..content.line_count())
            .map(|line| Some(self.tokenize_line(&content.line_text_lossy(line))))
            .collect();
    }

    fn mark_tokens_in_lines(&mut self, content: &TextContent, lines: &[usize]) -> bool {
        self.lines.resize(content.line_count(), None);
        for &line in lines {
            if line < self.lines.len() {
                self.lines[line] = Some(self.tokenize_line(&content.line_text_lossy(line)));
            }
        }
        false
    }

    fn line_words(&self, line: usize) -> Option<&[TextWord]> {
        self.lines.get(line)?.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_and_named_colors() {
        assert_eq!("#FF8000".parse(), Ok(Color::rgb(255, 128, 0)));
        assert_eq!("#80FF0000".parse(), Ok(Color::rgba(255, 0, 0, 128)));
        assert_eq!("Blue".parse(), Ok(Color::rgb(0, 0, 255)));
        assert_eq!("SystemColors.WindowText".parse(), Ok(Color::BLACK));
        assert!("#12345".parse::<Color>().is_err());
        assert!("chartreuse-ish".parse::<Color>().is_err());
    }

    #[test]
    fn test_color_display_round_trip() {
        let color = Color::rgb(1, 2, 3);
        assert_eq!(color.to_string(), "#010203");
        assert_eq!(color.to_string().parse(), Ok(color));
    }

    #[test]
    fn test_plain_tokenizer_splits_whitespace() {
        let plain = PlainHighlighting::new();
        let words = plain.tokenize_line("ab \tcd");
        let kinds: Vec<_> = words.iter().map(|w| (w.kind, w.offset, w.length)).collect();
        assert_eq!(
            kinds,
            vec![
                (WordKind::Word, 0, 2),
                (WordKind::Space, 2, 1),
                (WordKind::Tab, 3, 1),
                (WordKind::Word, 4, 2),
            ]
        );
        assert_eq!(words[3].text("ab \tcd"), "cd");
    }

    #[test]
    fn test_environment_defaults_present() {
        let plain = PlainHighlighting::new();
        assert!(plain.environment_color("Selection").is_some());
        assert_eq!(plain.default_color().background, Some(Color::WHITE));
    }
}
