use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Deserialize)]
/// Raw YAML grammar definition.
pub struct SyntaxDefinition {
    /// Definition name, used by `reference:` lookups and [`find_by_name`].
    ///
    /// [`find_by_name`]: crate::HighlightingRegistry::find_by_name
    pub name: String,

    #[serde(default)]
    /// File extensions (with leading dot) handled by this definition.
    pub extensions: Vec<String>,

    #[serde(default)]
    /// Style of numeric literals.
    pub digits: Option<RawColor>,

    #[serde(default)]
    /// Environment colors (`Default`, `Selection`, `LineNumbers`, ...).
    pub environment: HashMap<String, RawColor>,

    #[serde(default)]
    /// Rule sets; the one without a name (or else the first) is the main rule set.
    pub rulesets: Vec<RawRuleSet>,
}

#[derive(Debug, Clone, Default, Deserialize)]
/// A style as written in YAML: `color`, `bgcolor`, `bold`, `italic`.
pub struct RawColor {
    #[serde(default)]
    /// Foreground, `#RRGGBB`, `#AARRGGBB` or a color name.
    pub color: Option<String>,

    #[serde(default)]
    /// Background.
    pub bgcolor: Option<String>,

    #[serde(default)]
    /// Bold flag.
    pub bold: bool,

    #[serde(default)]
    /// Italic flag.
    pub italic: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
/// Raw rule set.
pub struct RawRuleSet {
    #[serde(default)]
    /// Rule set name; spans refer to it through `rule:`.
    pub name: String,

    #[serde(default)]
    /// Name of another definition whose main rule set highlights in place of this one.
    pub reference: Option<String>,

    #[serde(default)]
    /// Case-insensitive keywords and span delimiters.
    pub ignorecase: bool,

    #[serde(default)]
    /// Escape character active outside spans that set their own.
    pub escapecharacter: Option<String>,

    #[serde(default)]
    /// Characters that always end a word.
    pub delimiters: String,

    #[serde(default)]
    /// Spans in priority order.
    pub spans: Vec<RawSpan>,

    #[serde(default)]
    /// Keyword groups.
    pub keywords: Vec<RawKeywords>,

    #[serde(default)]
    /// Words recoloring the word before them.
    pub markprevious: Vec<RawMarker>,

    #[serde(default)]
    /// Words recoloring the word after them.
    pub markfollowing: Vec<RawMarker>,
}

#[derive(Debug, Clone, Default, Deserialize)]
/// Raw span.
pub struct RawSpan {
    #[serde(default)]
    /// Display name.
    pub name: String,

    /// Opening delimiter.
    pub begin: String,

    #[serde(default)]
    /// Closing delimiter; spans without one run to the end of the line.
    pub end: Option<String>,

    #[serde(default)]
    /// Rule set used inside the span.
    pub rule: Option<String>,

    #[serde(default)]
    /// Whether the span is closed by the end of the line.
    pub stopateol: bool,

    #[serde(default)]
    /// Disable escape handling inside the span.
    pub noescapesequences: bool,

    #[serde(default)]
    /// Escape character inside the span.
    pub escapecharacter: Option<String>,

    #[serde(default)]
    /// Override of the containing rule set's case sensitivity.
    pub ignorecase: Option<bool>,

    #[serde(flatten)]
    /// Style of the span's content.
    pub color: RawColor,

    #[serde(default)]
    /// Style of the opening delimiter; defaults to the content style.
    pub begin_color: Option<RawColor>,

    #[serde(default)]
    /// Style of the closing delimiter; defaults to the content style.
    pub end_color: Option<RawColor>,

    #[serde(default)]
    /// The opening delimiter must start a word.
    pub isbeginsingleword: bool,

    #[serde(default)]
    /// The closing delimiter must start a word.
    pub isendsingleword: bool,

    #[serde(default)]
    /// `true`: only at line start (after whitespace); `false`: never there.
    pub isbeginstartofline: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
/// Raw keyword group.
pub struct RawKeywords {
    #[serde(default)]
    /// Group name.
    pub name: String,

    #[serde(flatten)]
    /// Style of the group's words.
    pub color: RawColor,

    #[serde(default)]
    /// Words of the group.
    pub words: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
/// Raw `markprevious` / `markfollowing` entry.
pub struct RawMarker {
    /// Marker word.
    pub what: String,

    #[serde(flatten)]
    /// Style applied to the marked word.
    pub color: RawColor,

    #[serde(default)]
    /// Whether the marker word itself gets the style too.
    pub markmarker: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_definition() {
        let yaml = r##"
name: Mini
extensions: [".mini"]
digits: { color: "#FF0000" }
rulesets:
  - delimiters: "(),;"
    spans:
      - name: LineComment
        begin: "#"
        stopateol: true
        color: Green
        italic: true
    keywords:
      - name: Keywords
        color: Blue
        bold: true
        words: [let, fn]
    markprevious:
      - what: "("
        color: Navy
"##;
        let definition: SyntaxDefinition = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(definition.name, "Mini");
        let rule_set = &definition.rulesets[0];
        assert_eq!(rule_set.name, "");
        let span = &rule_set.spans[0];
        assert!(span.stopateol);
        assert_eq!(span.color.color.as_deref(), Some("Green"));
        assert!(span.color.italic);
        assert_eq!(rule_set.keywords[0].words, vec!["let", "fn"]);
        assert!(rule_set.keywords[0].color.bold);
        assert!(!rule_set.markprevious[0].markmarker);
    }
}
