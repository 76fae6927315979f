use codedoc_core::{Color, Document, TextAreaUpdate, TextWord};
use codedoc_highlight::{
    DefinitionId, HighlightDefinition, HighlightRuleSet, HighlightingError, HighlightingRegistry,
    ResolutionWarning, RuleSetHighlighter, Span,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

const CSHARP: &str = include_str!("fixtures/csharp.yaml");

const BLACK: Color = Color::BLACK;
const GREEN: Color = Color::rgb(0, 128, 0);
const BLUE: Color = Color::rgb(0, 0, 255);
const PURPLE: Color = Color::rgb(128, 0, 128);
const TEAL: Color = Color::rgb(0, 128, 128);
const MAROON: Color = Color::rgb(128, 0, 0);
const MIDNIGHT_BLUE: Color = Color::rgb(25, 25, 112);
const DARK_BLUE: Color = Color::rgb(0, 0, 139);
const GRAY: Color = Color::rgb(128, 128, 128);
const RED: Color = Color::rgb(255, 0, 0);

fn csharp_registry() -> (HighlightingRegistry, DefinitionId) {
    let mut registry = HighlightingRegistry::new();
    let id = registry.load_from_str(CSHARP).unwrap();
    (registry, id)
}

fn csharp_document(text: &str) -> Document {
    let (mut registry, _) = csharp_registry();
    registry.resolve();
    let highlighter = RuleSetHighlighter::for_file(Arc::new(registry), "Program.cs").unwrap();
    let mut document = Document::new(text);
    document.set_highlighting_strategy(Box::new(highlighter));
    document
}

/// Non-whitespace words of `line` with their foreground color.
fn colored_words(document: &Document, line: usize) -> Vec<(String, Color)> {
    let text = document.line_text(line).unwrap();
    document
        .line_words(line)
        .unwrap()
        .iter()
        .filter(|word| !word.is_whitespace())
        .map(|word: &TextWord| (word.text(&text), word.color.color))
        .collect()
}

fn color_of(document: &Document, line: usize, word: &str) -> Color {
    colored_words(document, line)
        .into_iter()
        .find(|(text, _)| text == word)
        .map(|(_, color)| color)
        .unwrap_or_else(|| panic!("no word {word:?} on line {line}"))
}

#[test]
fn test_fixture_loads_and_resolves_cleanly() {
    let (mut registry, id) = csharp_registry();
    assert!(registry.resolve().is_empty());
    assert_eq!(registry.definition(id).name, "C#");
    assert_eq!(registry.find_for_file("src/Program.CS"), Some(id));
    assert_eq!(registry.find_by_name("C#"), Some(id));

    let markers = registry.find_rule_set(id, "CommentMarkers").unwrap();
    assert!(registry.rule_set(markers).ignore_case);
    assert_eq!(registry.definition(id).digit_color.color, DARK_BLUE);
}

#[test]
fn test_block_comment_spans_two_lines() {
    let document = csharp_document("code /* start\nend */ code");
    assert_eq!(
        colored_words(&document, 0),
        vec![
            ("code".to_string(), BLACK),
            ("/*".to_string(), GREEN),
            ("start".to_string(), GREEN),
        ]
    );
    assert_eq!(
        colored_words(&document, 1),
        vec![
            ("end".to_string(), GREEN),
            ("*/".to_string(), GREEN),
            ("code".to_string(), BLACK),
        ]
    );
}

#[test]
fn test_opening_comment_propagates_until_state_matches() {
    let mut document = csharp_document("code start\nend */ code\nx");
    assert_eq!(color_of(&document, 1, "end"), BLACK);
    document.commit_update();

    document.insert(5, "/* ").unwrap();
    assert_eq!(document.line_text(0).unwrap(), "code /* start");
    assert_eq!(color_of(&document, 0, "start"), GREEN);
    assert_eq!(color_of(&document, 1, "end"), GREEN);
    assert_eq!(color_of(&document, 1, "code"), BLACK);
    assert_eq!(color_of(&document, 2, "x"), BLACK);
    // Re-tokenizing spilled into line 1, so the whole area repaints.
    assert_eq!(document.update_queue(), &[TextAreaUpdate::WholeTextArea]);

    document.commit_update();
    document.insert(document.text_length(), "y").unwrap();
    assert_eq!(document.update_queue(), &[TextAreaUpdate::SingleLine(2)]);
}

#[test]
fn test_unclosed_comment_runs_to_end_of_document() {
    let mut document = csharp_document("int a;\nint b;\nint c;");
    document.insert(0, "/*").unwrap();
    for line in 0..3 {
        assert_eq!(color_of(&document, line, "int"), GREEN, "line {line}");
    }

    document.insert(document.text_length(), " */ int").unwrap();
    let last = colored_words(&document, 2);
    assert_eq!(last.last().unwrap(), &("int".to_string(), TEAL));
}

#[test]
fn test_keywords_and_word_markers() {
    let document = csharp_document("public class Foo\nstatic void Main(string args)");
    assert_eq!(color_of(&document, 0, "public"), BLUE);
    assert_eq!(color_of(&document, 0, "class"), BLUE);
    assert_eq!(color_of(&document, 0, "Foo"), MAROON);
    assert_eq!(color_of(&document, 1, "Main"), MIDNIGHT_BLUE);
    assert_eq!(color_of(&document, 1, "("), BLACK);
    assert_eq!(color_of(&document, 1, "string"), TEAL);

    let words = document.line_words(0).unwrap();
    assert!(words[0].color.bold);
    assert!(!words[0].has_default_color);
}

#[test]
fn test_comment_rule_set_keywords_ignore_case() {
    let document = csharp_document("x = 1; // todo: Fixme later");
    assert_eq!(color_of(&document, 0, "todo"), RED);
    assert_eq!(color_of(&document, 0, "Fixme"), RED);
    assert_eq!(color_of(&document, 0, ":"), GREEN);
    assert_eq!(color_of(&document, 0, "later"), GREEN);
    assert_eq!(color_of(&document, 0, "1"), DARK_BLUE);
}

#[test]
fn test_strings_escapes_and_digits() {
    let document = csharp_document("var s = \"a \\\" b\"; int n = 42;");
    assert_eq!(
        colored_words(&document, 0),
        vec![
            ("var".to_string(), TEAL),
            ("s".to_string(), BLACK),
            ("=".to_string(), BLACK),
            ("\"".to_string(), PURPLE),
            ("a".to_string(), PURPLE),
            ("\\\"".to_string(), PURPLE),
            ("b".to_string(), PURPLE),
            ("\"".to_string(), PURPLE),
            (";".to_string(), BLACK),
            ("int".to_string(), TEAL),
            ("n".to_string(), BLACK),
            ("=".to_string(), BLACK),
            ("42".to_string(), DARK_BLUE),
            (";".to_string(), BLACK),
        ]
    );
}

#[test]
fn test_verbatim_string_doubles_quotes() {
    let document = csharp_document("@\"C:\\dir\"\" x\" return");
    assert_eq!(
        colored_words(&document, 0),
        vec![
            ("@\"".to_string(), PURPLE),
            ("C:\\dir\"\"".to_string(), PURPLE),
            ("x".to_string(), PURPLE),
            ("\"".to_string(), PURPLE),
            ("return".to_string(), BLUE),
        ]
    );
}

#[test]
fn test_preprocessor_only_at_line_start() {
    let document = csharp_document("  #region Foo\nx #y");
    assert_eq!(color_of(&document, 0, "region"), GRAY);
    assert_eq!(color_of(&document, 0, "Foo"), GRAY);
    assert_eq!(color_of(&document, 1, "#"), BLACK);
    assert_eq!(color_of(&document, 1, "y"), BLACK);
}

#[test]
fn test_reference_delegates_to_other_definition() {
    let (mut registry, _) = csharp_registry();
    let page = registry
        .add(
            HighlightDefinition::new("Page")
                .with_extensions([".page"])
                .with_rule_set(
                    HighlightRuleSet::new("")
                        .with_span(Span::new("Code", "<%").with_end("%>").with_rule("Code")),
                )
                .with_rule_set(HighlightRuleSet::new("Code").with_reference("C#")),
        )
        .unwrap();
    assert!(registry.resolve().is_empty());

    let highlighter = RuleSetHighlighter::new(Arc::new(registry), page);
    let mut document = Document::new("<% return x %> return");
    document.set_highlighting_strategy(Box::new(highlighter));

    let words = colored_words(&document, 0);
    assert_eq!(words[1], ("return".to_string(), BLUE));
    assert_eq!(words.last().unwrap(), &("return".to_string(), BLACK));
}

#[test]
fn test_resolution_warnings_fall_back() {
    let mut registry = HighlightingRegistry::new();
    let id = registry
        .load_from_str(
            r#"
name: Broken
rulesets:
  - reference: Nope
    spans:
      - name: Block
        begin: "["
        end: "]"
        rule: Missing
        color: Green
    keywords:
      - color: Blue
        words: [key]
"#,
        )
        .unwrap();

    let warnings = registry.resolve().to_vec();
    assert_eq!(
        warnings,
        vec![
            ResolutionWarning::UnknownReference {
                definition: "Broken".to_string(),
                rule_set: String::new(),
                reference: "Nope".to_string(),
            },
            ResolutionWarning::UnknownSpanRule {
                definition: "Broken".to_string(),
                span: "Block".to_string(),
                rule: "Missing".to_string(),
            },
        ]
    );

    let mut document = Document::new("key [key other]");
    document.set_highlighting_strategy(Box::new(RuleSetHighlighter::new(Arc::new(registry), id)));
    let words = colored_words(&document, 0);
    assert_eq!(words[0], ("key".to_string(), BLUE));
    // Inside the span the containing rule set still supplies keywords.
    assert_eq!(words[2], ("key".to_string(), BLUE));
    assert_eq!(words[3], ("other".to_string(), GREEN));
}

#[test]
fn test_load_errors() {
    let mut registry = HighlightingRegistry::new();
    assert!(matches!(
        registry.load_from_str("name: [unterminated"),
        Err(HighlightingError::Yaml(_))
    ));
    registry.load_from_str(CSHARP).unwrap();
    assert!(matches!(
        registry.load_from_str(CSHARP),
        Err(HighlightingError::DuplicateDefinition(name)) if name == "C#"
    ));
}
