use codedoc_core::{
    BraceFoldingStrategy, Document, DocumentEvent, FoldMarker, FoldType, IndentFoldingStrategy,
    TextPosition,
};
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const SOURCE: &str = "class A {\n    void f() {\n        g();\n    }\n    void h() {\n        i();\n    }\n}\n";

fn folded_document() -> Document {
    let mut document = Document::new(SOURCE);
    document.set_folding_strategy(Box::new(BraceFoldingStrategy::new()));
    document.update_foldings("a.cs", None);
    document
}

fn fold_lines(document: &Document) -> Vec<(usize, usize, bool)> {
    let lines = document.content().lines();
    document
        .folding_manager()
        .fold_markers()
        .iter()
        .map(|marker| (marker.start_line(lines), marker.end_line(lines), marker.is_folded))
        .collect()
}

#[test]
fn test_brace_strategy_generates_nested_folds() {
    let document = folded_document();
    assert_eq!(
        fold_lines(&document),
        vec![(0, 7, false), (1, 3, false), (4, 6, false)]
    );
    let types: Vec<FoldType> = document
        .folding_manager()
        .fold_markers()
        .iter()
        .map(|marker| marker.fold_type)
        .collect();
    assert_eq!(types, vec![FoldType::TypeBody, FoldType::MemberBody, FoldType::MemberBody]);
}

#[test]
fn test_regeneration_preserves_folded_state() {
    let mut document = folded_document();
    assert!(document.toggle_fold_at_line(4));

    // Editing inside another block shifts offsets; regeneration keeps the collapsed flag.
    let offset = document.position_to_offset(TextPosition::new(2, 8)).unwrap();
    document.insert(offset, "x").unwrap();
    document.update_foldings("a.cs", None);
    assert_eq!(
        fold_lines(&document),
        vec![(0, 7, false), (1, 3, false), (4, 6, true)]
    );
}

#[test]
fn test_visible_line_mapping_is_monotonic() {
    let mut document = folded_document();
    document.toggle_fold_at_line(1);
    document.toggle_fold_at_line(4);

    let line_count = document.total_number_of_lines();
    let mut previous = 0;
    for line in 0..line_count {
        let visible = document.get_visible_line(line);
        assert!(visible >= previous, "line {line}");
        previous = visible;
    }
    // Lines 2-3 and 5-6 collapse onto their fold rows.
    assert_eq!(document.total_visible_lines(), line_count - 4);
    assert_eq!(document.get_visible_line(3), 1);
    assert_eq!(document.get_visible_line(7), 3);
    assert_eq!(document.get_first_logical_line(2), 4);
    assert_eq!(document.get_last_logical_line(1), 3);
}

#[test]
fn test_next_visible_line_skips_hidden_lines() {
    let mut document = folded_document();
    document.toggle_fold_at_line(1);
    assert_eq!(document.next_visible_line_after(1, 1), 3);
    assert_eq!(document.next_visible_line_before(3, 1), 1);
    assert_eq!(document.next_visible_line_after(7, 5), 8);
    assert_eq!(document.next_visible_line_before(1, 5), 0);
}

#[test]
fn test_fold_all_hides_top_level_only_once() {
    let mut document = folded_document();
    document.fold_all();
    let top_level = document.folding_manager().get_top_level_folded_foldings();
    assert_eq!(top_level.len(), 1);
    assert_eq!(document.total_visible_lines(), 2);

    document.unfold_all();
    assert_eq!(document.total_visible_lines(), document.total_number_of_lines());
}

#[test]
fn test_disabled_folding_maps_identity() {
    let mut document = folded_document();
    document.fold_all();
    document.folding_manager_mut().set_enabled(false);
    assert_eq!(document.get_visible_line(5), 5);
    assert_eq!(document.total_visible_lines(), document.total_number_of_lines());
}

#[test]
fn test_fold_state_persists_through_string() {
    let mut document = folded_document();
    document.toggle_fold_at_line(1);
    let saved = document.folding_manager().serialize_to_string();

    let mut restored = folded_document();
    let events = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&events);
    restored.subscribe(move |event| {
        if matches!(event, DocumentEvent::FoldingsChanged) {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    });
    restored.restore_fold_state(&saved);
    assert_eq!(fold_lines(&restored), fold_lines(&document));
    assert_eq!(events.load(Ordering::SeqCst), 1);

    // Garbage is ignored without touching the markers.
    restored.restore_fold_state("12\nnot-a-number\n...\ntrue\n");
    assert_eq!(fold_lines(&restored), fold_lines(&document));
    assert_eq!(events.load(Ordering::SeqCst), 1);
}

#[test]
fn test_markers_follow_edits() {
    let mut document = folded_document();
    let before = document.folding_manager().fold_markers()[1].clone();
    document.insert(0, "// header\n").unwrap();
    let after = &document.folding_manager().fold_markers()[1];
    assert_eq!(after.offset, before.offset + 10);
    assert_eq!(after.length, before.length);
}

#[test]
fn test_indent_strategy_on_document() {
    let mut document = Document::new("root:\n  child:\n    leaf\n  other\nend\n");
    document.set_folding_strategy(Box::new(IndentFoldingStrategy::new(2)));
    document.update_foldings("tree.yaml", None);
    assert_eq!(fold_lines(&document), vec![(0, 3, false), (1, 2, false)]);
}

#[test]
fn test_manual_markers_without_strategy() {
    let mut document = Document::new("a\nb\nc\nd");
    let marker = FoldMarker::from_positions(
        document.content().lines(),
        TextPosition::new(0, 1),
        TextPosition::new(2, 1),
    )
    .folded(true);
    document.folding_manager_mut().add_fold_marker(marker);
    document.notify_foldings_changed();
    assert!(!document.folding_manager().is_line_visible(document.content().lines(), 1));
    assert_eq!(document.total_visible_lines(), 2);
}
