//! Random edit sequences checked against a plain `String` reference.
//!
//! After every batch of edits the text, the line segments and the offset/position mapping must
//! agree with what a naive scan of the reference produces.

use codedoc_core::{Document, DocumentConfig, TextPosition};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Line start offsets and delimiter lengths computed by scanning `text`.
fn reference_lines(text: &str) -> Vec<(usize, usize, usize)> {
    let chars: Vec<char> = text.chars().collect();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut index = 0;
    while index < chars.len() {
        let delimiter = match chars[index] {
            '\r' if chars.get(index + 1) == Some(&'\n') => 2,
            '\r' | '\n' => 1,
            _ => 0,
        };
        if delimiter > 0 {
            lines.push((start, index - start, delimiter));
            index += delimiter;
            start = index;
        } else {
            index += 1;
        }
    }
    lines.push((start, chars.len() - start, 0));
    lines
}

fn char_insert(reference: &mut String, offset: usize, text: &str) {
    let byte = reference
        .char_indices()
        .nth(offset)
        .map_or(reference.len(), |(byte, _)| byte);
    reference.insert_str(byte, text);
}

fn char_remove(reference: &mut String, offset: usize, length: usize) {
    let start = reference
        .char_indices()
        .nth(offset)
        .map_or(reference.len(), |(byte, _)| byte);
    let end = reference
        .char_indices()
        .nth(offset + length)
        .map_or(reference.len(), |(byte, _)| byte);
    reference.replace_range(start..end, "");
}

fn assert_matches_reference(document: &Document, reference: &str) {
    assert_eq!(document.text_content(), reference);
    assert_eq!(document.text_length(), reference.chars().count());

    let expected = reference_lines(reference);
    assert_eq!(document.total_number_of_lines(), expected.len());
    for (line, &(offset, length, delimiter)) in expected.iter().enumerate() {
        let segment = document.get_line_segment(line).unwrap();
        assert_eq!(
            (segment.offset, segment.length(), segment.delimiter_length),
            (offset, length, delimiter),
            "line {line}"
        );
    }
}

#[test]
fn test_random_edits_match_reference() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    // Small gaps force frequent reallocation.
    let config = DocumentConfig {
        min_gap_length: 4,
        max_gap_length: 16,
        ..DocumentConfig::default()
    };
    let mut document = Document::with_config("", config);
    let mut reference = String::new();
    let pieces = ["a", "xyz", "\n", "\r\n", "\r", "你好", "👋", "line\r\nnext\n", " \t"];

    for step in 0..2_000 {
        let len = reference.chars().count();
        if len == 0 || rng.gen_bool(0.6) {
            let offset = rng.gen_range(0..=len);
            let text = pieces[rng.gen_range(0..pieces.len())];
            document.insert(offset, text).unwrap();
            char_insert(&mut reference, offset, text);
        } else {
            let offset = rng.gen_range(0..len);
            let length = rng.gen_range(1..=(len - offset).min(8));
            document.remove(offset, length).unwrap();
            char_remove(&mut reference, offset, length);
        }
        if step % 100 == 99 {
            assert_matches_reference(&document, &reference);
        }
    }
    assert_matches_reference(&document, &reference);
}

#[test]
fn test_undo_everything_restores_original() {
    let mut rng = StdRng::seed_from_u64(42);
    let original = "fn main() {\r\n    let x = 1;\n}\n";
    let mut document = Document::new(original);
    let mut snapshots = vec![document.text_content()];

    for _ in 0..200 {
        let len = document.text_length();
        let offset = rng.gen_range(0..=len);
        let length = rng.gen_range(0..=(len - offset).min(3));
        let text = if rng.gen_bool(0.3) { "\n" } else { "ab" };
        document.replace(offset, length, text).unwrap();
        snapshots.push(document.text_content());
    }

    snapshots.pop();
    while let Some(expected) = snapshots.pop() {
        assert!(document.undo().unwrap());
        assert_eq!(document.text_content(), expected);
    }
    assert!(!document.undo().unwrap());
    assert_matches_reference(&document, original);
}

#[test]
fn test_offset_position_round_trip() {
    let text = "first\r\nsecond\rthird\n\nlast";
    let document = Document::new(text);
    let mut inside_delimiter = Vec::new();
    for offset in 0..=document.text_length() {
        let position = document.offset_to_position(offset).unwrap();
        let segment = document.get_line_segment(position.line).unwrap();
        assert!(position.column <= segment.total_length);
        let round_trip = document.position_to_offset(position).unwrap();
        if position.column <= segment.length() {
            assert_eq!(round_trip, offset);
        } else {
            // Between '\r' and '\n' the column clamps back to the end of the line's text.
            assert_eq!(round_trip, segment.end_offset());
            inside_delimiter.push(offset);
        }
    }
    assert_eq!(inside_delimiter, vec![6]);
    assert_eq!(document.offset_to_position(6).unwrap(), TextPosition::new(0, 6));
    assert_eq!(document.offset_to_position(7).unwrap(), TextPosition::new(1, 0));
    assert_eq!(
        document.position_to_offset(TextPosition::new(0, 99)).unwrap(),
        5
    );
}

#[test]
fn test_line_split_and_merge() {
    let mut document = Document::new("abc\ndef\nghi");
    document.insert(4, "X").unwrap();
    assert_eq!(document.line_text(1).unwrap(), "Xdef");
    assert_eq!(document.get_line_segment(2).unwrap().offset, 9);

    // Joining '\r' and '\n' across an edit boundary forms one delimiter.
    let mut document = Document::new("a\rb");
    document.remove(2, 1).unwrap();
    document.insert(2, "\n").unwrap();
    assert_eq!(document.total_number_of_lines(), 2);
    assert_eq!(document.get_line_segment(0).unwrap().delimiter_length, 2);

    document.remove(1, 1).unwrap();
    assert_eq!(document.total_number_of_lines(), 2);
    assert_eq!(document.get_line_segment(0).unwrap().delimiter_length, 1);
}
