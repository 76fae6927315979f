//! Stage 3: Code Folding
//!
//! # Overview
//!
//! A [`FoldMarker`] covers a character range that can be collapsed into its placeholder text.
//! Markers are offset-addressed, so they follow edits through the shared segment adjustment;
//! their lines and columns are derived from the line index whenever asked.
//!
//! Markers come from a pluggable [`FoldingStrategy`]. Each regeneration is reconciled with the
//! previous set so that a region the user collapsed stays collapsed.
//!
//! # Visible lines
//!
//! A collapsed marker hides the lines strictly between its start and end line, and its end
//! line is drawn on the start line's row. Only *top-level* collapsed markers (those not inside
//! another collapsed marker) take part in the logical/visible line mapping.

use std::any::Any;

use crate::content::TextContent;
use crate::delta::DocumentChange;
use crate::line_manager::{LineManager, TextPosition};
use crate::segment::{Segment, update_segment_list_on_document_change};

/// Kind of folded construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FoldType {
    /// Anything else.
    #[default]
    Unspecified,
    /// Body of a method, function or property.
    MemberBody,
    /// An explicit `#region` block.
    Region,
    /// Body of a class, struct or similar.
    TypeBody,
}

/// A foldable range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldMarker {
    /// Start offset.
    pub offset: usize,
    /// Length in characters.
    pub length: usize,
    /// Kind of construct.
    pub fold_type: FoldType,
    /// Placeholder shown while collapsed.
    pub fold_text: String,
    /// Whether the range is collapsed.
    pub is_folded: bool,
}

impl FoldMarker {
    /// An expanded marker with placeholder `"..."`.
    pub fn new(offset: usize, length: usize) -> Self {
        Self {
            offset,
            length,
            fold_type: FoldType::Unspecified,
            fold_text: "...".to_string(),
            is_folded: false,
        }
    }

    /// A marker between two positions of `lines` (columns clamped to their line).
    pub fn from_positions(lines: &LineManager, start: TextPosition, end: TextPosition) -> Self {
        let text_length = lines.text_length();
        let start = lines.position_to_offset(start).unwrap_or(text_length);
        let end = lines.position_to_offset(end).unwrap_or(text_length);
        Self::new(start.min(end), end.saturating_sub(start))
    }

    /// Set the placeholder text.
    pub fn with_fold_text(mut self, fold_text: impl Into<String>) -> Self {
        self.fold_text = fold_text.into();
        self
    }

    /// Set the fold type.
    pub fn with_type(mut self, fold_type: FoldType) -> Self {
        self.fold_type = fold_type;
        self
    }

    /// Set the collapsed flag.
    pub fn folded(mut self, is_folded: bool) -> Self {
        self.is_folded = is_folded;
        self
    }

    /// Start line/column.
    pub fn start_position(&self, lines: &LineManager) -> TextPosition {
        position_or_past_end(lines, self.offset)
    }

    /// End line/column.
    pub fn end_position(&self, lines: &LineManager) -> TextPosition {
        position_or_past_end(lines, self.end_offset())
    }

    /// Line of the first character.
    pub fn start_line(&self, lines: &LineManager) -> usize {
        self.start_position(lines).line
    }

    /// Line of the end offset.
    pub fn end_line(&self, lines: &LineManager) -> usize {
        self.end_position(lines).line
    }

    /// Column of the first character.
    pub fn start_column(&self, lines: &LineManager) -> usize {
        self.start_position(lines).column
    }

    /// Column of the end offset.
    pub fn end_column(&self, lines: &LineManager) -> usize {
        self.end_position(lines).column
    }

    fn key(&self) -> (usize, usize) {
        (self.offset, self.length)
    }
}

/// Offsets past the text map to a line after the last one.
fn position_or_past_end(lines: &LineManager, offset: usize) -> TextPosition {
    if offset > lines.text_length() {
        TextPosition::new(lines.line_count() + 1, 0)
    } else {
        lines.offset_to_position(offset)
    }
}

impl Segment for FoldMarker {
    fn offset(&self) -> usize {
        self.offset
    }

    fn length(&self) -> usize {
        self.length
    }

    fn set_offset(&mut self, offset: usize) {
        self.offset = offset;
    }

    fn set_length(&mut self, length: usize) {
        self.length = length;
    }
}

/// Produces fold markers for a document.
pub trait FoldingStrategy {
    /// Compute the markers for the current text.
    ///
    /// `parse_info` is an opaque value the host may pass through, such as a parsed syntax tree.
    fn generate_fold_markers(
        &self,
        content: &TextContent,
        file_name: &str,
        parse_info: Option<&dyn Any>,
    ) -> Vec<FoldMarker>;
}

/// The fold markers of one document, kept sorted by `(offset, length)`.
pub struct FoldingManager {
    markers: Vec<FoldMarker>,
    strategy: Option<Box<dyn FoldingStrategy>>,
    enabled: bool,
}

impl FoldingManager {
    /// No markers, no strategy, folding enabled.
    pub fn new() -> Self {
        Self {
            markers: Vec::new(),
            strategy: None,
            enabled: true,
        }
    }

    /// All markers in order.
    pub fn fold_markers(&self) -> &[FoldMarker] {
        &self.markers
    }

    /// Whether collapsed markers hide lines.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turn line hiding on or off.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Install the strategy used by [`update_foldings`](Self::update_foldings).
    pub fn set_folding_strategy(&mut self, strategy: Box<dyn FoldingStrategy>) {
        self.strategy = Some(strategy);
    }

    /// Whether a strategy is installed.
    pub fn has_folding_strategy(&self) -> bool {
        self.strategy.is_some()
    }

    /// Regenerate markers with the installed strategy.
    ///
    /// Returns `false` when no strategy is installed.
    pub fn update_foldings(
        &mut self,
        content: &TextContent,
        file_name: &str,
        parse_info: Option<&dyn Any>,
    ) -> bool {
        let Some(strategy) = &self.strategy else {
            return false;
        };
        let markers = strategy.generate_fold_markers(content, file_name, parse_info);
        self.update_foldings_with(markers);
        true
    }

    /// Replace the markers, carrying the collapsed flag over from markers with the same
    /// offset and length.
    pub fn update_foldings_with(&mut self, mut new_markers: Vec<FoldMarker>) {
        new_markers.sort_by_key(FoldMarker::key);

        let mut old = self.markers.iter().peekable();
        for marker in &mut new_markers {
            while old.next_if(|existing| existing.key() < marker.key()).is_some() {}
            if let Some(existing) = old.peek()
                && existing.key() == marker.key()
            {
                marker.is_folded = existing.is_folded;
            }
        }

        log::debug!(
            "fold markers updated: {} -> {}",
            self.markers.len(),
            new_markers.len()
        );
        self.markers = new_markers;
    }

    /// Add one marker.
    pub fn add_fold_marker(&mut self, marker: FoldMarker) {
        let index = self
            .markers
            .partition_point(|existing| existing.key() <= marker.key());
        self.markers.insert(index, marker);
    }

    /// Remove every marker.
    pub fn clear(&mut self) {
        self.markers.clear();
    }

    /// Follow a text change.
    pub fn on_document_changed(&mut self, change: &DocumentChange) {
        update_segment_list_on_document_change(&mut self.markers, change);
        self.markers.sort_by_key(FoldMarker::key);
    }

    /// Markers strictly enclosing the position `(line, column)`.
    pub fn get_foldings_from_position(
        &self,
        lines: &LineManager,
        line: usize,
        column: usize,
    ) -> Vec<&FoldMarker> {
        let position = TextPosition::new(line, column);
        self.markers
            .iter()
            .filter(|marker| {
                marker.start_position(lines) < position && position < marker.end_position(lines)
            })
            .collect()
    }

    /// Markers starting on `line`.
    pub fn get_foldings_with_start(&self, lines: &LineManager, line: usize) -> Vec<&FoldMarker> {
        self.filter(|marker| marker.start_line(lines) == line)
    }

    /// Collapsed markers starting on `line`.
    pub fn get_folded_foldings_with_start(
        &self,
        lines: &LineManager,
        line: usize,
    ) -> Vec<&FoldMarker> {
        self.filter(|marker| marker.is_folded && marker.start_line(lines) == line)
    }

    /// Markers ending on `line`.
    pub fn get_foldings_with_end(&self, lines: &LineManager, line: usize) -> Vec<&FoldMarker> {
        self.filter(|marker| marker.end_line(lines) == line)
    }

    /// Collapsed markers ending on `line`.
    pub fn get_folded_foldings_with_end(
        &self,
        lines: &LineManager,
        line: usize,
    ) -> Vec<&FoldMarker> {
        self.filter(|marker| marker.is_folded && marker.end_line(lines) == line)
    }

    /// Whether some marker starts on `line`.
    pub fn is_fold_start(&self, lines: &LineManager, line: usize) -> bool {
        self.markers
            .iter()
            .any(|marker| marker.start_line(lines) == line)
    }

    /// Whether some marker ends on `line`.
    pub fn is_fold_end(&self, lines: &LineManager, line: usize) -> bool {
        self.markers
            .iter()
            .any(|marker| marker.end_line(lines) == line)
    }

    /// Markers whose start and end lines strictly enclose `line`.
    pub fn get_foldings_containing_line(
        &self,
        lines: &LineManager,
        line: usize,
    ) -> Vec<&FoldMarker> {
        self.filter(|marker| marker.start_line(lines) < line && line < marker.end_line(lines))
    }

    /// Whether `line` is not hidden by a collapsed marker.
    pub fn is_line_visible(&self, lines: &LineManager, line: usize) -> bool {
        !self.enabled
            || !self.markers.iter().any(|marker| {
                marker.is_folded
                    && marker.start_line(lines) < line
                    && line < marker.end_line(lines)
            })
    }

    /// Collapsed markers not nested inside an earlier collapsed marker, in order.
    pub fn get_top_level_folded_foldings(&self) -> Vec<&FoldMarker> {
        let mut top_level = Vec::new();
        let mut covered_until = 0;
        for marker in self.markers.iter().filter(|marker| marker.is_folded) {
            if top_level.is_empty() || marker.offset >= covered_until {
                covered_until = marker.end_offset();
                top_level.push(marker);
            }
        }
        top_level
    }

    /// Collapse every marker.
    pub fn fold_all(&mut self) {
        for marker in &mut self.markers {
            marker.is_folded = true;
        }
    }

    /// Expand every marker.
    pub fn unfold_all(&mut self) {
        for marker in &mut self.markers {
            marker.is_folded = false;
        }
    }

    /// Toggle the innermost marker starting on `line`. Returns `false` when there is none.
    pub fn toggle_fold_at_line(&mut self, lines: &LineManager, line: usize) -> bool {
        let innermost = self
            .markers
            .iter()
            .enumerate()
            .filter(|(_, marker)| marker.start_line(lines) == line)
            .min_by_key(|(_, marker)| marker.end_offset())
            .map(|(index, _)| index);
        let Some(index) = innermost else {
            return false;
        };
        self.markers[index].is_folded = !self.markers[index].is_folded;
        true
    }

    /// Visible row of logical `line`. Hidden lines map to the row of their fold.
    pub fn get_visible_line(&self, lines: &LineManager, line: usize) -> usize {
        if !self.enabled {
            return line;
        }
        let mut visible = 0;
        let mut fold_end = 0;
        for marker in self.get_top_level_folded_foldings() {
            let start = marker.start_line(lines);
            if start >= line {
                break;
            }
            if start >= fold_end {
                visible += start - fold_end;
                let end = marker.end_line(lines);
                if end > line {
                    return visible;
                }
                fold_end = end;
            }
        }
        visible + line - fold_end
    }

    /// First logical line drawn on visible row `visible_line`.
    pub fn get_first_logical_line(&self, lines: &LineManager, visible_line: usize) -> usize {
        if !self.enabled {
            return visible_line;
        }
        let mut visible = 0;
        let mut fold_end = 0;
        for marker in self.get_top_level_folded_foldings() {
            let start = marker.start_line(lines);
            if start >= fold_end {
                if visible + start - fold_end >= visible_line {
                    break;
                }
                visible += start - fold_end;
                fold_end = marker.end_line(lines);
            }
        }
        fold_end + visible_line - visible
    }

    /// Last logical line drawn on visible row `visible_line`.
    pub fn get_last_logical_line(&self, lines: &LineManager, visible_line: usize) -> usize {
        let next = self.get_first_logical_line(lines, visible_line + 1);
        next.saturating_sub(1)
            .min(lines.line_count().saturating_sub(1))
    }

    /// The line `count` visible lines after `line`.
    pub fn next_visible_line_after(&self, lines: &LineManager, line: usize, count: usize) -> usize {
        let line_count = lines.line_count();
        let mut current = line;
        if self.enabled {
            for _ in 0..count {
                if current >= line_count {
                    break;
                }
                current += 1;
                while current < line_count && !self.is_line_visible(lines, current) {
                    current += 1;
                }
            }
        } else {
            current += count;
        }
        current.min(line_count - 1)
    }

    /// The line `count` visible lines before `line`.
    pub fn next_visible_line_before(&self, lines: &LineManager, line: usize, count: usize) -> usize {
        let mut current = line as isize;
        if self.enabled {
            for _ in 0..count {
                current -= 1;
                while current >= 0 && !self.is_line_visible(lines, current as usize) {
                    current -= 1;
                }
            }
        } else {
            current -= count as isize;
        }
        current.max(0) as usize
    }

    /// Number of visible rows.
    pub fn total_visible_lines(&self, lines: &LineManager) -> usize {
        self.get_visible_line(lines, lines.line_count() - 1) + 1
    }

    /// Serialize the markers as `offset\nlength\nfold_text\nis_folded\n` records.
    ///
    /// Line breaks inside placeholder texts are written as spaces.
    pub fn serialize_to_string(&self) -> String {
        let mut out = String::new();
        for marker in &self.markers {
            let fold_text = marker.fold_text.replace(['\r', '\n'], " ");
            out.push_str(&format!(
                "{}\n{}\n{}\n{}\n",
                marker.offset, marker.length, fold_text, marker.is_folded
            ));
        }
        out
    }

    /// Restore collapsed flags from [`serialize_to_string`](Self::serialize_to_string) output.
    ///
    /// Records matching an existing marker update its flag; others are added when they fit in
    /// `text_length`. Malformed input is logged and ignored as a whole. Returns whether
    /// anything was applied.
    pub fn deserialize_from_string(&mut self, data: &str, text_length: usize) -> bool {
        let records = match parse_fold_records(data) {
            Ok(records) => records,
            Err(reason) => {
                log::warn!("ignoring persisted fold state: {reason}");
                return false;
            }
        };
        let mut applied = false;
        for record in records {
            if let Some(existing) = self
                .markers
                .iter_mut()
                .find(|marker| marker.key() == record.key())
            {
                existing.is_folded = record.is_folded;
                applied = true;
            } else if record.end_offset() <= text_length {
                self.add_fold_marker(record);
                applied = true;
            }
        }
        applied
    }

    fn filter(&self, predicate: impl Fn(&FoldMarker) -> bool) -> Vec<&FoldMarker> {
        self.markers.iter().filter(|marker| predicate(marker)).collect()
    }
}

impl Default for FoldingManager {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_fold_records(data: &str) -> Result<Vec<FoldMarker>, String> {
    let fields: Vec<&str> = data.split('\n').collect();
    // A well-formed string ends with '\n', leaving one trailing empty field.
    let fields = match fields.split_last() {
        Some((&"", rest)) => rest,
        _ => &fields[..],
    };
    if fields.len() % 4 != 0 {
        return Err(format!("{} fields is not a multiple of 4", fields.len()));
    }

    fields
        .chunks_exact(4)
        .map(|record| {
            let offset = record[0]
                .trim()
                .parse::<usize>()
                .map_err(|err| format!("bad offset `{}`: {err}", record[0]))?;
            let length = record[1]
                .trim()
                .parse::<usize>()
                .map_err(|err| format!("bad length `{}`: {err}", record[1]))?;
            let is_folded = match record[3].trim().to_ascii_lowercase().as_str() {
                "true" => true,
                "false" => false,
                other => return Err(format!("bad folded flag `{other}`")),
            };
            Ok(FoldMarker::new(offset, length)
                .with_fold_text(record[2])
                .folded(is_folded))
        })
        .collect()
}
