//! Text markers: colored ranges such as error squiggles or search hits.

use crate::delta::DocumentChange;
use crate::highlight::Color;
use crate::line_manager::LineManager;
use crate::segment::{Segment, update_segment_list_on_document_change};

/// How a marker is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextMarkerType {
    /// Not drawn; carries data only.
    #[default]
    Invisible,
    /// Filled background.
    SolidBlock,
    /// Straight underline.
    Underlined,
    /// Wavy underline.
    WaveLine,
}

/// A colored range of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMarker {
    /// Start offset.
    pub offset: usize,
    /// Length in characters.
    pub length: usize,
    /// Drawing style.
    pub marker_type: TextMarkerType,
    /// Marker color.
    pub color: Color,
    /// Text color override inside the marker.
    pub fore_color: Option<Color>,
    /// Hover text.
    pub tooltip: Option<String>,
}

impl TextMarker {
    /// A marker drawn in `color`.
    pub fn new(offset: usize, length: usize, marker_type: TextMarkerType, color: Color) -> Self {
        Self {
            offset,
            length,
            marker_type,
            color,
            fore_color: None,
            tooltip: None,
        }
    }

    /// Attach a tooltip.
    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    /// Override the text color.
    pub fn with_fore_color(mut self, fore_color: Color) -> Self {
        self.fore_color = Some(fore_color);
        self
    }
}

impl Segment for TextMarker {
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

/// The markers of one document.
#[derive(Debug, Clone, Default)]
pub struct MarkerStrategy {
    markers: Vec<TextMarker>,
}

impl MarkerStrategy {
    /// No markers.
    pub fn new() -> Self {
        Self::default()
    }

    /// All markers in insertion order.
    pub fn markers(&self) -> &[TextMarker] {
        &self.markers
    }

    /// Append a marker.
    pub fn add_marker(&mut self, marker: TextMarker) {
        self.markers.push(marker);
    }

    /// Insert a marker at `index` (clamped to the list length).
    pub fn insert_marker(&mut self, index: usize, marker: TextMarker) {
        let index = index.min(self.markers.len());
        self.markers.insert(index, marker);
    }

    /// Remove the marker at `index`.
    pub fn remove_marker(&mut self, index: usize) -> Option<TextMarker> {
        (index < self.markers.len()).then(|| self.markers.remove(index))
    }

    /// Remove every marker matching `predicate`. Returns how many were removed.
    pub fn remove_all(&mut self, mut predicate: impl FnMut(&TextMarker) -> bool) -> usize {
        let before = self.markers.len();
        self.markers.retain(|marker| !predicate(marker));
        before - self.markers.len()
    }

    /// Markers touching `offset`; both ends are inclusive so a caret at either edge hits.
    pub fn get_markers_at(&self, offset: usize) -> Vec<&TextMarker> {
        self.markers
            .iter()
            .filter(|marker| marker.offset <= offset && offset <= marker.end_offset())
            .collect()
    }

    /// Markers overlapping `[offset, offset + length)`.
    pub fn get_markers_in(&self, offset: usize, length: usize) -> Vec<&TextMarker> {
        if length == 0 {
            return self.get_markers_at(offset);
        }
        let end = offset + length;
        self.markers
            .iter()
            .filter(|marker| marker.offset < end && offset < marker.end_offset().max(marker.offset + 1))
            .collect()
    }

    /// Markers overlapping the visible text of `line`.
    pub fn get_markers_for_line(&self, lines: &LineManager, line: usize) -> Vec<&TextMarker> {
        match lines.segment(line) {
            Some(segment) => self.get_markers_in(segment.offset, segment.length()),
            None => Vec::new(),
        }
    }

    /// Follow a text change.
    pub fn on_document_changed(&mut self, change: &DocumentChange) {
        update_segment_list_on_document_change(&mut self.markers, change);
    }

    /// Remove all markers.
    pub fn clear(&mut self) {
        self.markers.clear();
    }
}
