//! Repaint requests.
//!
//! Components queue [`TextAreaUpdate`]s while the document changes; views drain the queue in
//! one commit. Once a whole-area repaint is queued, narrower requests are dropped.

use crate::line_manager::TextPosition;

/// Region of the text area that needs repainting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAreaUpdate {
    /// Everything.
    WholeTextArea,
    /// One logical line.
    SingleLine(usize),
    /// One character cell.
    SinglePosition(TextPosition),
    /// From a position to the end of its line.
    PositionToLineEnd(TextPosition),
    /// From a position to the end of the text.
    PositionToEnd(TextPosition),
    /// An inclusive range of lines.
    LinesBetween(usize, usize),
}

/// Pending repaint requests.
#[derive(Debug, Clone, Default)]
pub struct UpdateQueue {
    pending: Vec<TextAreaUpdate>,
}

impl UpdateQueue {
    /// Empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a request.
    pub fn request(&mut self, update: TextAreaUpdate) {
        if self.pending.first() == Some(&TextAreaUpdate::WholeTextArea) {
            return;
        }
        if update == TextAreaUpdate::WholeTextArea {
            self.pending.clear();
        } else if self.pending.contains(&update) {
            return;
        }
        self.pending.push(update);
    }

    /// Requests queued so far.
    pub fn pending(&self) -> &[TextAreaUpdate] {
        &self.pending
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Take every queued request.
    pub fn drain(&mut self) -> Vec<TextAreaUpdate> {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_area_supersedes_everything() {
        let mut queue = UpdateQueue::new();
        queue.request(TextAreaUpdate::SingleLine(3));
        queue.request(TextAreaUpdate::SingleLine(3));
        assert_eq!(queue.pending().len(), 1);
        queue.request(TextAreaUpdate::WholeTextArea);
        queue.request(TextAreaUpdate::LinesBetween(1, 4));
        assert_eq!(queue.pending(), &[TextAreaUpdate::WholeTextArea]);
        assert_eq!(queue.drain(), vec![TextAreaUpdate::WholeTextArea]);
        assert!(queue.is_empty());
    }
}
