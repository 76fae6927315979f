//! Stage 1: Gap Text Buffer
//!
//! Document characters live in one array with a movable gap. The gap is parked at the end of
//! the last edit, so a run of keystrokes at the same place costs amortized O(1) per character.
//!
//! Layout: `[pre-gap content | gap | post-gap content]`. All offsets are logical character
//! offsets (Unicode scalar values) that ignore the gap.

/// Default gap length allocated on growth.
pub const DEFAULT_MIN_GAP_LENGTH: usize = 128;
/// Default gap length above which the buffer compacts.
pub const DEFAULT_MAX_GAP_LENGTH: usize = 2048;

/// Gap buffer over `char`s.
///
/// A buffer is meant to be driven from a single thread; debug builds assert that every
/// mutation happens on the thread that created it.
#[derive(Debug, Clone)]
pub struct GapTextBuffer {
    buffer: Vec<char>,
    gap_begin: usize,
    gap_end: usize,
    min_gap_length: usize,
    max_gap_length: usize,
    #[cfg(debug_assertions)]
    owner: std::thread::ThreadId,
}

impl GapTextBuffer {
    /// Create an empty buffer with the default gap limits.
    pub fn new() -> Self {
        Self::with_gap_limits(DEFAULT_MIN_GAP_LENGTH, DEFAULT_MAX_GAP_LENGTH)
    }

    /// Create an empty buffer with explicit gap limits.
    ///
    /// `max_gap_length` is raised to at least `min_gap_length`.
    pub fn with_gap_limits(min_gap_length: usize, max_gap_length: usize) -> Self {
        let min_gap_length = min_gap_length.max(1);
        Self {
            buffer: Vec::new(),
            gap_begin: 0,
            gap_end: 0,
            min_gap_length,
            max_gap_length: max_gap_length.max(min_gap_length),
            #[cfg(debug_assertions)]
            owner: std::thread::current().id(),
        }
    }

    /// Number of characters stored.
    pub fn len(&self) -> usize {
        self.buffer.len() - self.gap_length()
    }

    /// Whether the buffer holds no characters.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current gap length.
    pub fn gap_length(&self) -> usize {
        self.gap_end - self.gap_begin
    }

    /// Character at `offset`, or `None` past the end.
    pub fn char_at(&self, offset: usize) -> Option<char> {
        if offset < self.gap_begin {
            Some(self.buffer[offset])
        } else {
            self.buffer.get(offset + self.gap_length()).copied()
        }
    }

    /// Iterate over the characters of `[offset, offset + length)`.
    ///
    /// The range is clamped to the text.
    pub fn chars_range(&self, offset: usize, length: usize) -> impl Iterator<Item = char> + '_ {
        let len = self.len();
        let start = offset.min(len);
        let end = offset.saturating_add(length).min(len);

        let pre_end = end.min(self.gap_begin);
        let pre = &self.buffer[start.min(pre_end)..pre_end];

        let post_start = start.max(self.gap_begin) + self.gap_length();
        let post_end = end.max(self.gap_begin) + self.gap_length();
        let post = &self.buffer[post_start.min(post_end)..post_end];

        pre.iter().chain(post.iter()).copied()
    }

    /// Iterate over all characters.
    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.buffer[..self.gap_begin]
            .iter()
            .chain(self.buffer[self.gap_end..].iter())
            .copied()
    }

    /// Text of `[offset, offset + length)`, clamped to the buffer.
    pub fn get_text(&self, offset: usize, length: usize) -> String {
        self.chars_range(offset, length).collect()
    }

    /// The full text.
    pub fn text(&self) -> String {
        self.chars().collect()
    }

    /// Insert `text` at `offset`.
    pub fn insert(&mut self, offset: usize, text: &str) {
        self.replace(offset, 0, text);
    }

    /// Remove `length` characters starting at `offset`.
    pub fn remove(&mut self, offset: usize, length: usize) {
        self.replace(offset, length, "");
    }

    /// Replace `[offset, offset + length)` with `text`.
    ///
    /// Out-of-range arguments are clamped; callers validate ranges before getting here.
    pub fn replace(&mut self, offset: usize, length: usize, text: &str) {
        self.assert_owner();

        let len = self.len();
        let offset = offset.min(len);
        let length = length.min(len - offset);
        let inserted: Vec<char> = text.chars().collect();

        // Park the gap right after the replaced range; the removed characters then join it.
        self.place_gap(offset + length, inserted.len().saturating_sub(length));
        self.gap_begin = offset;

        let end = self.gap_begin + inserted.len();
        self.buffer[self.gap_begin..end].copy_from_slice(&inserted);
        self.gap_begin = end;

        if self.gap_length() > self.max_gap_length {
            self.make_new_buffer(self.gap_begin, self.min_gap_length);
        }
    }

    /// Replace the whole content.
    pub fn set_content(&mut self, text: &str) {
        self.assert_owner();

        self.buffer = text.chars().collect();
        self.gap_begin = self.buffer.len();
        self.buffer
            .resize(self.gap_begin + self.min_gap_length, '\0');
        self.gap_end = self.buffer.len();
    }

    fn place_gap(&mut self, new_offset: usize, min_required: usize) {
        if self.gap_length() < min_required {
            self.make_new_buffer(new_offset, min_required + self.max_gap_length);
            return;
        }

        if new_offset < self.gap_begin {
            let shift = self.gap_begin - new_offset;
            self.buffer
                .copy_within(new_offset..self.gap_begin, self.gap_end - shift);
            self.gap_begin = new_offset;
            self.gap_end -= shift;
        } else if new_offset > self.gap_begin {
            let shift = new_offset - self.gap_begin;
            self.buffer
                .copy_within(self.gap_end..self.gap_end + shift, self.gap_begin);
            self.gap_begin += shift;
            self.gap_end += shift;
        }
    }

    fn make_new_buffer(&mut self, new_gap_offset: usize, new_gap_length: usize) {
        let len = self.len();
        let mut buffer = Vec::with_capacity(len + new_gap_length);
        buffer.extend(self.chars_range(0, new_gap_offset));
        buffer.resize(new_gap_offset + new_gap_length, '\0');
        buffer.extend(self.chars_range(new_gap_offset, len - new_gap_offset));

        log::debug!(
            "gap buffer reallocated: {} chars, gap {} -> {} at {}",
            len,
            self.gap_length(),
            new_gap_length,
            new_gap_offset
        );

        self.buffer = buffer;
        self.gap_begin = new_gap_offset;
        self.gap_end = new_gap_offset + new_gap_length;
    }

    #[inline]
    fn assert_owner(&self) {
        #[cfg(debug_assertions)]
        debug_assert_eq!(
            self.owner,
            std::thread::current().id(),
            "GapTextBuffer mutated from a thread other than its owner"
        );
    }
}

impl Default for GapTextBuffer {
    fn default() -> Self {
        Self::new()
    }
}
