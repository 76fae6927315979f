//! Line terminator helpers.
//!
//! The document keeps whatever delimiters the text contains (`"\n"`, `"\r\n"` or a lone
//! `"\r"`); the line index recognizes all three. [`LineTerminator`] is the delimiter an
//! editor inserts when the user presses Enter, and can be detected from loaded text.

/// The newline sequence inserted for new lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineTerminator {
    /// Unix-style LF (`'\n'`).
    #[default]
    Lf,
    /// Windows-style CRLF (`"\r\n"`).
    CrLf,
    /// Classic Mac-style CR (`'\r'`).
    Cr,
}

impl LineTerminator {
    /// The delimiter text.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
            Self::Cr => "\r",
        }
    }

    /// Length of the delimiter in characters.
    pub fn char_len(self) -> usize {
        self.as_str().len()
    }

    /// Detect the first delimiter used by `text`.
    ///
    /// Returns `None` when the text contains no line break at all.
    pub fn detect_in_text(text: &str) -> Option<Self> {
        let mut chars = text.chars().peekable();
        while let Some(ch) = chars.next() {
            match ch {
                '\n' => return Some(Self::Lf),
                '\r' => {
                    return Some(if chars.peek() == Some(&'\n') {
                        Self::CrLf
                    } else {
                        Self::Cr
                    });
                }
                _ => {}
            }
        }
        None
    }

    /// Rewrite every delimiter in `text` to this terminator.
    pub fn apply_to_text(self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut chars = text.chars().peekable();
        while let Some(ch) = chars.next() {
            match ch {
                '\r' => {
                    if chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    out.push_str(self.as_str());
                }
                '\n' => out.push_str(self.as_str()),
                other => out.push(other),
            }
        }
        out
    }
}
