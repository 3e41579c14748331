//! Character-by-character reveal of an already received reply.

/// Progress of revealing one reply.
///
/// The full text is held from the start; the reveal only tracks how much
/// of it is visible, so abandoning it loses nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reveal {
    text: String,
    // Byte offset of the first hidden character, always on a char boundary.
    shown: usize,
}

impl Reveal {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            shown: 0,
        }
    }

    /// Reveal the next character and return it, or `None` once complete.
    pub fn advance(&mut self) -> Option<char> {
        let next = self.text[self.shown..].chars().next()?;
        self.shown += next.len_utf8();
        Some(next)
    }

    /// Reveal everything left and return it.
    pub fn finish(&mut self) -> &str {
        let start = self.shown;
        self.shown = self.text.len();
        &self.text[start..]
    }

    pub fn is_complete(&self) -> bool {
        self.shown == self.text.len()
    }

    /// The prefix currently visible.
    pub fn visible(&self) -> &str {
        &self.text[..self.shown]
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}
