//! Letters accepted for the guess being built.

use crate::evaluate::{Word, WordError};
use crate::WORD_LEN;

/// Accepted letters, at most [`WORD_LEN`] of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBuffer {
    letters: Vec<char>,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an uppercase letter. Returns `false` (and changes nothing) if the
    /// buffer is already full or `letter` is not an ASCII letter.
    pub fn push(&mut self, letter: char) -> bool {
        if self.is_full() || !letter.is_ascii_alphabetic() {
            return false;
        }
        self.letters.push(letter.to_ascii_uppercase());
        true
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.letters.len() == WORD_LEN
    }

    pub fn clear(&mut self) {
        self.letters.clear();
    }

    /// The buffered letters as a word; fails unless the buffer is full.
    pub fn to_word(&self) -> Result<Word, WordError> {
        Word::from_letters(&self.letters)
    }

    pub fn as_string(&self) -> String {
        self.letters.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_until_full() {
        let mut buffer = InputBuffer::new();
        for c in "crane".chars() {
            assert!(buffer.push(c));
        }
        assert!(buffer.is_full());
        assert!(!buffer.push('S'));
        assert_eq!(buffer.len(), 5);
        assert_eq!(buffer.as_string(), "CRANE");
        assert_eq!(buffer.to_word().unwrap().as_str(), "CRANE");
    }

    #[test]
    fn test_rejects_non_letters() {
        let mut buffer = InputBuffer::new();
        assert!(!buffer.push('7'));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_partial_buffer_is_not_a_word() {
        let mut buffer = InputBuffer::new();
        buffer.push('A');
        assert!(buffer.to_word().is_err());
    }

    #[test]
    fn test_clear() {
        let mut buffer = InputBuffer::new();
        buffer.push('A');
        buffer.clear();
        assert!(buffer.is_empty());
    }
}
