//! Guess scoring with Wordle feedback.
//!
//! Scoring is two-pass over a per-letter pool built from the target. Exact
//! matches consume from the pool first; only what is left can mark other
//! positions as present. A letter is never credited more often than it
//! occurs in the target.

use std::fmt;
use std::str::FromStr;

use crate::WORD_LEN;

/// Errors for strings that are not a valid five-letter word.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WordError {
    #[error("word must have exactly {expected} letters, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    #[error("word contains non-letter character {ch:?} at position {position}")]
    InvalidCharacter { ch: char, position: usize },
}

/// Five uppercase ASCII letters. Used for both guesses and targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Word([u8; WORD_LEN]);

impl Word {
    /// Validate and uppercase `s`. Surrounding whitespace is ignored.
    pub fn parse(s: &str) -> Result<Self, WordError> {
        let s = s.trim();
        let actual = s.chars().count();
        if actual != WORD_LEN {
            return Err(WordError::WrongLength {
                expected: WORD_LEN,
                actual,
            });
        }

        let mut letters = [0u8; WORD_LEN];
        for (position, ch) in s.chars().enumerate() {
            if !ch.is_ascii_alphabetic() {
                return Err(WordError::InvalidCharacter { ch, position });
            }
            letters[position] = ch.to_ascii_uppercase() as u8;
        }
        Ok(Self(letters))
    }

    /// Build a word from already-accepted letters.
    pub fn from_letters(letters: &[char]) -> Result<Self, WordError> {
        Self::parse(&letters.iter().collect::<String>())
    }

    pub fn letters(&self) -> impl Iterator<Item = char> + '_ {
        self.0.iter().map(|&b| b as char)
    }

    pub fn as_str(&self) -> &str {
        // Only ASCII letters are ever stored.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl FromStr for Word {
    type Err = WordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Feedback for a single position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LetterStatus {
    /// Right letter, right position.
    Correct,
    /// Letter is in the target elsewhere (and not already used up).
    Present,
    /// Letter is not in the target, or all its occurrences are used up.
    Absent,
}

impl LetterStatus {
    fn tile(self) -> char {
        match self {
            LetterStatus::Correct => '🟩',
            LetterStatus::Present => '🟨',
            LetterStatus::Absent => '⬛',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LetterFeedback {
    pub letter: char,
    pub status: LetterStatus,
}

/// A scored guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessRow {
    feedback: [LetterFeedback; WORD_LEN],
}

impl GuessRow {
    pub fn feedback(&self) -> &[LetterFeedback; WORD_LEN] {
        &self.feedback
    }

    pub fn statuses(&self) -> [LetterStatus; WORD_LEN] {
        self.feedback.map(|f| f.status)
    }

    pub fn word(&self) -> String {
        self.feedback.iter().map(|f| f.letter).collect()
    }

    pub fn is_solved(&self) -> bool {
        self.feedback
            .iter()
            .all(|f| f.status == LetterStatus::Correct)
    }
}

impl fmt::Display for GuessRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.word())?;
        for entry in &self.feedback {
            write!(f, "{}", entry.status.tile())?;
        }
        Ok(())
    }
}

fn slot(letter: u8) -> usize {
    (letter - b'A') as usize
}

/// Score `guess` against `target`.
pub fn evaluate(guess: &Word, target: &Word) -> GuessRow {
    let mut remaining = [0u8; 26];
    for &letter in &target.0 {
        remaining[slot(letter)] += 1;
    }

    let mut statuses = [LetterStatus::Absent; WORD_LEN];

    for i in 0..WORD_LEN {
        if guess.0[i] == target.0[i] {
            statuses[i] = LetterStatus::Correct;
            remaining[slot(guess.0[i])] -= 1;
        }
    }

    for i in 0..WORD_LEN {
        if statuses[i] == LetterStatus::Correct {
            continue;
        }
        let count = &mut remaining[slot(guess.0[i])];
        if *count > 0 {
            *count -= 1;
            statuses[i] = LetterStatus::Present;
        }
    }

    GuessRow {
        feedback: std::array::from_fn(|i| LetterFeedback {
            letter: guess.0[i] as char,
            status: statuses[i],
        }),
    }
}

/// Validate raw strings, then [`evaluate`].
pub fn evaluate_str(guess: &str, target: &str) -> Result<GuessRow, WordError> {
    Ok(evaluate(&Word::parse(guess)?, &Word::parse(target)?))
}
