//! Local target-word providers.

use rand::Rng;

use crate::evaluate::{Word, WordError};

/// Words used when neither a target nor a list is configured.
pub const DEFAULT_WORDS: &[&str] = &[
    "APPLE", "BASIC", "BRAVE", "CABIN", "CHAIR", "CRANE", "DANCE", "EAGLE", "FAINT", "FLAME",
    "GHOST", "GRAPE", "HEART", "HOUSE", "JELLY", "KNIFE", "LEMON", "LIGHT", "MANGO", "MOUSE",
    "NIGHT", "OCEAN", "PIANO", "PLANT", "QUEEN", "RIVER", "ROBOT", "SHEEP", "SMILE", "SNAKE",
    "STONE", "TABLE", "TIGER", "TRAIN", "UNCLE", "VOICE", "WATER", "WHALE", "YOUTH", "ZEBRA",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WordSourceError {
    #[error("word list is empty")]
    EmptyList,

    #[error("invalid word {word:?} in list: {source}")]
    InvalidEntry {
        word: String,
        #[source]
        source: WordError,
    },
}

/// Supplies one target word per round.
pub trait WordProvider {
    fn next_word(&mut self) -> Result<Word, WordSourceError>;
}

/// Always the same word. Useful for practice and tests.
#[derive(Debug, Clone)]
pub struct FixedWord(pub Word);

impl WordProvider for FixedWord {
    fn next_word(&mut self) -> Result<Word, WordSourceError> {
        Ok(self.0)
    }
}

/// Picks uniformly at random from a validated list.
#[derive(Debug, Clone)]
pub struct WordList {
    words: Vec<Word>,
}

impl WordList {
    /// Validate every entry; any bad entry rejects the whole list.
    pub fn new<I, S>(words: I) -> Result<Self, WordSourceError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| {
                Word::parse(w.as_ref()).map_err(|source| WordSourceError::InvalidEntry {
                    word: w.as_ref().to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if words.is_empty() {
            return Err(WordSourceError::EmptyList);
        }
        Ok(Self { words })
    }

    pub fn builtin() -> Self {
        Self {
            words: DEFAULT_WORDS
                .iter()
                .filter_map(|w| Word::parse(w).ok())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    #[cfg(test)]
    fn contains(&self, word: &Word) -> bool {
        self.words.contains(word)
    }
}

impl WordProvider for WordList {
    fn next_word(&mut self) -> Result<Word, WordSourceError> {
        if self.words.is_empty() {
            return Err(WordSourceError::EmptyList);
        }
        let index = rand::rng().random_range(0..self.words.len());
        Ok(self.words[index])
    }
}
