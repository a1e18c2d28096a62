//! Round progression: guess history and win/loss status.

use crate::evaluate::{evaluate, GuessRow, Word};

/// Guesses allowed per round.
pub const MAX_ROWS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameStatus {
    #[default]
    InProgress,
    Won,
    Lost,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        self != GameStatus::InProgress
    }
}

/// What happened to a submitted guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The guess was scored and appended.
    Scored { row: GuessRow, status: GameStatus },
    /// The round is already over; nothing changed.
    Ignored,
}

/// Rows scored so far in the current round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameState {
    rows: Vec<GuessRow>,
    status: GameStatus,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[GuessRow] {
        &self.rows
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn guesses_left(&self) -> usize {
        MAX_ROWS - self.rows.len()
    }

    /// Score `guess` against `target` and advance the round.
    ///
    /// Once the round is won or lost further submissions are ignored until
    /// [`GameState::reset`].
    pub fn submit(&mut self, guess: &Word, target: &Word) -> SubmitOutcome {
        if self.status.is_over() {
            log::debug!("Ignoring guess {} after round ended ({:?})", guess, self.status);
            return SubmitOutcome::Ignored;
        }

        let row = evaluate(guess, target);
        self.status = if row.is_solved() {
            GameStatus::Won
        } else if self.rows.len() + 1 == MAX_ROWS {
            GameStatus::Lost
        } else {
            GameStatus::InProgress
        };
        self.rows.push(row.clone());

        SubmitOutcome::Scored {
            row,
            status: self.status,
        }
    }

    pub fn reset(&mut self) {
        self.rows.clear();
        self.status = GameStatus::InProgress;
    }
}
