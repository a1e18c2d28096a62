//! One player's round: confirmation pipeline, input buffer and game state.

use std::time::Duration;

use crate::classification::ClassificationResult;
use crate::confirm::{Acceptance, ConfirmationPipeline, DwellProgress, DWELL_DURATION};
use crate::evaluate::{GuessRow, Word};
use crate::game::{GameState, GameStatus, SubmitOutcome};
use crate::input::InputBuffer;

/// Behaviour knobs for a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSettings {
    /// How long a gesture must be held before it is accepted.
    pub dwell: Duration,
    /// Submit as soon as the fifth letter is accepted, without the confirm
    /// gesture.
    pub auto_submit: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            dwell: DWELL_DURATION,
            auto_submit: false,
        }
    }
}

/// Something the player did that the UI should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    LetterAccepted { letter: char, buffer: String },
    GuessScored { row: GuessRow, status: GameStatus },
}

pub struct Session {
    pipeline: ConfirmationPipeline,
    buffer: InputBuffer,
    game: GameState,
    target: Word,
    settings: SessionSettings,
}

impl Session {
    pub fn new(target: Word, settings: SessionSettings) -> Self {
        Self {
            pipeline: ConfirmationPipeline::new(settings.dwell),
            buffer: InputBuffer::new(),
            game: GameState::new(),
            target,
            settings,
        }
    }

    /// Process one classified frame.
    ///
    /// Returns at most one event. With auto-submit on, accepting the fifth
    /// letter returns the scored guess instead of the letter event.
    pub fn on_frame(&mut self, result: &ClassificationResult, now: Duration) -> Option<SessionEvent> {
        let acceptance = self.pipeline.step(result, now, self.buffer.len())?;

        if self.game.status().is_over() {
            log::debug!("Round over, ignoring {:?}", acceptance);
            return None;
        }

        match acceptance {
            Acceptance::Letter(letter) => {
                if !self.buffer.push(letter) {
                    return None;
                }
                log::info!("Accepted letter {} ({})", letter, self.buffer.as_string());
                if self.settings.auto_submit && self.buffer.is_full() {
                    return self.submit();
                }
                Some(SessionEvent::LetterAccepted {
                    letter,
                    buffer: self.buffer.as_string(),
                })
            }
            Acceptance::Submit => self.submit(),
        }
    }

    /// Submit the buffer as a guess. No-op unless the buffer is full and the
    /// round is still running.
    pub fn submit(&mut self) -> Option<SessionEvent> {
        let guess = match self.buffer.to_word() {
            Ok(word) => word,
            Err(e) => {
                log::debug!("Not submitting incomplete guess: {}", e);
                return None;
            }
        };

        match self.game.submit(&guess, &self.target) {
            SubmitOutcome::Scored { row, status } => {
                self.buffer.clear();
                log::info!("Scored {} -> {:?}", row, status);
                Some(SessionEvent::GuessScored { row, status })
            }
            SubmitOutcome::Ignored => None,
        }
    }

    /// Start a new round with `target`, discarding all round state.
    pub fn new_round(&mut self, target: Word) {
        self.pipeline.reset();
        self.buffer.clear();
        self.game.reset();
        self.target = target;
    }

    pub fn rows(&self) -> &[GuessRow] {
        self.game.rows()
    }

    pub fn status(&self) -> GameStatus {
        self.game.status()
    }

    pub fn buffer(&self) -> &InputBuffer {
        &self.buffer
    }

    pub fn target(&self) -> &Word {
        &self.target
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn progress(&self, now: Duration) -> Option<DwellProgress> {
        self.pipeline.progress(now)
    }
}
