//! Dwell-based gesture confirmation.
//!
//! Per-frame classification flickers. A gesture only becomes input after it
//! has been the top-scoring gesture, without interruption, for the dwell
//! duration. Any change of top gesture restarts the clock, so a single
//! flickered frame pushes the acceptance back by a full dwell period.
//!
//! Once a gesture is accepted the clock is re-armed at that instant and the
//! candidate is kept. Holding a gesture therefore produces one acceptance per
//! full dwell window, never one per frame. Holding through two windows is how
//! a player enters a double letter.

use std::time::Duration;

use crate::classification::ClassificationResult;
use crate::gesture::{Gesture, GestureAction};
use crate::WORD_LEN;

/// Default time a gesture must stay on top before it is accepted.
pub const DWELL_DURATION: Duration = Duration::from_millis(3000);

/// Effect of an accepted gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acceptance {
    /// Append this letter to the input buffer.
    Letter(char),
    /// Submit the (full) input buffer as a guess.
    Submit,
}

/// State carried between frames.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfirmationState {
    /// Gesture accumulating dwell time. `None` while no hand is visible.
    candidate: Option<Gesture>,
    /// When the candidate became top, or when it was last accepted.
    candidate_since: Duration,
    /// Most recent gesture that produced an effect.
    last_emitted: Option<Gesture>,
    /// Score of the candidate on the latest frame.
    last_score: Option<f32>,
}

impl ConfirmationState {
    pub fn candidate(&self) -> Option<Gesture> {
        self.candidate
    }

    pub fn candidate_since(&self) -> Duration {
        self.candidate_since
    }

    pub fn last_emitted(&self) -> Option<Gesture> {
        self.last_emitted
    }

    pub fn last_score(&self) -> Option<f32> {
        self.last_score
    }
}

/// Countdown information for the gesture currently being held.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DwellProgress {
    pub candidate: Gesture,
    pub score: Option<f32>,
    pub elapsed: Duration,
    pub remaining: Duration,
}

impl DwellProgress {
    /// Fraction of the dwell window completed, in `0.0..=1.0`.
    pub fn fraction(&self) -> f32 {
        let total = self.elapsed + self.remaining;
        if total.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / total.as_secs_f32()).min(1.0)
    }
}

/// Advance the confirmation state by one frame.
///
/// `buffer_len` is the number of letters already in the caller's input
/// buffer; it decides whether an acceptance has any effect. `now` must not
/// decrease between calls. If it does, the frame counts as zero elapsed time.
pub fn step(
    mut state: ConfirmationState,
    result: &ClassificationResult,
    now: Duration,
    buffer_len: usize,
    dwell: Duration,
) -> (ConfirmationState, Option<Acceptance>) {
    let Some(top) = result.top() else {
        // No hand (or nothing usable): drop the candidate.
        state.candidate = None;
        state.last_score = None;
        return (state, None);
    };

    state.last_score = Some(top.score);

    if state.candidate != Some(top.gesture) {
        state.candidate = Some(top.gesture);
        state.candidate_since = now;
        return (state, None);
    }

    if now < state.candidate_since {
        log::warn!(
            "Frame timestamp {:?} is earlier than dwell start {:?}; ignoring elapsed time",
            now,
            state.candidate_since
        );
    }
    let elapsed = now.saturating_sub(state.candidate_since);
    if elapsed < dwell {
        return (state, None);
    }

    // Dwell satisfied: re-arm so the next acceptance needs another full window.
    state.candidate_since = now;

    let acceptance = match top.gesture.action() {
        GestureAction::Letter(c) if buffer_len < WORD_LEN => Some(Acceptance::Letter(c)),
        GestureAction::Submit if buffer_len == WORD_LEN => Some(Acceptance::Submit),
        action => {
            log::debug!(
                "Ignoring {:?} from gesture {} with {} letter(s) buffered",
                action,
                top.gesture,
                buffer_len
            );
            None
        }
    };

    if acceptance.is_some() {
        state.last_emitted = Some(top.gesture);
    }

    (state, acceptance)
}

/// Owns a [`ConfirmationState`] and the dwell setting for one session.
#[derive(Debug, Clone)]
pub struct ConfirmationPipeline {
    state: ConfirmationState,
    dwell: Duration,
}

impl ConfirmationPipeline {
    pub fn new(dwell: Duration) -> Self {
        Self {
            state: ConfirmationState::default(),
            dwell,
        }
    }

    /// Feed one frame. See [`step`].
    pub fn step(
        &mut self,
        result: &ClassificationResult,
        now: Duration,
        buffer_len: usize,
    ) -> Option<Acceptance> {
        let state = std::mem::take(&mut self.state);
        let (state, acceptance) = step(state, result, now, buffer_len, self.dwell);
        self.state = state;
        acceptance
    }

    /// Forget any gesture in progress.
    pub fn reset(&mut self) {
        self.state = ConfirmationState::default();
    }

    pub fn state(&self) -> &ConfirmationState {
        &self.state
    }

    pub fn dwell(&self) -> Duration {
        self.dwell
    }

    /// Countdown for the current candidate, if a hand is visible.
    pub fn progress(&self, now: Duration) -> Option<DwellProgress> {
        let candidate = self.state.candidate()?;
        let elapsed = now.saturating_sub(self.state.candidate_since).min(self.dwell);
        Some(DwellProgress {
            candidate,
            score: self.state.last_score(),
            elapsed,
            remaining: self.dwell - elapsed,
        })
    }
}

impl Default for ConfirmationPipeline {
    fn default() -> Self {
        Self::new(DWELL_DURATION)
    }
}
