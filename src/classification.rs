//! Per-frame classifier output.

use crate::gesture::Gesture;

/// One scored gesture from the classifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureScore {
    pub gesture: Gesture,
    pub score: f32,
}

/// Scores for a single frame, in the order the classifier reported them.
///
/// An empty result means no hand was detected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassificationResult {
    scores: Vec<GestureScore>,
}

impl ClassificationResult {
    pub fn new(scores: Vec<GestureScore>) -> Self {
        Self { scores }
    }

    /// A frame with no hand in it.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn scores(&self) -> &[GestureScore] {
        &self.scores
    }

    /// Highest-scoring entry.
    ///
    /// Ties go to the entry seen first. NaN scores never win; a result made
    /// only of NaN scores has no top entry.
    pub fn top(&self) -> Option<GestureScore> {
        let mut best: Option<GestureScore> = None;
        for entry in self.scores.iter().filter(|e| !e.score.is_nan()) {
            match best {
                Some(b) if entry.score <= b.score => {}
                _ => best = Some(*entry),
            }
        }
        best
    }
}

impl FromIterator<(Gesture, f32)> for ClassificationResult {
    fn from_iter<T: IntoIterator<Item = (Gesture, f32)>>(iter: T) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(gesture, score)| GestureScore { gesture, score })
                .collect(),
        )
    }
}
