//! Recognized gesture identifiers and their game actions.
//!
//! The classifier reports gestures by label. Labels are resolved once, at the
//! frame-source boundary, into the closed [`Gesture`] enumeration so the rest
//! of the crate never compares strings.

/// Every gesture the game reacts to: one per letter plus the confirm sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Gesture {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    /// Thumbs up: submit the current guess.
    Confirm,
}

/// What accepting a gesture does to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureAction {
    /// Append this uppercase letter to the guess.
    Letter(char),
    /// Submit the full guess.
    Submit,
}

/// Letter gestures in alphabetical order; index `i` is letter `b'A' + i`.
const LETTERS: [Gesture; 26] = [
    Gesture::A,
    Gesture::B,
    Gesture::C,
    Gesture::D,
    Gesture::E,
    Gesture::F,
    Gesture::G,
    Gesture::H,
    Gesture::I,
    Gesture::J,
    Gesture::K,
    Gesture::L,
    Gesture::M,
    Gesture::N,
    Gesture::O,
    Gesture::P,
    Gesture::Q,
    Gesture::R,
    Gesture::S,
    Gesture::T,
    Gesture::U,
    Gesture::V,
    Gesture::W,
    Gesture::X,
    Gesture::Y,
    Gesture::Z,
];

/// Default labels the classifier uses for the confirm gesture.
pub const DEFAULT_CONFIRM_NAMES: &[&str] = &["👍", "thumbs_up", "confirm"];

impl Gesture {
    /// Gesture for an ASCII letter (either case).
    pub fn from_letter(c: char) -> Option<Self> {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let index = (c.to_ascii_uppercase() as u8 - b'A') as usize;
        LETTERS.get(index).copied()
    }

    /// The action this gesture triggers when accepted.
    pub fn action(self) -> GestureAction {
        match self {
            Gesture::Confirm => GestureAction::Submit,
            letter => GestureAction::Letter((b'A' + letter as u8) as char),
        }
    }

    /// Uppercase letter for letter gestures, `None` for confirm.
    pub fn letter(self) -> Option<char> {
        match self.action() {
            GestureAction::Letter(c) => Some(c),
            GestureAction::Submit => None,
        }
    }

    pub fn is_confirm(self) -> bool {
        self == Gesture::Confirm
    }
}

impl std::fmt::Display for Gesture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.letter() {
            Some(c) => write!(f, "{}", c),
            None => write!(f, "👍"),
        }
    }
}

/// Maps classifier labels onto [`Gesture`]s.
///
/// Single ASCII letters resolve to their letter gesture regardless of case.
/// Any configured alias resolves to [`Gesture::Confirm`]. Everything else is
/// unknown and yields `None`.
#[derive(Debug, Clone)]
pub struct GestureVocabulary {
    confirm_names: Vec<String>,
}

impl GestureVocabulary {
    pub fn new<I, S>(confirm_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            confirm_names: confirm_names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn resolve(&self, label: &str) -> Option<Gesture> {
        let label = label.trim();
        if self
            .confirm_names
            .iter()
            .any(|name| name.eq_ignore_ascii_case(label))
        {
            return Some(Gesture::Confirm);
        }

        let mut chars = label.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Gesture::from_letter(c),
            _ => None,
        }
    }

    pub fn confirm_names(&self) -> &[String] {
        &self.confirm_names
    }
}

impl Default for GestureVocabulary {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIRM_NAMES.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_gestures_map_to_letters() {
        assert_eq!(Gesture::A.action(), GestureAction::Letter('A'));
        assert_eq!(Gesture::M.action(), GestureAction::Letter('M'));
        assert_eq!(Gesture::Z.action(), GestureAction::Letter('Z'));
    }

    #[test]
    fn test_confirm_maps_to_submit() {
        assert_eq!(Gesture::Confirm.action(), GestureAction::Submit);
        assert_eq!(Gesture::Confirm.letter(), None);
        assert!(Gesture::Confirm.is_confirm());
    }

    #[test]
    fn test_from_letter_round_trips_every_letter() {
        for c in 'A'..='Z' {
            let gesture = Gesture::from_letter(c).unwrap();
            assert_eq!(gesture.letter(), Some(c));
        }
    }

    #[test]
    fn test_from_letter_is_case_insensitive() {
        assert_eq!(Gesture::from_letter('q'), Some(Gesture::Q));
    }

    #[test]
    fn test_from_letter_rejects_non_letters() {
        assert_eq!(Gesture::from_letter('1'), None);
        assert_eq!(Gesture::from_letter('é'), None);
        assert_eq!(Gesture::from_letter(' '), None);
    }

    #[test]
    fn test_vocabulary_resolves_letters_and_confirm() {
        let vocab = GestureVocabulary::default();
        assert_eq!(vocab.resolve("A"), Some(Gesture::A));
        assert_eq!(vocab.resolve("x"), Some(Gesture::X));
        assert_eq!(vocab.resolve("👍"), Some(Gesture::Confirm));
        assert_eq!(vocab.resolve("Thumbs_Up"), Some(Gesture::Confirm));
    }

    #[test]
    fn test_vocabulary_unknown_labels() {
        let vocab = GestureVocabulary::default();
        assert_eq!(vocab.resolve(""), None);
        assert_eq!(vocab.resolve("AB"), None);
        assert_eq!(vocab.resolve("peace"), None);
    }

    #[test]
    fn test_vocabulary_custom_confirm_names() {
        let vocab = GestureVocabulary::new(["ok"]);
        assert_eq!(vocab.resolve("ok"), Some(Gesture::Confirm));
        assert_eq!(vocab.resolve("👍"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Gesture::K.to_string(), "K");
        assert_eq!(Gesture::Confirm.to_string(), "👍");
    }
}
