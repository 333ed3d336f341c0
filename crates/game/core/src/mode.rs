//! Game mode identities and the selection policy that alternates them.

use crate::challenge::ChallengeKind;

/// The closed set of game modes.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum ModeKind {
    #[strum(to_string = "WordEmojiMatchMode", serialize = "words", serialize = "word-emoji-only")]
    WordEmojiMatch,
    #[strum(to_string = "LetterListeningMode", serialize = "letters", serialize = "letter-only")]
    LetterListening,
    #[strum(to_string = "LeftRightMode", serialize = "directions", serialize = "directions-only")]
    LeftRightDirections,
}

impl ModeKind {
    /// Name reported to the wrong-answer sink and in logs.
    pub const fn name(&self) -> &'static str {
        match self {
            ModeKind::WordEmojiMatch => "WordEmojiMatchMode",
            ModeKind::LetterListening => "LetterListeningMode",
            ModeKind::LeftRightDirections => "LeftRightMode",
        }
    }

    pub const fn challenge_kind(&self) -> ChallengeKind {
        match self {
            ModeKind::WordEmojiMatch => ChallengeKind::WordEmoji,
            ModeKind::LetterListening => ChallengeKind::Letter,
            ModeKind::LeftRightDirections => ChallengeKind::Direction,
        }
    }
}

/// Policy choosing the mode for each challenge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModeSelection {
    /// Even challenge counts play letters, odd counts play words.
    #[default]
    Alternate,
    /// One mode for the whole session (debug paths).
    Pinned(ModeKind),
}

impl ModeSelection {
    pub fn select(&self, challenge_count: u64) -> ModeKind {
        match self {
            ModeSelection::Pinned(kind) => *kind,
            ModeSelection::Alternate if challenge_count % 2 == 0 => ModeKind::LetterListening,
            ModeSelection::Alternate => ModeKind::WordEmojiMatch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn alternates_letters_then_words() {
        let selection = ModeSelection::Alternate;
        let picked: Vec<_> = (0..4).map(|n| selection.select(n)).collect();

        assert_eq!(
            picked,
            vec![
                ModeKind::LetterListening,
                ModeKind::WordEmojiMatch,
                ModeKind::LetterListening,
                ModeKind::WordEmojiMatch,
            ]
        );
    }

    #[test]
    fn pinned_ignores_count() {
        let selection = ModeSelection::Pinned(ModeKind::LeftRightDirections);
        assert!((0..10).all(|n| selection.select(n) == ModeKind::LeftRightDirections));
    }

    #[test]
    fn parses_debug_aliases() {
        assert_eq!(
            ModeKind::from_str("directions-only").unwrap(),
            ModeKind::LeftRightDirections
        );
        assert_eq!(ModeKind::from_str("LETTERS").unwrap(), ModeKind::LetterListening);
        assert_eq!(ModeKind::WordEmojiMatch.name(), "WordEmojiMatchMode");
    }
}
