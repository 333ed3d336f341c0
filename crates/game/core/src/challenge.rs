//! Challenge data shared by every game mode.
//!
//! A [`Challenge`] is one question instance: a prompt, the candidate options
//! shown to the player, and the identifier of the correct option. Challenges
//! are transient; the owning mode drops them when its round is torn down.

use std::fmt;

/// Stable identifier of a challenge within its content table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ChallengeId(pub u32);

impl fmt::Display for ChallengeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Kind of content a challenge is built from.
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
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ChallengeKind {
    /// A written word matched against emoji candidates.
    WordEmoji,
    /// A spoken letter matched against letter candidates.
    Letter,
    /// A spoken direction answered by picking a screen side.
    Direction,
}

/// One of the two directions used by the left/right challenge.
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
pub enum Direction {
    #[strum(to_string = "vanster", serialize = "left")]
    Left,
    #[strum(to_string = "hoger", serialize = "right")]
    Right,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Left, Direction::Right];

    /// Content key used for audio lookups and answer identifiers.
    pub const fn key(&self) -> &'static str {
        match self {
            Direction::Left => "vanster",
            Direction::Right => "hoger",
        }
    }

    pub const fn display_name(&self) -> &'static str {
        match self {
            Direction::Left => "Vänster",
            Direction::Right => "Höger",
        }
    }

    pub fn audio_key(&self) -> String {
        format!("direction_audio_{}", self.key())
    }
}

/// Identifier of a candidate answer (an emoji, a letter, a direction key).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Choice(String);

impl Choice {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Choice {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<Direction> for Choice {
    fn from(direction: Direction) -> Self {
        Self::new(direction.key())
    }
}

/// Mode-specific display data of a challenge.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Prompt {
    /// Written word shown above the emoji row.
    Word { text: String },
    /// Letter played through the audio device.
    SpokenLetter { audio_key: String },
    /// Direction played through the audio device.
    SpokenDirection { direction: Direction },
}

impl Prompt {
    /// Audio key to auto-play when the challenge is rendered, if any.
    pub fn audio_key(&self) -> Option<String> {
        match self {
            Prompt::Word { .. } => None,
            Prompt::SpokenLetter { audio_key } => Some(audio_key.clone()),
            Prompt::SpokenDirection { direction } => Some(direction.audio_key()),
        }
    }
}

/// Challenge construction errors.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ChallengeError {
    #[error("correct answer {correct} is not among the {options} options")]
    MissingCorrect { correct: Choice, options: usize },
}

/// A single question with one correct option and its distractors.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Challenge {
    pub id: ChallengeId,
    pub kind: ChallengeKind,
    pub prompt: Prompt,
    correct: Choice,
    options: Vec<Choice>,
}

impl Challenge {
    /// Builds a challenge, rejecting option sets that lack the correct answer.
    pub fn new(
        id: ChallengeId,
        kind: ChallengeKind,
        prompt: Prompt,
        correct: Choice,
        options: Vec<Choice>,
    ) -> Result<Self, ChallengeError> {
        if !options.contains(&correct) {
            return Err(ChallengeError::MissingCorrect {
                correct,
                options: options.len(),
            });
        }

        Ok(Self {
            id,
            kind,
            prompt,
            correct,
            options,
        })
    }

    /// Builds a challenge whose option set is known to contain `correct`.
    pub(crate) fn from_parts(
        id: ChallengeId,
        kind: ChallengeKind,
        prompt: Prompt,
        correct: Choice,
        options: Vec<Choice>,
    ) -> Self {
        debug_assert!(options.contains(&correct));
        Self {
            id,
            kind,
            prompt,
            correct,
            options,
        }
    }

    pub fn correct(&self) -> &Choice {
        &self.correct
    }

    /// Candidate answers in presentation order.
    pub fn options(&self) -> &[Choice] {
        &self.options
    }

    pub fn is_correct(&self, selected: &Choice) -> bool {
        &self.correct == selected
    }

    pub fn distractors(&self) -> impl Iterator<Item = &Choice> {
        self.options.iter().filter(move |c| *c != &self.correct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn rejects_options_without_correct_answer() {
        let result = Challenge::new(
            ChallengeId(1),
            ChallengeKind::WordEmoji,
            Prompt::Word {
                text: "KATT".into(),
            },
            Choice::new("🐱"),
            vec![Choice::new("🚗"), Choice::new("🍎")],
        );

        assert!(matches!(
            result,
            Err(ChallengeError::MissingCorrect { options: 2, .. })
        ));
    }

    #[test]
    fn distractors_exclude_correct() {
        let challenge = Challenge::new(
            ChallengeId(2),
            ChallengeKind::Letter,
            Prompt::SpokenLetter {
                audio_key: "letter_audio_a".into(),
            },
            Choice::new("A"),
            vec![Choice::new("B"), Choice::new("A"), Choice::new("C")],
        )
        .unwrap();

        let distractors: Vec<_> = challenge.distractors().map(Choice::as_str).collect();
        assert_eq!(distractors, vec!["B", "C"]);
        assert!(challenge.is_correct(&Choice::new("A")));
    }

    #[test]
    fn direction_parses_content_keys() {
        assert_eq!(Direction::from_str("hoger").unwrap(), Direction::Right);
        assert_eq!(Direction::from_str("Vanster").unwrap(), Direction::Left);
        assert_eq!(Direction::Right.audio_key(), "direction_audio_hoger");
        assert_eq!(Choice::from(Direction::Left).as_str(), "vanster");
    }
}
