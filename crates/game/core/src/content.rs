//! Content contract consumed by challenge generators.
//!
//! Content tables (words, emoji, letters) live outside the core. Generators
//! only see them through [`ContentSource`], a pure and synchronous lookup.

use crate::challenge::{ChallengeId, ChallengeKind};

/// One row of a content table.
///
/// For word/emoji tables `prompt` is the word and `correct` the emoji. Letter
/// tables use the letter for both fields and leave `distractors` empty; the
/// letter generator draws distractors from the rest of the alphabet.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContentEntry {
    pub id: ChallengeId,
    pub prompt: String,
    pub correct: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub distractors: Vec<String>,
}

impl ContentEntry {
    pub fn new(
        id: u32,
        prompt: impl Into<String>,
        correct: impl Into<String>,
        distractors: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            id: ChallengeId(id),
            prompt: prompt.into(),
            correct: correct.into(),
            distractors: distractors.into_iter().map(Into::into).collect(),
        }
    }

    /// Letter rows carry no distractors of their own.
    pub fn letter(id: u32, letter: impl Into<String>) -> Self {
        let letter = letter.into();
        Self {
            id: ChallengeId(id),
            prompt: letter.clone(),
            correct: letter,
            distractors: Vec::new(),
        }
    }
}

/// Read-only access to challenge content, keyed by challenge kind.
pub trait ContentSource: Send + Sync {
    /// Ordered content rows for `kind`. Kinds without a table return an empty slice.
    fn list_challenges(&self, kind: ChallengeKind) -> &[ContentEntry];
}

/// Errors raised when content cannot produce a challenge.
///
/// An empty table is a configuration error, not a runtime condition: the
/// non-repeating pool resets itself on exhaustion, so the only way to run out
/// is to have no rows at all.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ContentError {
    #[error("content table for {kind} is empty")]
    Empty { kind: ChallengeKind },

    #[error("content table for {kind} needs at least {required} rows, found {found}")]
    TooFewRows {
        kind: ChallengeKind,
        required: usize,
        found: usize,
    },

    #[error(transparent)]
    InvalidChallenge(#[from] crate::challenge::ChallengeError),
}
