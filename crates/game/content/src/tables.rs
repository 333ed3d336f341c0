//! Built-in content tables.
//!
//! The word table pairs a Swedish word with its emoji and four distractors
//! that look nothing like the answer. The alphabet includes Å, Ä and Ö.

use game_core::{ChallengeKind, ContentEntry, ContentSource};

/// Swedish alphabet in dictionary order.
pub const SWEDISH_ALPHABET: [&str; 29] = [
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R", "S",
    "T", "U", "V", "W", "X", "Y", "Z", "Å", "Ä", "Ö",
];

const WORD_EMOJI: [(&str, &str, [&str; 4]); 20] = [
    ("KATT", "🐱", ["🚗", "🍎", "☀️", "📖"]),
    ("HUND", "🐶", ["🏠", "⚽", "🌳", "🍕"]),
    ("BIL", "🚗", ["🐱", "🌸", "❤️", "🎵"]),
    ("HUS", "🏠", ["🐟", "⏰", "🍦", "🐶"]),
    ("TRÄD", "🌳", ["🚗", "🍦", "📖", "⚽"]),
    ("SOL", "☀️", ["🐱", "🍕", "🏠", "🐦"]),
    ("ÄPPLE", "🍎", ["🐶", "🚗", "⏰", "🌙"]),
    ("HJÄRTA", "❤️", ["🌳", "🐟", "☂️", "⚽"]),
    ("BOLL", "⚽", ["🏠", "🐱", "📖", "🍎"]),
    ("BOK", "📖", ["🦁", "🍕", "🚗", "☀️"]),
    ("BLOMMA", "🌸", ["🐶", "⏰", "❤️", "🍦"]),
    ("FISK", "🐟", ["🌳", "🏠", "⚽", "🎵"]),
    ("MÅNE", "🌙", ["🐱", "🍎", "🚗", "📖"]),
    ("MUSIK", "🎵", ["🐶", "🍕", "🌸", "☂️"]),
    ("GLASS", "🍦", ["🐟", "⚽", "🌳", "🦁"]),
    ("PIZZA", "🍕", ["🐱", "☀️", "❤️", "⏰"]),
    ("PARAPLY", "☂️", ["🐶", "📖", "🍎", "🚗"]),
    ("KLOCKA", "⏰", ["🌸", "🐟", "⚽", "🦁"]),
    ("FÅGEL", "🐦", ["🏠", "🍕", "🌳", "❤️"]),
    ("LEJON", "🦁", ["☀️", "🚗", "📖", "⚽"]),
];

/// Word/emoji rows with ids starting at 1.
pub fn word_emoji_table() -> Vec<ContentEntry> {
    WORD_EMOJI
        .iter()
        .zip(1..)
        .map(|((word, emoji, distractors), id)| {
            ContentEntry::new(id, *word, *emoji, distractors.iter().copied())
        })
        .collect()
}

/// One row per letter of `alphabet`, ids starting at 1.
pub fn letter_table<'a>(alphabet: impl IntoIterator<Item = &'a str>) -> Vec<ContentEntry> {
    alphabet
        .into_iter()
        .zip(1..)
        .map(|(letter, id)| ContentEntry::letter(id, letter))
        .collect()
}

/// In-memory [`ContentSource`] backed by owned tables.
///
/// Direction challenges are generated without a table, so that kind always
/// lists an empty slice.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StaticContent {
    words: Vec<ContentEntry>,
    letters: Vec<ContentEntry>,
}

impl StaticContent {
    pub fn new(words: Vec<ContentEntry>, letters: Vec<ContentEntry>) -> Self {
        Self { words, letters }
    }

    /// The shipped Swedish tables.
    pub fn builtin() -> Self {
        Self::new(word_emoji_table(), letter_table(SWEDISH_ALPHABET))
    }

    pub fn words(&self) -> &[ContentEntry] {
        &self.words
    }

    pub fn letters(&self) -> &[ContentEntry] {
        &self.letters
    }
}

impl ContentSource for StaticContent {
    fn list_challenges(&self, kind: ChallengeKind) -> &[ContentEntry] {
        match kind {
            ChallengeKind::WordEmoji => &self.words,
            ChallengeKind::Letter => &self.letters,
            ChallengeKind::Direction => &[],
        }
    }
}
