//! Mistake bookkeeping shared by the in-memory and file-backed sinks.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use game_core::ModeKind;

/// One entry of [`MistakeLog::most_common`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MistakeCount {
    pub mode: String,
    pub mistake: String,
    pub count: u32,
}

/// Mistake counts grouped by mode name, then by mistake key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MistakeLog {
    mistake_counts: BTreeMap<String, BTreeMap<String, u32>>,
    total_mistakes: u64,
    last_updated: DateTime<Utc>,
}

impl MistakeLog {
    pub fn new() -> Self {
        Self {
            mistake_counts: BTreeMap::new(),
            total_mistakes: 0,
            last_updated: Utc::now(),
        }
    }

    /// Key under which a mismatch is counted.
    pub fn mistake_key(mode: ModeKind, correct: &str, selected: &str) -> String {
        match mode {
            ModeKind::LetterListening => format!("{correct}_confused_with_{selected}"),
            ModeKind::WordEmojiMatch => format!("{correct}_chosen_as_{selected}"),
            ModeKind::LeftRightDirections => format!("{correct}_wrong"),
        }
    }

    /// Counts one mismatch and returns the updated count for its key.
    pub fn record(&mut self, mode: ModeKind, correct: &str, selected: &str) -> u32 {
        let key = Self::mistake_key(mode, correct, selected);
        let count = self
            .mistake_counts
            .entry(mode.name().to_owned())
            .or_default()
            .entry(key)
            .or_insert(0);
        *count += 1;

        self.total_mistakes += 1;
        self.last_updated = Utc::now();
        *count
    }

    pub fn count(&self, mode: ModeKind, key: &str) -> u32 {
        self.mistake_counts
            .get(mode.name())
            .and_then(|mistakes| mistakes.get(key))
            .copied()
            .unwrap_or(0)
    }

    pub fn mode_mistakes(&self, mode: ModeKind) -> Option<&BTreeMap<String, u32>> {
        self.mistake_counts.get(mode.name())
    }

    pub fn total(&self) -> u64 {
        self.total_mistakes
    }

    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }

    /// Up to `limit` mistakes, highest count first. Ties keep mode/key order.
    pub fn most_common(&self, limit: usize) -> Vec<MistakeCount> {
        let mut all: Vec<MistakeCount> = self
            .mistake_counts
            .iter()
            .flat_map(|(mode, mistakes)| {
                mistakes.iter().map(move |(mistake, count)| MistakeCount {
                    mode: mode.clone(),
                    mistake: mistake.clone(),
                    count: *count,
                })
            })
            .collect();

        all.sort_by(|a, b| b.count.cmp(&a.count));
        all.truncate(limit);
        all
    }

    pub fn reset(&mut self) {
        self.mistake_counts.clear();
        self.total_mistakes = 0;
        self.last_updated = Utc::now();
    }
}

impl Default for MistakeLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_follow_mode_conventions() {
        assert_eq!(
            MistakeLog::mistake_key(ModeKind::LetterListening, "A", "Ä"),
            "A_confused_with_Ä"
        );
        assert_eq!(
            MistakeLog::mistake_key(ModeKind::WordEmojiMatch, "🐱", "🚗"),
            "🐱_chosen_as_🚗"
        );
        assert_eq!(
            MistakeLog::mistake_key(ModeKind::LeftRightDirections, "hoger", "vanster"),
            "hoger_wrong"
        );
    }

    #[test]
    fn most_common_sorts_by_count() {
        let mut log = MistakeLog::new();
        log.record(ModeKind::LetterListening, "B", "D");
        log.record(ModeKind::LeftRightDirections, "vanster", "hoger");
        log.record(ModeKind::LeftRightDirections, "vanster", "hoger");
        log.record(ModeKind::LetterListening, "B", "D");
        log.record(ModeKind::LetterListening, "B", "D");

        let top = log.most_common(1);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].mode, "LetterListeningMode");
        assert_eq!(top[0].mistake, "B_confused_with_D");
        assert_eq!(top[0].count, 3);
        assert_eq!(log.total(), 5);
        assert_eq!(log.count(ModeKind::LeftRightDirections, "vanster_wrong"), 2);
    }

    #[test]
    fn reset_clears_counts() {
        let mut log = MistakeLog::new();
        log.record(ModeKind::WordEmojiMatch, "🐶", "🍕");
        log.reset();

        assert_eq!(log.total(), 0);
        assert!(log.mode_mistakes(ModeKind::WordEmojiMatch).is_none());
    }
}
