//! Non-repeating selection over a content table.

use std::collections::BTreeSet;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::challenge::{ChallengeId, ChallengeKind};
use crate::content::{ContentEntry, ContentError};

/// Remembers which rows have been drawn in the current cycle.
///
/// Rows are drawn uniformly among those not yet shown. When every row has
/// been shown the history is cleared and the draw is retried once, which
/// always succeeds for a non-empty table.
#[derive(Clone, Debug, Default)]
pub struct NonRepeatingPool {
    used: BTreeSet<ChallengeId>,
}

impl NonRepeatingPool {
    /// Number of resets attempted before giving up on an empty table.
    const MAX_RESETS: usize = 1;

    pub fn new() -> Self {
        Self::default()
    }

    /// Draws an unused row from `entries`, resetting the cycle when exhausted.
    pub fn draw<'e, R>(
        &mut self,
        kind: ChallengeKind,
        entries: &'e [ContentEntry],
        rng: &mut R,
    ) -> Result<&'e ContentEntry, ContentError>
    where
        R: Rng + ?Sized,
    {
        for _ in 0..=Self::MAX_RESETS {
            let available: Vec<&ContentEntry> = entries
                .iter()
                .filter(|entry| !self.used.contains(&entry.id))
                .collect();

            if let Some(&entry) = available.choose(rng) {
                self.used.insert(entry.id);
                return Ok(entry);
            }

            self.used.clear();
        }

        Err(ContentError::Empty { kind })
    }

    /// Ids drawn since the last reset.
    pub fn used(&self) -> &BTreeSet<ChallengeId> {
        &self.used
    }

    pub fn is_exhausted(&self, entries: &[ContentEntry]) -> bool {
        entries.iter().all(|entry| self.used.contains(&entry.id))
    }

    pub fn reset(&mut self) {
        self.used.clear();
    }
}
