//! Repository contracts for data that outlives a session.

use game_core::ModeKind;

use super::error::Result;

/// Persistent coin balance.
///
/// The session reads the balance once at start and writes it only after a
/// reward sequence has completed.
pub trait CoinStore: Send + Sync {
    /// Current balance.
    fn balance(&self) -> Result<u64>;

    /// Adds `amount` and returns the new balance.
    fn add_coins(&self, amount: u64) -> Result<u64>;

    /// Removes `amount` if the balance covers it.
    ///
    /// Returns the new balance, or `None` (leaving the balance untouched) when
    /// funds are insufficient.
    fn deduct_coins(&self, amount: u64) -> Result<Option<u64>>;
}

/// Fire-and-forget record of mismatched answers.
///
/// Implementations must not block the session and must swallow their own
/// failures; a lost mistake record never affects gameplay.
pub trait WrongAnswerSink: Send + Sync {
    fn record(&self, mode: ModeKind, correct: &str, selected: &str);
}

/// Sink that drops every record.
#[derive(Clone, Copy, Debug, Default)]
pub struct DiscardMistakes;

impl WrongAnswerSink for DiscardMistakes {
    fn record(&self, _mode: ModeKind, _correct: &str, _selected: &str) {}
}
