//! In-memory repositories for tests and local runs.

use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use game_core::ModeKind;

use super::error::{RepositoryError, Result};
use super::mistakes::MistakeLog;
use super::traits::{CoinStore, WrongAnswerSink};

/// In-memory coin balance.
///
/// Counts mutating calls so tests can assert when persistence happened.
#[derive(Debug, Default)]
pub struct InMemoryCoinStore {
    balance: RwLock<u64>,
    writes: AtomicUsize,
}

impl InMemoryCoinStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_balance(balance: u64) -> Self {
        Self {
            balance: RwLock::new(balance),
            writes: AtomicUsize::new(0),
        }
    }

    /// Number of successful `add_coins`/`deduct_coins` calls.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl CoinStore for InMemoryCoinStore {
    fn balance(&self) -> Result<u64> {
        let balance = self
            .balance
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(*balance)
    }

    fn add_coins(&self, amount: u64) -> Result<u64> {
        let mut balance = self
            .balance
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        *balance = balance.saturating_add(amount);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(*balance)
    }

    fn deduct_coins(&self, amount: u64) -> Result<Option<u64>> {
        let mut balance = self
            .balance
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let Some(remaining) = balance.checked_sub(amount) else {
            return Ok(None);
        };
        *balance = remaining;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(Some(remaining))
    }
}

/// In-memory wrong-answer sink.
#[derive(Debug, Default)]
pub struct InMemoryMistakeLog {
    log: RwLock<MistakeLog>,
}

impl InMemoryMistakeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current log.
    pub fn snapshot(&self) -> MistakeLog {
        self.log
            .read()
            .map(|log| log.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl WrongAnswerSink for InMemoryMistakeLog {
    fn record(&self, mode: ModeKind, correct: &str, selected: &str) {
        match self.log.write() {
            Ok(mut log) => {
                let count = log.record(mode, correct, selected);
                tracing::debug!(
                    target: "runtime::repository",
                    mode = mode.name(),
                    correct,
                    selected,
                    count,
                    "mistake recorded"
                );
            }
            Err(_) => {
                tracing::warn!(target: "runtime::repository", "mistake log lock poisoned");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deduct_refuses_overdraft() {
        let store = InMemoryCoinStore::with_balance(5);

        assert_eq!(store.deduct_coins(6).unwrap(), None);
        assert_eq!(store.balance().unwrap(), 5);
        assert_eq!(store.deduct_coins(5).unwrap(), Some(0));
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn add_returns_new_balance() {
        let store = InMemoryCoinStore::new();
        assert_eq!(store.add_coins(2).unwrap(), 2);
        assert_eq!(store.add_coins(3).unwrap(), 5);
    }
}
