//! Repository layer for data that outlives a session.
//!
//! Repositories handle data that CHANGES during gameplay:
//! - The coin balance (written after each completed reward)
//! - The mistake log (written on every mismatch)
//!
//! Static content (words, letters) comes from a `ContentSource`, not a repository.

mod error;
mod file;
mod memory;
mod mistakes;
mod traits;

pub use error::RepositoryError;
pub use file::{FileCoinStore, FileMistakeLog};
pub use memory::{InMemoryCoinStore, InMemoryMistakeLog};
pub use mistakes::{MistakeCount, MistakeLog};
pub use traits::{CoinStore, DiscardMistakes, WrongAnswerSink};
