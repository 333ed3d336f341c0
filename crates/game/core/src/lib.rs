//! Deterministic challenge rules shared across the game crates.
//!
//! `game-core` defines the canonical data (challenges, content rows, mode
//! identities) and the pure rules around them: non-repeating selection,
//! challenge generation, streak counting and reward rolls. Nothing here
//! renders, sleeps, or persists; the runtime crate drives these rules through
//! a presentation surface.
pub mod challenge;
pub mod config;
pub mod content;
pub mod generate;
pub mod mode;
pub mod pool;
pub mod reward;
pub mod streak;

pub use challenge::{Challenge, ChallengeError, ChallengeId, ChallengeKind, Choice, Direction, Prompt};
pub use config::GameConfig;
pub use content::{ContentEntry, ContentError, ContentSource};
pub use mode::{ModeKind, ModeSelection};
pub use pool::NonRepeatingPool;
pub use reward::{FixedReward, RewardPolicy, RewardVariant, UniformReward};
pub use streak::{BoosterStreak, DirectionStreak, StreakProgress};
