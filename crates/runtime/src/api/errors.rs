//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from mode lifecycles, repositories and session plumbing so
//! clients can bubble them up with consistent context.
use thiserror::Error;

use game_core::{ContentError, ModeKind};

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Lifecycle misuse and content failures raised by a game mode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModeError {
    #[error("{mode} still owns a live challenge; clean up before generating another")]
    ChallengeLive { mode: ModeKind },

    #[error("{mode} has no challenge to render")]
    NoChallenge { mode: ModeKind },

    #[error("{mode} round is over; no further challenges in this instance")]
    RoundOver { mode: ModeKind },

    #[error(transparent)]
    Content(#[from] ContentError),
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Mode(#[from] ModeError),

    #[error("coin store failed")]
    Store(#[source] RepositoryError),

    #[error("session requires a {0} before building")]
    MissingComponent(&'static str),

    #[error("session event channel closed")]
    EventChannelClosed,
}
