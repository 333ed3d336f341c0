//! Session runtime for the vocabulary mini-games.
//!
//! This crate wires the pure rules from `game-core` to a presentation
//! [`Surface`], persistent stores and the session clock. Consumers build a
//! [`Session`], hand its [`SessionHandle`] to a front-end, and observe
//! progress through the [`EventBus`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the session and its builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`modes`] implements the game modes behind one lifecycle trait
//! - [`reward`] runs the staged reward animation
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`surface`] defines the presentation contract and a recording surface
//! - [`repository`] persists the coin balance and the mistake log
//! - `workers` keeps the session loop internal to the crate
pub mod api;
pub mod config;
pub mod events;
pub mod modes;
pub mod repository;
pub mod reward;
pub mod runtime;
pub mod surface;

mod workers;

pub use api::{ModeError, Result, RuntimeError, SessionHandle};
pub use config::{FeedbackTimings, ModeTimings, RewardTimings};
pub use events::{DropReason, EventBus, GameEvent, InputBinding, InputTarget, SessionEnd, Topic};
pub use modes::{ActiveMode, Answer, AnswerSink, GameMode, ModeContext, ModeSignal};
pub use repository::{
    CoinStore, DiscardMistakes, FileCoinStore, FileMistakeLog, InMemoryCoinStore,
    InMemoryMistakeLog, MistakeCount, MistakeLog, RepositoryError, WrongAnswerSink,
};
pub use reward::{RewardParams, RewardReport, RewardSequencer, RewardStage};
pub use runtime::{RuntimeConfig, Session, SessionBuilder};
pub use surface::{HandleId, Point, RecordingSurface, Surface, SurfaceOp, Visual};
pub use workers::{ChallengeOrchestrator, RETRY_MESSAGE, Scheduler, SessionSummary, SessionTimer};
