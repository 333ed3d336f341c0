//! Topic-based event bus for session events.
//!
//! Front-ends and tests observe a session exclusively through these events;
//! publishing is best-effort and never blocks the session loop.

mod bus;
mod game_event;

pub use bus::{EventBus, Topic};
pub use game_event::{DropReason, GameEvent, InputBinding, InputTarget, SessionEnd};
