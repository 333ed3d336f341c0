//! Session workers.
//!
//! The orchestrator drives one session; the scheduler feeds delayed
//! continuations back into its queue.

mod orchestrator;
mod scheduler;

pub use orchestrator::{ChallengeOrchestrator, RETRY_MESSAGE, SessionSummary};
pub(crate) use orchestrator::{Collaborators, SessionSettings};
pub use scheduler::{Scheduler, SessionTimer};
pub(crate) use scheduler::SessionEvent;
