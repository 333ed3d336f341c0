//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! other layers can stay focused on orchestration, modes, or infrastructure.

pub mod errors;
pub mod handle;

pub use errors::{ModeError, Result, RuntimeError};
pub use handle::SessionHandle;
