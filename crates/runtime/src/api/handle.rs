//! Cloneable façade for driving a running session.
//!
//! [`SessionHandle`] hides the queue plumbing: front-ends forward activations
//! of bound handles, ask the session to end, and stream events by topic.
use tokio::sync::{broadcast, mpsc};

use super::errors::{Result, RuntimeError};
use crate::events::{EventBus, GameEvent, Topic};
use crate::surface::HandleId;
use crate::workers::SessionEvent;

/// Client-facing handle to interact with a session
#[derive(Clone)]
pub struct SessionHandle {
    event_tx: mpsc::UnboundedSender<SessionEvent>,
    event_bus: EventBus,
}

impl SessionHandle {
    pub(crate) fn new(event_tx: mpsc::UnboundedSender<SessionEvent>, event_bus: EventBus) -> Self {
        Self {
            event_tx,
            event_bus,
        }
    }

    /// Reports an activation of `handle` (a tap or click on a bound region).
    ///
    /// Activations are queued; whether they reach the active mode is decided by
    /// the session when it gets to them.
    pub fn activate(&self, handle: HandleId) -> Result<()> {
        self.send(SessionEvent::Input(handle))
    }

    /// Asks the session to end. A reward in flight completes and is persisted
    /// first.
    pub fn exit(&self) -> Result<()> {
        self.send(SessionEvent::Exit)
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Session` - Start/end, mode selection, balance and booster changes
    /// - `Topic::Challenge` - Challenges shown, answers, dropped input
    /// - `Topic::Reward` - Reward stages and completion
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<GameEvent> {
        self.event_bus.subscribe(topic)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    fn send(&self, event: SessionEvent) -> Result<()> {
        self.event_tx
            .send(event)
            .map_err(|_| RuntimeError::EventChannelClosed)
    }
}
