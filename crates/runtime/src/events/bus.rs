//! Topic-based event bus implementation.

use std::sync::Arc;

use tokio::sync::broadcast;

use super::game_event::GameEvent;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum Topic {
    /// Session lifecycle, mode selection, balance and booster changes
    Session,
    /// Challenge presentation and answers
    Challenge,
    /// Reward sequence progress
    Reward,
}

impl Topic {
    pub const ALL: [Topic; 3] = [Topic::Session, Topic::Challenge, Topic::Reward];
}

impl GameEvent {
    pub fn topic(&self) -> Topic {
        match self {
            GameEvent::SessionStarted { .. }
            | GameEvent::ModeSelected { .. }
            | GameEvent::BoosterChanged { .. }
            | GameEvent::BalanceUpdated { .. }
            | GameEvent::SessionEnded { .. } => Topic::Session,
            GameEvent::ChallengeReady { .. }
            | GameEvent::InputDropped { .. }
            | GameEvent::AnswerAccepted { .. }
            | GameEvent::AnswerIgnored { .. }
            | GameEvent::StreakAdvanced { .. } => Topic::Challenge,
            GameEvent::RewardStage { .. } | GameEvent::RewardFinished { .. } => Topic::Reward,
        }
    }
}

struct Channels {
    session: broadcast::Sender<GameEvent>,
    challenge: broadcast::Sender<GameEvent>,
    reward: broadcast::Sender<GameEvent>,
}

impl Channels {
    fn sender(&self, topic: Topic) -> &broadcast::Sender<GameEvent> {
        match topic {
            Topic::Session => &self.session,
            Topic::Challenge => &self.challenge,
            Topic::Reward => &self.reward,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<Channels>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            channels: Arc::new(Channels {
                session: broadcast::channel(capacity).0,
                challenge: broadcast::channel(capacity).0,
                reward: broadcast::channel(capacity).0,
            }),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: GameEvent) {
        let topic = event.topic();

        if self.channels.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<GameEvent> {
        self.channels.sender(topic).subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
