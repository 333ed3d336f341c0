//! Session assembly.
//!
//! The session owns the orchestrator and wires the event queue, the event bus
//! and the reward sequencer together. [`SessionBuilder`] injects the surface,
//! content, stores and reward policy; [`SessionHandle`] is the cloneable
//! façade handed to front-ends.

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::mpsc;

use game_content::StaticContent;
use game_core::{ContentSource, GameConfig, ModeSelection, RewardPolicy, UniformReward};

use crate::api::{Result, RuntimeError, SessionHandle};
use crate::config::{FeedbackTimings, ModeTimings, RewardTimings};
use crate::events::EventBus;
use crate::repository::{CoinStore, DiscardMistakes, WrongAnswerSink};
use crate::reward::RewardSequencer;
use crate::surface::Surface;
use crate::workers::{
    ChallengeOrchestrator, Collaborators, Scheduler, SessionSettings, SessionSummary,
};

/// Runtime configuration shared across the orchestrator and modes.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub game: GameConfig,
    pub mode_timings: ModeTimings,
    pub feedback: FeedbackTimings,
    pub reward: RewardTimings,
    pub selection: ModeSelection,
    pub event_buffer_size: usize,
    /// Fixed seed for challenge and reward draws; entropy when unset.
    pub seed: Option<u64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            mode_timings: ModeTimings::default(),
            feedback: FeedbackTimings::default(),
            reward: RewardTimings::default(),
            selection: ModeSelection::default(),
            event_buffer_size: 100,
            seed: None,
        }
    }
}

/// One play session.
///
/// Design: Session owns the orchestrator until [`Session::run`] consumes it.
/// [`SessionHandle`] provides a cloneable façade for front-ends.
pub struct Session {
    handle: SessionHandle,
    orchestrator: ChallengeOrchestrator,
}

impl Session {
    /// Create a new session builder
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Get a cloneable handle to this session
    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    /// Runs until the player exits, a left/right round is lost, or every
    /// [`SessionHandle`] has been dropped.
    pub async fn run(self) -> Result<SessionSummary> {
        let Session {
            handle,
            orchestrator,
        } = self;
        // Only handles given out by `handle()` keep the session alive.
        drop(handle);
        orchestrator.run().await
    }
}

/// Builder for [`Session`] with flexible configuration.
pub struct SessionBuilder {
    config: RuntimeConfig,
    surface: Option<Arc<dyn Surface>>,
    content: Option<Arc<dyn ContentSource>>,
    coin_store: Option<Arc<dyn CoinStore>>,
    mistakes: Option<Arc<dyn WrongAnswerSink>>,
    reward_policy: Option<Arc<dyn RewardPolicy>>,
}

impl SessionBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            surface: None,
            content: None,
            coin_store: None,
            mistakes: None,
            reward_policy: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Pin the session to one mode or alternate
    pub fn selection(mut self, selection: ModeSelection) -> Self {
        self.config.selection = selection;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Set the presentation surface (required)
    pub fn surface(mut self, surface: Arc<dyn Surface>) -> Self {
        self.surface = Some(surface);
        self
    }

    /// Set the content source; the built-in tables when omitted
    pub fn content(mut self, content: Arc<dyn ContentSource>) -> Self {
        self.content = Some(content);
        self
    }

    /// Set the coin store (required)
    pub fn coin_store(mut self, store: Arc<dyn CoinStore>) -> Self {
        self.coin_store = Some(store);
        self
    }

    /// Set the wrong-answer sink; mistakes are discarded when omitted
    pub fn mistakes(mut self, mistakes: Arc<dyn WrongAnswerSink>) -> Self {
        self.mistakes = Some(mistakes);
        self
    }

    /// Set the reward policy; a uniform draw over the configured range when omitted
    pub fn reward_policy(mut self, policy: Arc<dyn RewardPolicy>) -> Self {
        self.reward_policy = Some(policy);
        self
    }

    /// Build the session
    pub fn build(self) -> Result<Session> {
        let surface = self
            .surface
            .ok_or(RuntimeError::MissingComponent("surface"))?;
        let coin_store = self
            .coin_store
            .ok_or(RuntimeError::MissingComponent("coin store"))?;

        let config = self.config;
        let content = self
            .content
            .unwrap_or_else(|| Arc::new(StaticContent::builtin()));
        let mistakes = self
            .mistakes
            .unwrap_or_else(|| Arc::new(DiscardMistakes));
        let reward_policy = self
            .reward_policy
            .unwrap_or_else(|| Arc::new(UniformReward::from_config(&config.game)));

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let scheduler = Scheduler::new(&event_tx);
        let event_bus = EventBus::with_capacity(config.event_buffer_size);
        let handle = SessionHandle::new(event_tx, event_bus.clone());

        let sequencer = RewardSequencer::new(surface.clone(), config.reward, event_bus.clone());
        let orchestrator = ChallengeOrchestrator::new(
            Collaborators {
                surface,
                content,
                coin_store,
                mistakes,
                reward_policy,
            },
            SessionSettings {
                game: config.game,
                selection: config.selection,
                mode_timings: config.mode_timings,
                feedback: config.feedback,
            },
            sequencer,
            event_bus,
            (scheduler, event_rx),
            rng,
        );

        Ok(Session {
            handle,
            orchestrator,
        })
    }
}
