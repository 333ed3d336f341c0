//! Game modes.
//!
//! Every mode satisfies the [`GameMode`] lifecycle: generate a challenge,
//! render it, turn activations into answers, clean up. The orchestrator only
//! talks to modes through this trait and never inspects the concrete variant;
//! [`ActiveMode`] closes the set.
//!
//! Answers leave a mode through its [`AnswerSink`]. The sink is a queue drained
//! by the orchestrator right after each call into the mode, so an answer is
//! seen before any further input is dispatched.

mod common;
mod directions;
mod letters;
mod word_emoji;

use rand::rngs::StdRng;
use tokio::sync::mpsc;

use game_core::{Challenge, Choice, ContentSource, GameConfig, ModeKind};

use crate::api::ModeError;
use crate::config::ModeTimings;
use crate::events::{EventBus, InputBinding};
use crate::repository::WrongAnswerSink;
use crate::surface::{HandleId, Point, Surface};
use crate::workers::Scheduler;

pub use directions::{DirectionMode, DirectionPhase};
pub use letters::LetterMode;
pub use word_emoji::WordEmojiMode;

/// Collaborators a mode may use during one call.
pub struct ModeContext<'a> {
    pub surface: &'a dyn Surface,
    pub scheduler: &'a Scheduler,
    pub content: &'a dyn ContentSource,
    pub mistakes: &'a dyn WrongAnswerSink,
    pub rng: &'a mut StdRng,
    pub config: &'a GameConfig,
    pub timings: &'a ModeTimings,
    pub events: &'a EventBus,
}

/// A resolved answer as reported by a mode.
#[derive(Clone, Debug, PartialEq)]
pub struct Answer {
    pub correct: bool,
    pub selected: Choice,
    /// Anchor for success/error feedback.
    pub origin: Point,
}

/// Messages a mode sends to whoever owns it.
#[derive(Clone, Debug, PartialEq)]
pub enum ModeSignal {
    Answer(Answer),
    /// A left/right round was lost; the session should end.
    StreakBroken {
        correct_in_row: u32,
        total_attempts: u32,
    },
}

/// The single answer callback of a mode instance.
#[derive(Clone, Debug)]
pub struct AnswerSink {
    tx: mpsc::UnboundedSender<ModeSignal>,
}

impl AnswerSink {
    pub fn new(tx: mpsc::UnboundedSender<ModeSignal>) -> Self {
        Self { tx }
    }

    /// Sink plus the receiving end, for owners that drain it themselves.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ModeSignal>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    pub fn resolve(&self, answer: Answer) {
        self.send(ModeSignal::Answer(answer));
    }

    pub fn streak_broken(&self, correct_in_row: u32, total_attempts: u32) {
        self.send(ModeSignal::StreakBroken {
            correct_in_row,
            total_attempts,
        });
    }

    fn send(&self, signal: ModeSignal) {
        if self.tx.send(signal).is_err() {
            tracing::debug!(target: "runtime::mode", "answer sink closed; signal dropped");
        }
    }
}

/// Kinds of delay a mode can ask for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeTimerKind {
    NextQuestion,
    Win,
    RevealDone,
}

/// A mode delay, tagged with the round token of the challenge that scheduled it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModeTimer {
    pub round: u64,
    pub kind: ModeTimerKind,
}

/// Result of dispatching one activation to a mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputOutcome {
    /// The handle is not bound by this mode.
    Unbound,
    /// The mode is not accepting answers right now.
    Blocked,
    Replayed,
    Answered { correct: bool },
}

/// Result of delivering a mode timer.
#[derive(Clone, Debug, PartialEq)]
pub enum TimerOutcome {
    /// The round the timer belonged to has been torn down.
    Stale,
    Handled,
    /// The mode replaced its challenge on its own.
    NextChallenge(Vec<InputBinding>),
}

/// Lifecycle shared by all game modes.
pub trait GameMode: Send {
    fn kind(&self) -> ModeKind;

    /// The current challenge, if one has been generated.
    fn challenge(&self) -> Option<&Challenge>;

    /// Whether presentation handles are currently owned.
    fn is_live(&self) -> bool;

    /// Whether this instance will produce no further challenges.
    fn is_finished(&self) -> bool {
        false
    }

    /// Registers the answer callback, replacing any previous one.
    fn set_answer_callback(&mut self, sink: AnswerSink);

    /// Selects new challenge data. Fails with [`ModeError::ChallengeLive`]
    /// while the previous challenge's handles are still owned.
    fn generate_challenge(&mut self, ctx: &mut ModeContext<'_>) -> Result<(), ModeError>;

    /// Creates every handle of the current challenge and binds its inputs.
    fn render(&mut self, ctx: &mut ModeContext<'_>) -> Result<Vec<InputBinding>, ModeError>;

    fn on_input(&mut self, handle: HandleId, ctx: &mut ModeContext<'_>) -> InputOutcome;

    fn on_timer(
        &mut self,
        _timer: ModeTimer,
        _ctx: &mut ModeContext<'_>,
    ) -> Result<TimerOutcome, ModeError> {
        Ok(TimerOutcome::Stale)
    }

    /// Releases every owned handle and resets per-challenge state.
    fn cleanup(&mut self, surface: &dyn Surface);
}

/// The closed set of mode implementations.
pub enum ActiveMode {
    WordEmoji(WordEmojiMode),
    Letters(LetterMode),
    Directions(DirectionMode),
}

impl ActiveMode {
    pub fn new(kind: ModeKind, config: &GameConfig) -> Self {
        match kind {
            ModeKind::WordEmojiMatch => ActiveMode::WordEmoji(WordEmojiMode::new()),
            ModeKind::LetterListening => ActiveMode::Letters(LetterMode::new(config.letter_choices)),
            ModeKind::LeftRightDirections => {
                ActiveMode::Directions(DirectionMode::new(config.required_correct))
            }
        }
    }
}

macro_rules! dispatch {
    ($self:expr, $mode:ident => $call:expr) => {
        match $self {
            ActiveMode::WordEmoji($mode) => $call,
            ActiveMode::Letters($mode) => $call,
            ActiveMode::Directions($mode) => $call,
        }
    };
}

impl GameMode for ActiveMode {
    fn kind(&self) -> ModeKind {
        dispatch!(self, mode => mode.kind())
    }

    fn challenge(&self) -> Option<&Challenge> {
        dispatch!(self, mode => mode.challenge())
    }

    fn is_live(&self) -> bool {
        dispatch!(self, mode => mode.is_live())
    }

    fn is_finished(&self) -> bool {
        dispatch!(self, mode => mode.is_finished())
    }

    fn set_answer_callback(&mut self, sink: AnswerSink) {
        dispatch!(self, mode => mode.set_answer_callback(sink))
    }

    fn generate_challenge(&mut self, ctx: &mut ModeContext<'_>) -> Result<(), ModeError> {
        dispatch!(self, mode => mode.generate_challenge(ctx))
    }

    fn render(&mut self, ctx: &mut ModeContext<'_>) -> Result<Vec<InputBinding>, ModeError> {
        dispatch!(self, mode => mode.render(ctx))
    }

    fn on_input(&mut self, handle: HandleId, ctx: &mut ModeContext<'_>) -> InputOutcome {
        dispatch!(self, mode => mode.on_input(handle, ctx))
    }

    fn on_timer(
        &mut self,
        timer: ModeTimer,
        ctx: &mut ModeContext<'_>,
    ) -> Result<TimerOutcome, ModeError> {
        dispatch!(self, mode => mode.on_timer(timer, ctx))
    }

    fn cleanup(&mut self, surface: &dyn Surface) {
        dispatch!(self, mode => mode.cleanup(surface))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Fixture wiring a [`ModeContext`] to recording collaborators.

    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tokio::sync::mpsc;

    use game_content::StaticContent;
    use game_core::GameConfig;

    use super::ModeContext;
    use crate::config::ModeTimings;
    use crate::events::EventBus;
    use crate::repository::InMemoryMistakeLog;
    use crate::surface::RecordingSurface;
    use crate::workers::{Scheduler, SessionEvent};

    pub(crate) struct Fixture {
        pub surface: RecordingSurface,
        pub scheduler: Scheduler,
        /// Keeps the timer queue open; the scheduler only holds a weak sender.
        _queue: mpsc::UnboundedSender<SessionEvent>,
        pub timers: mpsc::UnboundedReceiver<SessionEvent>,
        pub content: StaticContent,
        pub mistakes: InMemoryMistakeLog,
        pub rng: StdRng,
        pub config: GameConfig,
        pub timings: ModeTimings,
        pub events: EventBus,
    }

    impl Fixture {
        pub fn new(seed: u64) -> Self {
            let (queue, timers) = mpsc::unbounded_channel();
            Self {
                surface: RecordingSurface::new(),
                scheduler: Scheduler::new(&queue),
                _queue: queue,
                timers,
                content: StaticContent::builtin(),
                mistakes: InMemoryMistakeLog::new(),
                rng: StdRng::seed_from_u64(seed),
                config: GameConfig::default(),
                timings: ModeTimings::default(),
                events: EventBus::new(),
            }
        }

        pub fn ctx(&mut self) -> ModeContext<'_> {
            ModeContext {
                surface: &self.surface,
                scheduler: &self.scheduler,
                content: &self.content,
                mistakes: &self.mistakes,
                rng: &mut self.rng,
                config: &self.config,
                timings: &self.timings,
                events: &self.events,
            }
        }
    }
}
