//! Challenge orchestrator: the session loop.
//!
//! Owns mode selection, the answer-in-flight guard, coin balance updates and
//! the transition to the next challenge. Input, timers and exit requests come
//! in through one queue and are handled one at a time; the reward sequence
//! runs as a future polled alongside that queue.

use std::collections::{BTreeMap, HashMap};
use std::f32::consts::TAU;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use tokio::sync::mpsc;
use tracing::{debug, info, trace};

use game_core::{
    BoosterStreak, ContentSource, GameConfig, ModeKind, ModeSelection, RewardPolicy,
    RewardVariant,
};

use super::scheduler::{Scheduler, SessionEvent, SessionTimer};
use crate::api::{Result, RuntimeError};
use crate::config::{FeedbackTimings, ModeTimings};
use crate::events::{DropReason, EventBus, GameEvent, InputBinding, SessionEnd};
use crate::modes::{ActiveMode, Answer, AnswerSink, GameMode, ModeContext, ModeSignal, TimerOutcome};
use crate::repository::{CoinStore, WrongAnswerSink};
use crate::reward::{RewardParams, RewardReport, RewardSequencer};
use crate::surface::{HandleId, ParticleKind, Point, Surface, TextRole, Tween, TweenKind, Visual};

/// Retry message shown after a wrong answer in a retrying mode.
pub const RETRY_MESSAGE: &str = "Fel! Försök igen";

const FEEDBACK_FADE: Duration = Duration::from_millis(200);

type PendingReward = Pin<Box<dyn Future<Output = RewardReport> + Send>>;

/// External collaborators of one session.
pub(crate) struct Collaborators {
    pub surface: Arc<dyn Surface>,
    pub content: Arc<dyn ContentSource>,
    pub coin_store: Arc<dyn CoinStore>,
    pub mistakes: Arc<dyn WrongAnswerSink>,
    pub reward_policy: Arc<dyn RewardPolicy>,
}

/// Tunables of one session.
pub(crate) struct SessionSettings {
    pub game: GameConfig,
    pub selection: ModeSelection,
    pub mode_timings: ModeTimings,
    pub feedback: FeedbackTimings,
}

/// How a finished session went.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionSummary {
    pub end: SessionEnd,
    /// Challenges whose reward sequence completed.
    pub challenges_completed: u64,
    /// Balance after the last persisted reward.
    pub balance: u64,
    pub coins_earned: u64,
}

pub struct ChallengeOrchestrator {
    surface: Arc<dyn Surface>,
    content: Arc<dyn ContentSource>,
    coin_store: Arc<dyn CoinStore>,
    mistakes: Arc<dyn WrongAnswerSink>,
    reward_policy: Arc<dyn RewardPolicy>,
    sequencer: RewardSequencer,
    events: EventBus,

    scheduler: Scheduler,
    queue: mpsc::UnboundedReceiver<SessionEvent>,
    answers: AnswerSink,
    signals: mpsc::UnboundedReceiver<ModeSignal>,

    config: GameConfig,
    selection: ModeSelection,
    mode_timings: ModeTimings,
    feedback: FeedbackTimings,
    rng: StdRng,

    /// One instance per kind; finished instances are replaced on selection.
    roster: HashMap<ModeKind, ActiveMode>,
    current: ModeKind,
    challenge_count: u64,
    /// Set from the moment an answer arrives until the next challenge is up
    /// (correct) or the retry message is gone (incorrect).
    is_processing_answer: bool,
    booster: BoosterStreak,
    balance: u64,
    coins_earned: u64,

    reward: Option<PendingReward>,
    exit_requested: bool,
    /// Cleared once every session handle is gone.
    queue_open: bool,

    feedback_epoch: u64,
    error_text: Option<HandleId>,
    next_batch: u64,
    particles: BTreeMap<u64, Vec<HandleId>>,
}

impl ChallengeOrchestrator {
    pub(crate) fn new(
        collaborators: Collaborators,
        settings: SessionSettings,
        sequencer: RewardSequencer,
        events: EventBus,
        queue: (Scheduler, mpsc::UnboundedReceiver<SessionEvent>),
        rng: StdRng,
    ) -> Self {
        let (answers, signals) = AnswerSink::channel();
        let (scheduler, queue) = queue;
        let current = settings.selection.select(0);

        Self {
            surface: collaborators.surface,
            content: collaborators.content,
            coin_store: collaborators.coin_store,
            mistakes: collaborators.mistakes,
            reward_policy: collaborators.reward_policy,
            sequencer,
            events,
            scheduler,
            queue,
            answers,
            signals,
            booster: BoosterStreak::new(settings.game.booster_cap),
            config: settings.game,
            selection: settings.selection,
            mode_timings: settings.mode_timings,
            feedback: settings.feedback,
            rng,
            roster: HashMap::new(),
            current,
            challenge_count: 0,
            is_processing_answer: false,
            balance: 0,
            coins_earned: 0,
            reward: None,
            exit_requested: false,
            queue_open: true,
            feedback_epoch: 0,
            error_text: None,
            next_batch: 0,
            particles: BTreeMap::new(),
        }
    }

    /// Runs the session until the player exits, a left/right round is lost,
    /// or the last session handle is dropped.
    pub async fn run(mut self) -> Result<SessionSummary> {
        self.start()?;

        let end = loop {
            tokio::select! {
                report = next_reward(&mut self.reward) => {
                    self.reward = None;
                    if let Some(end) = self.on_reward_complete(report)? {
                        break end;
                    }
                }
                event = self.queue.recv(), if self.queue_open => {
                    let Some(event) = event else {
                        debug!(target: "runtime::session", "all session handles dropped");
                        self.queue_open = false;
                        match self.on_exit() {
                            Some(end) => break end,
                            None => continue,
                        }
                    };
                    if let Some(end) = self.on_event(event)? {
                        break end;
                    }
                }
            }
        };

        Ok(self.finish(end))
    }

    fn start(&mut self) -> Result<()> {
        self.balance = self.coin_store.balance().map_err(RuntimeError::Store)?;
        info!(
            target: "runtime::session",
            balance = self.balance,
            selection = ?self.selection,
            "session started"
        );
        self.events.publish(GameEvent::SessionStarted {
            balance: self.balance,
            selection: self.selection,
        });

        self.select_mode();
        self.load_challenge()
    }

    fn on_event(&mut self, event: SessionEvent) -> Result<Option<SessionEnd>> {
        match event {
            SessionEvent::Input(handle) => self.on_input(handle),
            SessionEvent::Timer(timer) => self.on_timer(timer),
            SessionEvent::Exit => Ok(self.on_exit()),
        }
    }

    fn on_input(&mut self, handle: HandleId) -> Result<Option<SessionEnd>> {
        let dropped = if self.reward.is_some() {
            Some(DropReason::RewardInFlight)
        } else if self.is_processing_answer {
            Some(DropReason::AnswerPending)
        } else {
            None
        };
        if let Some(reason) = dropped {
            debug!(target: "runtime::session", %handle, ?reason, "input dropped");
            self.events
                .publish(GameEvent::InputDropped { handle, reason });
            return Ok(None);
        }

        let outcome = self.with_mode(|mode, ctx| mode.on_input(handle, ctx));
        trace!(target: "runtime::session", %handle, ?outcome, "input dispatched");
        Ok(self.drain_signals())
    }

    fn on_timer(&mut self, timer: SessionTimer) -> Result<Option<SessionEnd>> {
        match timer {
            SessionTimer::Mode(timer) => {
                let outcome = self.with_mode(|mode, ctx| {
                    mode.on_timer(timer, ctx)
                        .map(|outcome| (outcome, mode.challenge().cloned()))
                })?;
                match outcome {
                    (TimerOutcome::NextChallenge(targets), Some(challenge)) => {
                        self.events.publish(GameEvent::ChallengeReady {
                            mode: self.current,
                            challenge,
                            targets,
                        });
                    }
                    (TimerOutcome::Stale, _) => {
                        trace!(target: "runtime::session", ?timer, "stale mode timer ignored");
                    }
                    _ => {}
                }
                Ok(self.drain_signals())
            }
            SessionTimer::FeedbackElapsed { epoch } => {
                if epoch == self.feedback_epoch {
                    self.clear_error_text();
                    self.is_processing_answer = false;
                    debug!(target: "runtime::session", epoch, "retry feedback done");
                }
                Ok(None)
            }
            SessionTimer::ParticlesExpired { batch } => {
                if let Some(handles) = self.particles.remove(&batch) {
                    for handle in handles {
                        self.surface.destroy(handle);
                    }
                }
                Ok(None)
            }
        }
    }

    fn on_exit(&mut self) -> Option<SessionEnd> {
        if self.reward.is_some() {
            info!(target: "runtime::session", "exit deferred until the reward is persisted");
            self.exit_requested = true;
            return None;
        }
        Some(SessionEnd::Exited)
    }

    /// Handles every signal the last mode call produced.
    fn drain_signals(&mut self) -> Option<SessionEnd> {
        while let Ok(signal) = self.signals.try_recv() {
            match signal {
                ModeSignal::Answer(answer) => self.on_answer(answer),
                ModeSignal::StreakBroken {
                    correct_in_row,
                    total_attempts,
                } => {
                    return Some(SessionEnd::StreakBroken {
                        correct_in_row,
                        total_attempts,
                    });
                }
            }
        }
        None
    }

    fn on_answer(&mut self, answer: Answer) {
        let mode = self.current;
        if self.is_processing_answer || self.reward.is_some() {
            debug!(
                target: "runtime::session",
                mode = mode.name(),
                selected = %answer.selected,
                "answer ignored while another is processed"
            );
            self.events.publish(GameEvent::AnswerIgnored {
                mode,
                selected: answer.selected,
            });
            return;
        }

        self.is_processing_answer = true;
        debug!(
            target: "runtime::session",
            mode = mode.name(),
            correct = answer.correct,
            selected = %answer.selected,
            "answer accepted"
        );
        self.events.publish(GameEvent::AnswerAccepted {
            mode,
            correct: answer.correct,
            selected: answer.selected.clone(),
            origin: answer.origin,
        });

        if answer.correct {
            self.begin_reward(mode, answer.origin);
        } else {
            self.show_retry();
        }
    }

    fn begin_reward(&mut self, mode: ModeKind, origin: Point) {
        self.spawn_success_particles(origin);

        // Every payout, a won left/right round included, advances the booster.
        self.booster.increment();
        self.publish_booster();
        let multiplier = self.booster.multiplier();
        let coins = self.reward_policy.roll(&mut self.rng);

        info!(
            target: "runtime::session",
            mode = mode.name(),
            coins,
            multiplier,
            "reward started"
        );
        let sequencer = self.sequencer.clone();
        let params = RewardParams::new(coins, multiplier, RewardVariant::Gift);
        self.reward = Some(Box::pin(async move { sequencer.play(params).await }));
    }

    fn show_retry(&mut self) {
        if self.booster.streak() > 0 {
            self.booster.reset();
            self.publish_booster();
        }

        self.clear_error_text();
        self.feedback_epoch += 1;
        let at = self.surface.bounds().at(0.5, 0.45);
        let text = self
            .surface
            .create(Visual::text(RETRY_MESSAGE, TextRole::Feedback), at);
        self.surface
            .animate(text, Tween::new(TweenKind::FadeIn, FEEDBACK_FADE));
        self.error_text = Some(text);

        self.scheduler.after(
            self.feedback.error_display,
            SessionTimer::FeedbackElapsed {
                epoch: self.feedback_epoch,
            },
        );
    }

    fn on_reward_complete(&mut self, report: RewardReport) -> Result<Option<SessionEnd>> {
        let delta = u64::from(report.params.coins);
        self.balance = self
            .coin_store
            .add_coins(delta)
            .map_err(RuntimeError::Store)?;
        self.coins_earned += delta;
        self.events.publish(GameEvent::BalanceUpdated {
            balance: self.balance,
            delta,
        });
        info!(
            target: "runtime::session",
            balance = self.balance,
            delta,
            "reward persisted"
        );

        self.cleanup_mode();
        self.challenge_count += 1;

        if self.exit_requested {
            return Ok(Some(SessionEnd::Exited));
        }

        self.select_mode();
        self.load_challenge()?;
        self.is_processing_answer = false;
        Ok(None)
    }

    fn select_mode(&mut self) {
        let kind = self.selection.select(self.challenge_count);
        if self.roster.get(&kind).is_some_and(|mode| mode.is_finished()) {
            debug!(target: "runtime::session", mode = kind.name(), "replacing finished mode instance");
            self.roster.remove(&kind);
        }

        let config = &self.config;
        let mode = self
            .roster
            .entry(kind)
            .or_insert_with(|| ActiveMode::new(kind, config));
        mode.set_answer_callback(self.answers.clone());
        self.current = kind;

        debug!(
            target: "runtime::session",
            mode = kind.name(),
            challenge_count = self.challenge_count,
            "mode selected"
        );
        self.events.publish(GameEvent::ModeSelected {
            mode: kind,
            challenge_count: self.challenge_count,
        });
    }

    fn load_challenge(&mut self) -> Result<()> {
        let (targets, challenge) = self.with_mode(|mode, ctx| {
            mode.generate_challenge(ctx)?;
            let targets: Vec<InputBinding> = mode.render(ctx)?;
            Ok::<_, RuntimeError>((targets, mode.challenge().cloned()))
        })?;

        if let Some(challenge) = challenge {
            self.events.publish(GameEvent::ChallengeReady {
                mode: self.current,
                challenge,
                targets,
            });
        }
        Ok(())
    }

    fn with_mode<T>(&mut self, f: impl FnOnce(&mut ActiveMode, &mut ModeContext<'_>) -> T) -> T {
        let kind = self.current;
        let config = &self.config;
        let mode = self
            .roster
            .entry(kind)
            .or_insert_with(|| ActiveMode::new(kind, config));

        let mut ctx = ModeContext {
            surface: self.surface.as_ref(),
            scheduler: &self.scheduler,
            content: self.content.as_ref(),
            mistakes: self.mistakes.as_ref(),
            rng: &mut self.rng,
            config: &self.config,
            timings: &self.mode_timings,
            events: &self.events,
        };
        f(mode, &mut ctx)
    }

    fn cleanup_mode(&mut self) {
        if let Some(mode) = self.roster.get_mut(&self.current) {
            mode.cleanup(self.surface.as_ref());
        }
    }

    fn spawn_success_particles(&mut self, origin: Point) {
        let count = self.feedback.success_particles;
        let lifetime = self.feedback.particle_lifetime;
        let batch = self.next_batch;
        self.next_batch += 1;

        let handles = (0..count)
            .map(|i| {
                let angle = TAU * i as f32 / count as f32;
                let target = origin.offset_polar(angle, 80.0);
                let particle = self
                    .surface
                    .create(Visual::Particle(ParticleKind::Success), origin);
                self.surface.animate(
                    particle,
                    Tween::new(
                        TweenKind::Burst {
                            dx: target.x - origin.x,
                            dy: target.y - origin.y,
                        },
                        lifetime,
                    ),
                );
                particle
            })
            .collect();
        self.particles.insert(batch, handles);
        self.scheduler
            .after(lifetime, SessionTimer::ParticlesExpired { batch });
    }

    fn clear_error_text(&mut self) {
        if let Some(text) = self.error_text.take() {
            self.surface.destroy(text);
        }
    }

    fn publish_booster(&self) {
        self.events.publish(GameEvent::BoosterChanged {
            streak: self.booster.streak(),
            multiplier: self.booster.multiplier(),
        });
    }

    /// Releases everything still on screen and reports the outcome.
    fn finish(mut self, end: SessionEnd) -> SessionSummary {
        self.reward = None;
        self.cleanup_mode();
        self.clear_error_text();
        for handle in std::mem::take(&mut self.particles).into_values().flatten() {
            self.surface.destroy(handle);
        }

        info!(
            target: "runtime::session",
            ?end,
            challenges_completed = self.challenge_count,
            balance = self.balance,
            coins_earned = self.coins_earned,
            "session ended"
        );
        self.events.publish(GameEvent::SessionEnded {
            end,
            challenges_completed: self.challenge_count,
        });

        SessionSummary {
            end,
            challenges_completed: self.challenge_count,
            balance: self.balance,
            coins_earned: self.coins_earned,
        }
    }
}

/// Resolves with the in-flight reward, or never when there is none.
async fn next_reward(pending: &mut Option<PendingReward>) -> RewardReport {
    match pending.as_mut() {
        Some(reward) => reward.await,
        None => std::future::pending().await,
    }
}
