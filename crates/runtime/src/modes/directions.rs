//! Left/right round: a direction is spoken, the player taps a screen side.
//!
//! One instance is one round. Correct answers grow the streak and the mode
//! moves on to the next direction by itself; the round is won when the streak
//! reaches `required` and lost on the first miss. Either way the instance is
//! finished afterwards and produces no further challenges.

use game_core::{
    Challenge, Choice, Direction, DirectionStreak, ModeKind, StreakProgress, generate,
};

use super::common::ModeCore;
use super::{
    Answer, AnswerSink, GameMode, InputOutcome, ModeContext, ModeTimer, ModeTimerKind,
    TimerOutcome,
};
use crate::api::ModeError;
use crate::events::{GameEvent, InputBinding, InputTarget};
use crate::surface::{HandleId, Style, Surface, TextRole, Tween, TweenKind, Visual};
use crate::workers::SessionTimer;

const SHAKE: std::time::Duration = std::time::Duration::from_millis(300);

/// Where the round is between two activations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DirectionPhase {
    /// No challenge on screen.
    #[default]
    Idle,
    AwaitingAnswer,
    /// Correct, streak continues; next direction is scheduled.
    Advancing,
    /// Streak complete; the win is reported after a short delay.
    Winning,
    /// A miss is being shown; input is blocked.
    Revealing,
    Finished,
}

pub struct DirectionMode {
    core: ModeCore,
    streak: DirectionStreak,
    phase: DirectionPhase,
    /// Progress dots, one per required correct answer.
    indicators: Vec<HandleId>,
    /// Winning answer, held until the win delay elapses.
    pending: Option<Answer>,
}

impl DirectionMode {
    pub fn new(required: u32) -> Self {
        Self {
            core: ModeCore::new(ModeKind::LeftRightDirections),
            streak: DirectionStreak::new(required),
            phase: DirectionPhase::Idle,
            indicators: Vec::new(),
            pending: None,
        }
    }

    pub fn streak(&self) -> &DirectionStreak {
        &self.streak
    }

    pub fn phase(&self) -> DirectionPhase {
        self.phase
    }

    pub fn is_revealing(&self) -> bool {
        self.phase == DirectionPhase::Revealing
    }

    fn schedule(&self, ctx: &ModeContext<'_>, kind: ModeTimerKind) {
        let delay = match kind {
            ModeTimerKind::NextQuestion => ctx.timings.next_question,
            ModeTimerKind::Win => ctx.timings.win_delay,
            ModeTimerKind::RevealDone => ctx.timings.reveal,
        };
        ctx.scheduler
            .after(delay, SessionTimer::Mode(self.core.timer(kind)));
    }

    fn restyle_indicators(&self, surface: &dyn Surface) {
        let filled = self.streak.correct_in_row() as usize;
        for (i, indicator) in self.indicators.iter().enumerate() {
            let style = if i < filled { Style::Filled } else { Style::Empty };
            surface.restyle(*indicator, style);
        }
    }

    fn on_correct(&mut self, answer: Answer, ctx: &mut ModeContext<'_>) {
        let progress = self.streak.record_correct();
        self.restyle_indicators(ctx.surface);
        ctx.events.publish(GameEvent::StreakAdvanced {
            correct_in_row: self.streak.correct_in_row(),
            required: self.streak.required(),
        });

        match progress {
            StreakProgress::Continue { correct_in_row } => {
                tracing::debug!(target: "runtime::mode", correct_in_row, "direction streak continues");
                self.phase = DirectionPhase::Advancing;
                self.schedule(ctx, ModeTimerKind::NextQuestion);
            }
            StreakProgress::Won { correct_in_row } => {
                tracing::info!(target: "runtime::mode", correct_in_row, "direction round won");
                self.phase = DirectionPhase::Winning;
                self.pending = Some(answer);
                self.schedule(ctx, ModeTimerKind::Win);
            }
        }
    }

    fn on_miss(&mut self, answer: &Answer, handle: HandleId, ctx: &mut ModeContext<'_>) {
        self.streak.record_miss();
        if let Some(correct) = self.core.challenge().map(|c| c.correct().clone()) {
            ctx.mistakes
                .record(self.core.kind(), correct.as_str(), answer.selected.as_str());
            if let Some(side) = self.core.handle_for(&correct) {
                ctx.surface
                    .animate(side, Tween::new(TweenKind::Flash, ctx.timings.reveal));
            }
        }
        ctx.surface.restyle(handle, Style::Wrong);
        ctx.surface.animate(handle, Tween::new(TweenKind::Shake, SHAKE));

        self.phase = DirectionPhase::Revealing;
        self.schedule(ctx, ModeTimerKind::RevealDone);
    }

    fn next_question(&mut self, ctx: &mut ModeContext<'_>) -> Result<TimerOutcome, ModeError> {
        self.cleanup(ctx.surface);
        self.generate_challenge(ctx)?;
        let bindings = self.render(ctx)?;
        Ok(TimerOutcome::NextChallenge(bindings))
    }

    fn finish_reveal(&mut self, ctx: &mut ModeContext<'_>) {
        let correct_in_row = self.streak.correct_in_row();
        let total_attempts = self.streak.total_attempts();

        self.streak.reset();
        self.restyle_indicators(ctx.surface);
        self.phase = DirectionPhase::Finished;

        tracing::info!(
            target: "runtime::mode",
            correct_in_row,
            total_attempts,
            "direction round lost"
        );
        match self.core.sink() {
            Some(sink) => sink.streak_broken(correct_in_row, total_attempts),
            None => tracing::warn!(target: "runtime::mode", "streak broken without a registered callback"),
        }
    }
}

impl GameMode for DirectionMode {
    fn kind(&self) -> ModeKind {
        self.core.kind()
    }

    fn challenge(&self) -> Option<&Challenge> {
        self.core.challenge()
    }

    fn is_live(&self) -> bool {
        self.core.is_live()
    }

    fn is_finished(&self) -> bool {
        self.phase == DirectionPhase::Finished
    }

    fn set_answer_callback(&mut self, sink: AnswerSink) {
        self.core.set_sink(sink);
    }

    fn generate_challenge(&mut self, ctx: &mut ModeContext<'_>) -> Result<(), ModeError> {
        if self.is_finished() {
            return Err(ModeError::RoundOver {
                mode: self.core.kind(),
            });
        }
        self.core.ensure_idle()?;
        let challenge = generate::direction(ctx.rng);
        self.core.install(challenge, ctx.scheduler.next_round());
        Ok(())
    }

    fn render(&mut self, ctx: &mut ModeContext<'_>) -> Result<Vec<InputBinding>, ModeError> {
        self.core.challenge_to_render()?;
        let surface = ctx.surface;
        let bounds = surface.bounds();

        self.core.render_replay(surface);
        self.core
            .create(surface, Visual::Divider, bounds.at(0.5, 0.55));

        for (direction, fx) in [(Direction::Left, 0.25), (Direction::Right, 0.75)] {
            let at = bounds.at(fx, 0.55);
            let side = self
                .core
                .create(surface, Visual::region(direction.display_name()), at);
            self.core
                .bind(surface, side, InputTarget::Choose(Choice::from(direction)), at);
            self.core.create(
                surface,
                Visual::text(direction.display_name(), TextRole::Option),
                at,
            );
        }

        let filled = self.streak.correct_in_row() as usize;
        let positions = bounds.row(self.streak.required() as usize, 0.85);
        self.indicators = positions
            .into_iter()
            .enumerate()
            .map(|(i, at)| {
                self.core
                    .create(surface, Visual::Indicator { filled: i < filled }, at)
            })
            .collect();

        self.core.play_prompt(surface);
        self.phase = DirectionPhase::AwaitingAnswer;

        Ok(self.core.bindings())
    }

    fn on_input(&mut self, handle: HandleId, ctx: &mut ModeContext<'_>) -> InputOutcome {
        let Some(binding) = self.core.binding(handle).cloned() else {
            return InputOutcome::Unbound;
        };
        if self.phase != DirectionPhase::AwaitingAnswer {
            return InputOutcome::Blocked;
        }

        let selected = match binding.target {
            InputTarget::Replay => {
                self.core.play_prompt(ctx.surface);
                return InputOutcome::Replayed;
            }
            InputTarget::Choose(choice) => choice,
        };
        let Some(correct) = self.core.challenge().map(|c| c.is_correct(&selected)) else {
            return InputOutcome::Unbound;
        };

        let answer = Answer {
            correct,
            selected,
            origin: binding.at,
        };
        if correct {
            ctx.surface.restyle(handle, Style::Correct);
            self.on_correct(answer, ctx);
        } else {
            self.on_miss(&answer, handle, ctx);
        }
        InputOutcome::Answered { correct }
    }

    fn on_timer(
        &mut self,
        timer: ModeTimer,
        ctx: &mut ModeContext<'_>,
    ) -> Result<TimerOutcome, ModeError> {
        if !self.core.is_current(&timer) {
            return Ok(TimerOutcome::Stale);
        }

        match (timer.kind, self.phase) {
            (ModeTimerKind::NextQuestion, DirectionPhase::Advancing) => self.next_question(ctx),
            (ModeTimerKind::Win, DirectionPhase::Winning) => {
                self.phase = DirectionPhase::Finished;
                if let Some(answer) = self.pending.take() {
                    self.core.resolve(answer);
                }
                Ok(TimerOutcome::Handled)
            }
            (ModeTimerKind::RevealDone, DirectionPhase::Revealing) => {
                self.finish_reveal(ctx);
                Ok(TimerOutcome::Handled)
            }
            _ => Ok(TimerOutcome::Stale),
        }
    }

    /// Releases the round's handles. The streak survives; only a finished
    /// round stays finished.
    fn cleanup(&mut self, surface: &dyn Surface) {
        self.core.release(surface);
        self.indicators.clear();
        self.pending = None;
        if self.phase != DirectionPhase::Finished {
            self.phase = DirectionPhase::Idle;
        }
    }
}
