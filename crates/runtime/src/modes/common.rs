//! State and helpers shared by the mode implementations.

use game_core::{Challenge, Choice, ModeKind};

use super::{Answer, AnswerSink, InputOutcome, ModeContext, ModeTimer, ModeTimerKind};
use crate::api::ModeError;
use crate::events::{InputBinding, InputTarget};
use crate::surface::{
    HandleId, HandleSet, IconKind, Point, Style, Surface, TextRole, Tween, TweenKind, Visual,
};

const WRONG_SHAKE: std::time::Duration = std::time::Duration::from_millis(300);

/// Per-instance lifecycle state: the live challenge, its handles and bindings.
#[derive(Debug)]
pub(crate) struct ModeCore {
    kind: ModeKind,
    challenge: Option<Challenge>,
    handles: HandleSet,
    bindings: Vec<InputBinding>,
    sink: Option<AnswerSink>,
    /// Set once the live challenge has been answered correctly.
    resolved: bool,
    audio_playing: bool,
    /// Session-wide token of the installed challenge, 0 when none is.
    /// Timers carrying any other token are stale.
    round: u64,
}

impl ModeCore {
    pub fn new(kind: ModeKind) -> Self {
        Self {
            kind,
            challenge: None,
            handles: HandleSet::new(),
            bindings: Vec::new(),
            sink: None,
            resolved: false,
            audio_playing: false,
            round: 0,
        }
    }

    pub fn kind(&self) -> ModeKind {
        self.kind
    }

    pub fn challenge(&self) -> Option<&Challenge> {
        self.challenge.as_ref()
    }

    pub fn is_live(&self) -> bool {
        !self.handles.is_empty()
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    pub fn set_sink(&mut self, sink: AnswerSink) {
        self.sink = Some(sink);
    }

    pub fn ensure_idle(&self) -> Result<(), ModeError> {
        if self.is_live() {
            return Err(ModeError::ChallengeLive { mode: self.kind });
        }
        Ok(())
    }

    pub fn install(&mut self, challenge: Challenge, round: u64) {
        tracing::debug!(
            target: "runtime::mode",
            mode = self.kind.name(),
            id = %challenge.id,
            correct = %challenge.correct(),
            round,
            "challenge generated"
        );
        self.challenge = Some(challenge);
        self.resolved = false;
        self.round = round;
    }

    /// Clone of the current challenge for rendering, after the liveness check.
    pub fn challenge_to_render(&self) -> Result<Challenge, ModeError> {
        self.ensure_idle()?;
        self.challenge
            .clone()
            .ok_or(ModeError::NoChallenge { mode: self.kind })
    }

    pub fn create(&mut self, surface: &dyn Surface, visual: Visual, at: Point) -> HandleId {
        self.handles.create(surface, visual, at)
    }

    pub fn bind(&mut self, surface: &dyn Surface, handle: HandleId, target: InputTarget, at: Point) {
        surface.bind_input(handle);
        self.bindings.push(InputBinding { handle, target, at });
    }

    pub fn bindings(&self) -> Vec<InputBinding> {
        self.bindings.clone()
    }

    pub fn binding(&self, handle: HandleId) -> Option<&InputBinding> {
        self.bindings.iter().find(|binding| binding.handle == handle)
    }

    /// Handle bound to `choice`, if any.
    pub fn handle_for(&self, choice: &Choice) -> Option<HandleId> {
        self.bindings
            .iter()
            .find(|binding| matches!(&binding.target, InputTarget::Choose(c) if c == choice))
            .map(|binding| binding.handle)
    }

    /// Speaker region at the top of the screen that replays the prompt.
    pub fn render_replay(&mut self, surface: &dyn Surface) {
        let at = surface.bounds().at(0.5, 0.2);
        let speaker = self.create(surface, Visual::Icon(IconKind::Speaker), at);
        self.bind(surface, speaker, InputTarget::Replay, at);
    }

    /// One tappable region with a label per option, left to right.
    pub fn render_options(&mut self, surface: &dyn Surface, options: &[Choice], fy: f32) {
        let positions = surface.bounds().row(options.len(), fy);
        for (choice, at) in options.iter().zip(positions) {
            let region = self.create(surface, Visual::region(choice.as_str()), at);
            self.bind(surface, region, InputTarget::Choose(choice.clone()), at);
            self.create(surface, Visual::text(choice.as_str(), TextRole::Option), at);
        }
    }

    pub fn play_prompt(&mut self, surface: &dyn Surface) {
        let Some(key) = self.challenge.as_ref().and_then(|c| c.prompt.audio_key()) else {
            return;
        };
        if self.audio_playing {
            surface.stop_audio();
        }
        surface.play_audio(&key);
        self.audio_playing = true;
    }

    pub fn mark_resolved(&mut self) {
        self.resolved = true;
    }

    pub fn resolve(&self, answer: Answer) {
        match &self.sink {
            Some(sink) => sink.resolve(answer),
            None => tracing::warn!(
                target: "runtime::mode",
                mode = self.kind.name(),
                "answer produced without a registered callback"
            ),
        }
    }

    pub fn sink(&self) -> Option<&AnswerSink> {
        self.sink.as_ref()
    }

    pub fn timer(&self, kind: ModeTimerKind) -> ModeTimer {
        ModeTimer {
            round: self.round,
            kind,
        }
    }

    pub fn is_current(&self, timer: &ModeTimer) -> bool {
        self.round != 0 && timer.round == self.round
    }

    /// Releases handles, stops audio and forgets the challenge.
    pub fn release(&mut self, surface: &dyn Surface) {
        if self.audio_playing {
            surface.stop_audio();
            self.audio_playing = false;
        }
        let released = self.handles.release_all(surface);
        self.bindings.clear();
        self.challenge = None;
        self.resolved = false;
        let round = std::mem::take(&mut self.round);

        tracing::trace!(
            target: "runtime::mode",
            mode = self.kind.name(),
            released,
            round,
            "mode cleaned up"
        );
    }
}

/// Input handling of the single-answer modes: a correct pick resolves the
/// challenge, a wrong pick is reported and leaves it live for another try.
pub(crate) fn answer_single(
    core: &mut ModeCore,
    handle: HandleId,
    ctx: &mut ModeContext<'_>,
) -> InputOutcome {
    let Some(binding) = core.binding(handle).cloned() else {
        return InputOutcome::Unbound;
    };
    if core.is_resolved() {
        return InputOutcome::Blocked;
    }

    let selected = match binding.target {
        InputTarget::Replay => {
            core.play_prompt(ctx.surface);
            return InputOutcome::Replayed;
        }
        InputTarget::Choose(choice) => choice,
    };
    let Some(expected) = core.challenge().map(|c| c.correct().clone()) else {
        return InputOutcome::Unbound;
    };

    let correct = expected == selected;
    if correct {
        core.mark_resolved();
        ctx.surface.restyle(handle, Style::Correct);
    } else {
        ctx.mistakes
            .record(core.kind(), expected.as_str(), selected.as_str());
        ctx.surface.restyle(handle, Style::Wrong);
        ctx.surface
            .animate(handle, Tween::new(TweenKind::Shake, WRONG_SHAKE));
    }

    core.resolve(Answer {
        correct,
        selected,
        origin: binding.at,
    });
    InputOutcome::Answered { correct }
}
