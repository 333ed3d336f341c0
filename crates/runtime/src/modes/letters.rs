//! Letter played as audio; pick the written letter.

use game_core::{Challenge, ChallengeKind, ModeKind, NonRepeatingPool, generate};

use super::common::{ModeCore, answer_single};
use super::{AnswerSink, GameMode, InputOutcome, ModeContext};
use crate::api::ModeError;
use crate::events::InputBinding;
use crate::surface::{HandleId, Surface};

pub struct LetterMode {
    core: ModeCore,
    pool: NonRepeatingPool,
    /// Options per challenge, correct letter included.
    choices: usize,
}

impl LetterMode {
    pub fn new(choices: usize) -> Self {
        Self {
            core: ModeCore::new(ModeKind::LetterListening),
            pool: NonRepeatingPool::new(),
            choices: choices.max(2),
        }
    }
}

impl GameMode for LetterMode {
    fn kind(&self) -> ModeKind {
        self.core.kind()
    }

    fn challenge(&self) -> Option<&Challenge> {
        self.core.challenge()
    }

    fn is_live(&self) -> bool {
        self.core.is_live()
    }

    fn set_answer_callback(&mut self, sink: AnswerSink) {
        self.core.set_sink(sink);
    }

    fn generate_challenge(&mut self, ctx: &mut ModeContext<'_>) -> Result<(), ModeError> {
        self.core.ensure_idle()?;
        let letters = ctx.content.list_challenges(ChallengeKind::Letter);
        let challenge = generate::letter(&mut self.pool, letters, self.choices, ctx.rng)?;
        self.core.install(challenge, ctx.scheduler.next_round());
        Ok(())
    }

    fn render(&mut self, ctx: &mut ModeContext<'_>) -> Result<Vec<InputBinding>, ModeError> {
        let challenge = self.core.challenge_to_render()?;
        let surface = ctx.surface;

        self.core.render_replay(surface);
        self.core.render_options(surface, challenge.options(), 0.6);
        self.core.play_prompt(surface);

        Ok(self.core.bindings())
    }

    fn on_input(&mut self, handle: HandleId, ctx: &mut ModeContext<'_>) -> InputOutcome {
        answer_single(&mut self.core, handle, ctx)
    }

    fn cleanup(&mut self, surface: &dyn Surface) {
        self.core.release(surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::InputTarget;
    use crate::modes::testing::Fixture;
    use crate::surface::SurfaceOp;

    fn rendered(seed: u64) -> (Fixture, LetterMode, Vec<InputBinding>) {
        let mut fx = Fixture::new(seed);
        let mut mode = LetterMode::new(fx.config.letter_choices);
        mode.generate_challenge(&mut fx.ctx()).unwrap();
        let bindings = mode.render(&mut fx.ctx()).unwrap();
        (fx, mode, bindings)
    }

    #[test]
    fn render_plays_letter_audio_and_binds_replay() {
        let (fx, mode, bindings) = rendered(5);
        let challenge = mode.challenge().unwrap();

        let expected = generate::letter_audio_key(challenge.correct().as_str());
        assert_eq!(fx.surface.audio_log(), vec![expected]);

        let replays = bindings
            .iter()
            .filter(|b| b.target == InputTarget::Replay)
            .count();
        assert_eq!(replays, 1);
        assert_eq!(bindings.len(), 1 + challenge.options().len());
        assert_eq!(challenge.options().len(), 6);
    }

    #[test]
    fn replay_restarts_audio_without_answering() {
        let (mut fx, mut mode, bindings) = rendered(6);
        let (sink, mut answers) = AnswerSink::channel();
        mode.set_answer_callback(sink);

        let speaker = bindings
            .iter()
            .find(|b| b.target == InputTarget::Replay)
            .unwrap()
            .handle;
        assert_eq!(
            mode.on_input(speaker, &mut fx.ctx()),
            InputOutcome::Replayed
        );

        assert_eq!(fx.surface.audio_log().len(), 2);
        assert!(fx.surface.ops().contains(&SurfaceOp::StopAudio));
        assert!(answers.try_recv().is_err());
    }

    #[test]
    fn wrong_letter_is_logged_as_confusion() {
        let (mut fx, mut mode, bindings) = rendered(7);
        let challenge = mode.challenge().unwrap().clone();

        let wrong = bindings
            .iter()
            .find(|b| matches!(&b.target, InputTarget::Choose(c) if !challenge.is_correct(c)))
            .unwrap();
        mode.on_input(wrong.handle, &mut fx.ctx());

        let log = fx.mistakes.snapshot();
        assert_eq!(log.mode_mistakes(ModeKind::LetterListening).map(|m| m.len()), Some(1));
        assert!(mode.is_live());
    }

    #[test]
    fn cleanup_stops_audio_and_releases_handles() {
        let (fx, mut mode, _) = rendered(8);

        mode.cleanup(&fx.surface);

        assert_eq!(fx.surface.live_count(), 0);
        assert_eq!(fx.surface.ops().last(), Some(&SurfaceOp::Destroy { handle: HandleId(1) }));
        assert!(mode.challenge().is_none());
    }

    #[test]
    fn unknown_handle_is_unbound() {
        let (mut fx, mut mode, _) = rendered(9);
        assert_eq!(
            mode.on_input(HandleId(9_999), &mut fx.ctx()),
            InputOutcome::Unbound
        );
    }
}
