//! Word shown as text; pick the matching emoji.

use game_core::{Challenge, ChallengeKind, ModeKind, NonRepeatingPool, Prompt, generate};

use super::common::{ModeCore, answer_single};
use super::{AnswerSink, GameMode, InputOutcome, ModeContext};
use crate::api::ModeError;
use crate::events::InputBinding;
use crate::surface::{HandleId, Surface, TextRole, Visual};

pub struct WordEmojiMode {
    core: ModeCore,
    pool: NonRepeatingPool,
}

impl WordEmojiMode {
    pub fn new() -> Self {
        Self {
            core: ModeCore::new(ModeKind::WordEmojiMatch),
            pool: NonRepeatingPool::new(),
        }
    }
}

impl Default for WordEmojiMode {
    fn default() -> Self {
        Self::new()
    }
}

impl GameMode for WordEmojiMode {
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
        let entries = ctx.content.list_challenges(ChallengeKind::WordEmoji);
        let challenge = generate::word_emoji(&mut self.pool, entries, ctx.rng)?;
        self.core.install(challenge, ctx.scheduler.next_round());
        Ok(())
    }

    fn render(&mut self, ctx: &mut ModeContext<'_>) -> Result<Vec<InputBinding>, ModeError> {
        let challenge = self.core.challenge_to_render()?;
        let surface = ctx.surface;

        if let Prompt::Word { text } = &challenge.prompt {
            let at = surface.bounds().at(0.5, 0.25);
            self.core
                .create(surface, Visual::text(text.as_str(), TextRole::Prompt), at);
        }
        self.core.render_options(surface, challenge.options(), 0.6);

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
    use crate::modes::{Answer, ModeSignal};

    #[test]
    fn renders_prompt_and_one_region_per_option() {
        let mut fx = Fixture::new(1);
        let mut mode = WordEmojiMode::new();

        mode.generate_challenge(&mut fx.ctx()).unwrap();
        let bindings = mode.render(&mut fx.ctx()).unwrap();

        let challenge = mode.challenge().unwrap();
        assert_eq!(bindings.len(), challenge.options().len());
        assert!(bindings.iter().all(|b| fx.surface.is_interactive(b.handle)));
        assert!(fx.surface.audio_log().is_empty());
    }

    #[test]
    fn generate_while_live_is_rejected() {
        let mut fx = Fixture::new(2);
        let mut mode = WordEmojiMode::new();

        mode.generate_challenge(&mut fx.ctx()).unwrap();
        mode.render(&mut fx.ctx()).unwrap();

        assert_eq!(
            mode.generate_challenge(&mut fx.ctx()),
            Err(ModeError::ChallengeLive {
                mode: ModeKind::WordEmojiMatch
            })
        );

        mode.cleanup(&fx.surface);
        assert_eq!(fx.surface.live_count(), 0);
        assert!(mode.generate_challenge(&mut fx.ctx()).is_ok());
    }

    #[test]
    fn wrong_pick_reports_and_stays_live_correct_pick_resolves_once() {
        let mut fx = Fixture::new(3);
        let mut mode = WordEmojiMode::new();
        let (sink, mut answers) = AnswerSink::channel();
        mode.set_answer_callback(sink);

        mode.generate_challenge(&mut fx.ctx()).unwrap();
        let bindings = mode.render(&mut fx.ctx()).unwrap();
        let challenge = mode.challenge().unwrap().clone();

        let pick = |correct: bool| {
            bindings
                .iter()
                .find(|b| match &b.target {
                    InputTarget::Choose(c) => challenge.is_correct(c) == correct,
                    InputTarget::Replay => false,
                })
                .unwrap()
                .clone()
        };
        let wrong = pick(false);
        let right = pick(true);

        assert_eq!(
            mode.on_input(wrong.handle, &mut fx.ctx()),
            InputOutcome::Answered { correct: false }
        );
        assert!(matches!(
            answers.try_recv(),
            Ok(ModeSignal::Answer(Answer { correct: false, .. }))
        ));
        assert_eq!(fx.mistakes.snapshot().total(), 1);

        assert_eq!(
            mode.on_input(right.handle, &mut fx.ctx()),
            InputOutcome::Answered { correct: true }
        );
        assert_eq!(
            mode.on_input(right.handle, &mut fx.ctx()),
            InputOutcome::Blocked
        );

        let answer = match answers.try_recv() {
            Ok(ModeSignal::Answer(answer)) => answer,
            other => panic!("unexpected {other:?}"),
        };
        assert!(answer.correct);
        assert_eq!(answer.origin, right.at);
        assert!(answers.try_recv().is_err());
    }

    #[test]
    fn no_repeats_across_a_full_cycle() {
        let mut fx = Fixture::new(4);
        let mut mode = WordEmojiMode::new();

        let mut seen = std::collections::BTreeSet::new();
        for _ in 0..20 {
            mode.generate_challenge(&mut fx.ctx()).unwrap();
            mode.render(&mut fx.ctx()).unwrap();
            assert!(seen.insert(mode.challenge().unwrap().id));
            mode.cleanup(&fx.surface);
        }
    }
}
