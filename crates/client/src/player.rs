//! Scripted player driving a headless session through its handle.
use std::time::Duration;

use anyhow::Result;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tokio::sync::broadcast::error::RecvError;

use game_core::Challenge;
use runtime::{GameEvent, HandleId, InputBinding, InputTarget, SessionHandle, Topic};

/// What the player did during one session.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlayerStats {
    pub answered: u64,
    pub correct: u64,
    pub rewards: u64,
}

pub struct AutoPlayer {
    handle: SessionHandle,
    rounds: u64,
    accuracy: f64,
    think: Duration,
    /// Wait before another try on a retried challenge.
    retry_after: Duration,
    rng: StdRng,
}

impl AutoPlayer {
    pub fn new(handle: SessionHandle, rounds: u64, accuracy: f64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
            None => StdRng::from_entropy(),
        };
        Self {
            handle,
            rounds,
            accuracy,
            think: Duration::from_millis(400),
            retry_after: Duration::from_millis(1_100),
            rng,
        }
    }

    /// Plays until the session ends. Asks to exit once `rounds` challenges
    /// have been answered.
    pub async fn run(mut self) -> Result<PlayerStats> {
        let mut challenges = self.handle.subscribe(Topic::Challenge);
        let mut session = self.handle.subscribe(Topic::Session);
        let mut current: Option<(Challenge, Vec<InputBinding>)> = None;
        let mut stats = PlayerStats::default();
        let mut exit_sent = false;

        loop {
            tokio::select! {
                event = challenges.recv() => match event {
                    Ok(GameEvent::ChallengeReady { mode, challenge, targets }) => {
                        if stats.answered >= self.rounds {
                            if !exit_sent {
                                tracing::info!("Played {} challenges, leaving", stats.answered);
                                self.handle.exit()?;
                                exit_sent = true;
                            }
                            continue;
                        }
                        tracing::info!("{} challenge {}", mode, challenge.id);
                        current = Some((challenge, targets));
                        self.answer(current.as_ref(), &mut stats).await?;
                    }
                    Ok(GameEvent::AnswerAccepted { correct: false, .. }) => {
                        tokio::time::sleep(self.retry_after).await;
                        self.answer(current.as_ref(), &mut stats).await?;
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!("Player lagged behind by {} events", skipped);
                    }
                    Err(RecvError::Closed) => break,
                },
                event = session.recv() => match event {
                    Ok(GameEvent::BalanceUpdated { balance, delta }) => {
                        stats.rewards += 1;
                        tracing::info!("+{} coins, balance {}", delta, balance);
                    }
                    Ok(GameEvent::SessionEnded { end, .. }) => {
                        tracing::info!("Session ended: {:?}", end);
                        break;
                    }
                    Ok(_) | Err(RecvError::Lagged(_)) => {}
                    Err(RecvError::Closed) => break,
                },
            }
        }

        Ok(stats)
    }

    async fn answer(
        &mut self,
        current: Option<&(Challenge, Vec<InputBinding>)>,
        stats: &mut PlayerStats,
    ) -> Result<()> {
        let Some((challenge, targets)) = current else {
            return Ok(());
        };
        let want_correct = self.rng.gen_bool(self.accuracy);
        let Some(handle) = self.pick(challenge, targets, want_correct) else {
            return Ok(());
        };

        tokio::time::sleep(self.think).await;
        stats.answered += 1;
        if want_correct {
            stats.correct += 1;
        }
        self.handle.activate(handle)?;
        Ok(())
    }

    fn pick(
        &mut self,
        challenge: &Challenge,
        targets: &[InputBinding],
        want_correct: bool,
    ) -> Option<HandleId> {
        let candidates: Vec<HandleId> = targets
            .iter()
            .filter(|binding| match &binding.target {
                InputTarget::Choose(choice) => challenge.is_correct(choice) == want_correct,
                InputTarget::Replay => false,
            })
            .map(|binding| binding.handle)
            .collect();
        candidates.choose(&mut self.rng).copied()
    }
}
