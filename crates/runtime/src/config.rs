//! Session timing parameters.
//!
//! Durations are presentation pacing only; no rule depends on them. Tests run
//! against the paused tokio clock, so the defaults cost nothing there.

use std::time::Duration;

/// Delays driven by the modes themselves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModeTimings {
    /// Pause between a correct direction and the next question.
    pub next_question: Duration,
    /// Pause between the winning direction and the answer callback.
    pub win_delay: Duration,
    /// Length of the shake/flash reveal after a wrong direction.
    pub reveal: Duration,
}

impl Default for ModeTimings {
    fn default() -> Self {
        Self {
            next_question: Duration::from_millis(500),
            win_delay: Duration::from_millis(500),
            reveal: Duration::from_millis(800),
        }
    }
}

/// Orchestrator feedback around an answer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedbackTimings {
    /// How long the retry message stays up; the answer guard is held meanwhile.
    pub error_display: Duration,
    pub success_particles: usize,
    /// Success particles are destroyed after this long.
    pub particle_lifetime: Duration,
}

impl Default for FeedbackTimings {
    fn default() -> Self {
        Self {
            error_display: Duration::from_millis(1000),
            success_particles: 20,
            particle_lifetime: Duration::from_millis(1000),
        }
    }
}

/// Pacing of the reward sequence stages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RewardTimings {
    pub dim_in: Duration,
    pub entrance: Duration,
    /// Shakes (gift) or bounces (treasure), each lasting `react_cycle`.
    pub react_cycles: u32,
    pub react_cycle: Duration,
    pub explosion: Duration,
    pub explosion_particles: usize,
    pub multiplier_enter: Duration,
    pub multiplier_pulse: Duration,
    pub multiplier_fade: Duration,
    pub glow_particles: usize,
    pub coin_enter: Duration,
    pub coin_sparkles: usize,
    pub coin_hold: Duration,
    pub coin_fade: Duration,
    pub dim_out: Duration,
}

impl Default for RewardTimings {
    fn default() -> Self {
        Self {
            dim_in: Duration::from_millis(200),
            entrance: Duration::from_millis(300),
            react_cycles: 6,
            react_cycle: Duration::from_millis(200),
            explosion: Duration::from_millis(600),
            explosion_particles: 20,
            multiplier_enter: Duration::from_millis(300),
            multiplier_pulse: Duration::from_millis(400),
            multiplier_fade: Duration::from_millis(300),
            glow_particles: 12,
            coin_enter: Duration::from_millis(400),
            coin_sparkles: 8,
            coin_hold: Duration::from_millis(1000),
            coin_fade: Duration::from_millis(400),
            dim_out: Duration::from_millis(200),
        }
    }
}

impl RewardTimings {
    /// Wall time of one full sequence, with or without the multiplier stage.
    pub fn total(&self, with_multiplier: bool) -> Duration {
        let mut total = self.dim_in
            + self.entrance
            + self.react_cycle * self.react_cycles
            + self.explosion
            + self.coin_enter
            + self.coin_hold
            + self.coin_fade
            + self.dim_out;
        if with_multiplier {
            total += self.multiplier_enter + self.multiplier_pulse + self.multiplier_fade;
        }
        total
    }
}
