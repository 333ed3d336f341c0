//! Reward amounts and presentation variants.

use rand::{Rng, RngCore};

use crate::config::GameConfig;

/// Visual flavour of the reward sequence.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum RewardVariant {
    /// Gift box that shakes before bursting open.
    #[default]
    Gift,
    /// Treasure chest that bounces instead of shaking.
    Treasure,
}

/// Source of coin reward amounts.
pub trait RewardPolicy: Send + Sync {
    /// Rolls the coin amount for one correct challenge.
    fn roll(&self, rng: &mut dyn RngCore) -> u32;
}

/// Uniform reward over an inclusive range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UniformReward {
    min: u32,
    max: u32,
}

impl UniformReward {
    pub fn new(min: u32, max: u32) -> Self {
        let min = min.max(1);
        Self {
            min,
            max: max.max(min),
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.reward_min, config.reward_max)
    }
}

impl Default for UniformReward {
    fn default() -> Self {
        Self::new(GameConfig::DEFAULT_REWARD_MIN, GameConfig::DEFAULT_REWARD_MAX)
    }
}

impl RewardPolicy for UniformReward {
    fn roll(&self, rng: &mut dyn RngCore) -> u32 {
        rng.gen_range(self.min..=self.max)
    }
}

/// Always yields the same amount. Useful for scripted sessions and tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedReward(pub u32);

impl RewardPolicy for FixedReward {
    fn roll(&self, _rng: &mut dyn RngCore) -> u32 {
        self.0
    }
}
