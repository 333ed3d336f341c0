/// Game rule constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Consecutive correct directions needed to win a left/right round.
    pub required_correct: u32,
    /// Letters shown per letter challenge, the correct one included.
    pub letter_choices: usize,
    /// Inclusive bounds of the random coin reward.
    pub reward_min: u32,
    pub reward_max: u32,
    /// Highest value the booster streak (and so the multiplier) can reach.
    pub booster_cap: u32,
}

impl GameConfig {
    // ===== runtime-tunable defaults =====
    pub const DEFAULT_REQUIRED_CORRECT: u32 = 6;
    pub const DEFAULT_LETTER_CHOICES: usize = 6;
    pub const DEFAULT_REWARD_MIN: u32 = 1;
    pub const DEFAULT_REWARD_MAX: u32 = 3;
    pub const DEFAULT_BOOSTER_CAP: u32 = 5;

    pub fn new() -> Self {
        Self {
            required_correct: Self::DEFAULT_REQUIRED_CORRECT,
            letter_choices: Self::DEFAULT_LETTER_CHOICES,
            reward_min: Self::DEFAULT_REWARD_MIN,
            reward_max: Self::DEFAULT_REWARD_MAX,
            booster_cap: Self::DEFAULT_BOOSTER_CAP,
        }
    }

    pub fn with_required_correct(mut self, required_correct: u32) -> Self {
        self.required_correct = required_correct.max(1);
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
