//! Streak counters.
//!
//! [`DirectionStreak`] is the win condition of the left/right round: a run of
//! consecutive correct answers that resets on the first miss.
//! [`BoosterStreak`] spans challenges and drives the decorative reward
//! multiplier.

/// Result of recording a correct answer in a direction round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreakProgress {
    /// Streak grew but the win threshold is not reached yet.
    Continue { correct_in_row: u32 },
    /// Streak reached the required length; the round is won.
    Won { correct_in_row: u32 },
}

/// Consecutive-correct counter owned by a left/right round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectionStreak {
    correct_in_row: u32,
    total_attempts: u32,
    required: u32,
}

impl DirectionStreak {
    pub fn new(required: u32) -> Self {
        Self {
            correct_in_row: 0,
            total_attempts: 0,
            required: required.max(1),
        }
    }

    pub fn correct_in_row(&self) -> u32 {
        self.correct_in_row
    }

    pub fn total_attempts(&self) -> u32 {
        self.total_attempts
    }

    pub fn required(&self) -> u32 {
        self.required
    }

    pub fn record_correct(&mut self) -> StreakProgress {
        self.total_attempts += 1;
        self.correct_in_row += 1;

        if self.correct_in_row >= self.required {
            StreakProgress::Won {
                correct_in_row: self.correct_in_row,
            }
        } else {
            StreakProgress::Continue {
                correct_in_row: self.correct_in_row,
            }
        }
    }

    /// Counts the attempt without touching the run; the run is cleared once
    /// the miss has been revealed, see [`DirectionStreak::reset`].
    pub fn record_miss(&mut self) {
        self.total_attempts += 1;
    }

    pub fn reset(&mut self) {
        self.correct_in_row = 0;
    }
}

/// Session-wide run of successful challenges, capped at `cap`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoosterStreak {
    streak: u32,
    cap: u32,
}

impl BoosterStreak {
    pub fn new(cap: u32) -> Self {
        Self { streak: 0, cap }
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    /// Multiplier shown by the reward sequence; never below 1.
    pub fn multiplier(&self) -> u32 {
        self.streak.max(1)
    }

    pub fn increment(&mut self) -> u32 {
        self.streak = (self.streak + 1).min(self.cap);
        self.streak
    }

    pub fn reset(&mut self) -> u32 {
        self.streak = 0;
        self.streak
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wins_exactly_at_required_count() {
        let mut streak = DirectionStreak::new(6);

        for n in 1..6 {
            assert_eq!(
                streak.record_correct(),
                StreakProgress::Continue { correct_in_row: n }
            );
        }
        assert_eq!(
            streak.record_correct(),
            StreakProgress::Won { correct_in_row: 6 }
        );
        assert_eq!(streak.total_attempts(), 6);
    }

    #[test]
    fn miss_then_reset_clears_run() {
        let mut streak = DirectionStreak::new(6);
        streak.record_correct();
        streak.record_correct();

        streak.record_miss();
        assert_eq!(streak.correct_in_row(), 2);

        streak.reset();
        assert_eq!(streak.correct_in_row(), 0);
        assert_eq!(streak.total_attempts(), 3);
    }

    #[test]
    fn booster_caps_and_multiplier_floor() {
        let mut booster = BoosterStreak::new(5);
        assert_eq!(booster.multiplier(), 1);

        for _ in 0..8 {
            booster.increment();
        }
        assert_eq!(booster.streak(), 5);
        assert_eq!(booster.multiplier(), 5);

        booster.reset();
        assert_eq!(booster.multiplier(), 1);
    }
}
