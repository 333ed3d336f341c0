//! Events published by a running session.

use game_core::{Challenge, Choice, ModeKind, ModeSelection, RewardVariant};

use crate::reward::RewardStage;
use crate::surface::{HandleId, Point};

/// What activating a bound handle means to the mode that bound it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputTarget {
    /// Select a candidate answer.
    Choose(Choice),
    /// Replay the prompt audio.
    Replay,
}

/// A handle bound for input together with its meaning and position.
#[derive(Clone, Debug, PartialEq)]
pub struct InputBinding {
    pub handle: HandleId,
    pub target: InputTarget,
    pub at: Point,
}

/// Why an activation was dropped before reaching the mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropReason {
    /// An answer is already being processed.
    AnswerPending,
    /// The reward overlay is up.
    RewardInFlight,
}

/// How a session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEnd {
    /// The caller asked to leave.
    Exited,
    /// A left/right round was lost.
    StreakBroken {
        correct_in_row: u32,
        total_attempts: u32,
    },
}

#[derive(Clone, Debug)]
pub enum GameEvent {
    SessionStarted {
        balance: u64,
        selection: ModeSelection,
    },
    ModeSelected {
        mode: ModeKind,
        challenge_count: u64,
    },
    ChallengeReady {
        mode: ModeKind,
        challenge: Challenge,
        targets: Vec<InputBinding>,
    },
    InputDropped {
        handle: HandleId,
        reason: DropReason,
    },
    AnswerAccepted {
        mode: ModeKind,
        correct: bool,
        selected: Choice,
        origin: Point,
    },
    /// An answer arrived while another was being processed.
    AnswerIgnored {
        mode: ModeKind,
        selected: Choice,
    },
    StreakAdvanced {
        correct_in_row: u32,
        required: u32,
    },
    BoosterChanged {
        streak: u32,
        multiplier: u32,
    },
    RewardStage {
        stage: RewardStage,
    },
    RewardFinished {
        coins: u32,
        multiplier: u32,
        variant: RewardVariant,
    },
    BalanceUpdated {
        balance: u64,
        delta: u64,
    },
    SessionEnded {
        end: SessionEnd,
        challenges_completed: u64,
    },
}
