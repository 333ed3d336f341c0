//! End-to-end session scenarios.
//!
//! Each test drives a real [`Session`] over a [`RecordingSurface`] with the
//! tokio clock paused, answering through the [`SessionHandle`] the way a
//! front-end would.

use std::sync::Arc;
use std::time::Duration;

use game_core::{
    Challenge, FixedReward, ModeKind, ModeSelection, RewardPolicy, RewardVariant, UniformReward,
};
use runtime::{
    CoinStore, DropReason, GameEvent, HandleId, InMemoryCoinStore, InMemoryMistakeLog,
    InputBinding, InputTarget, RETRY_MESSAGE, RecordingSurface, RewardStage, RuntimeConfig,
    Session, SessionEnd, SessionHandle, SessionSummary, SurfaceOp, Topic, Visual,
};
use runtime::surface::TextRole;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

const INITIAL_BALANCE: u64 = 10;

struct Ready {
    mode: ModeKind,
    challenge: Challenge,
    targets: Vec<InputBinding>,
}

impl Ready {
    fn pick(&self, correct: bool) -> HandleId {
        self.targets
            .iter()
            .find(|binding| match &binding.target {
                InputTarget::Choose(choice) => self.challenge.is_correct(choice) == correct,
                InputTarget::Replay => false,
            })
            .map(|binding| binding.handle)
            .expect("challenge should bind a matching option")
    }
}

struct Harness {
    handle: SessionHandle,
    surface: Arc<RecordingSurface>,
    store: Arc<InMemoryCoinStore>,
    mistakes: Arc<InMemoryMistakeLog>,
    challenge_rx: broadcast::Receiver<GameEvent>,
    session_rx: broadcast::Receiver<GameEvent>,
    reward_rx: broadcast::Receiver<GameEvent>,
    /// Challenge-topic events consumed while waiting for the next challenge.
    seen: Vec<GameEvent>,
    task: JoinHandle<runtime::Result<SessionSummary>>,
}

impl Harness {
    fn start(selection: ModeSelection, policy: Arc<dyn RewardPolicy>) -> Self {
        let surface = Arc::new(RecordingSurface::new());
        let store = Arc::new(InMemoryCoinStore::with_balance(INITIAL_BALANCE));
        let mistakes = Arc::new(InMemoryMistakeLog::new());

        let config = RuntimeConfig {
            event_buffer_size: 512,
            ..RuntimeConfig::default()
        };
        let session = Session::builder()
            .config(config)
            .selection(selection)
            .seed(42)
            .surface(surface.clone())
            .coin_store(store.clone())
            .mistakes(mistakes.clone())
            .reward_policy(policy)
            .build()
            .expect("session should build");

        let handle = session.handle();
        let challenge_rx = handle.subscribe(Topic::Challenge);
        let session_rx = handle.subscribe(Topic::Session);
        let reward_rx = handle.subscribe(Topic::Reward);
        let task = tokio::spawn(session.run());

        Self {
            handle,
            surface,
            store,
            mistakes,
            challenge_rx,
            session_rx,
            reward_rx,
            seen: Vec::new(),
            task,
        }
    }

    async fn ready(&mut self) -> Ready {
        loop {
            let event = self
                .challenge_rx
                .recv()
                .await
                .expect("challenge events should keep flowing");
            if let GameEvent::ChallengeReady {
                mode,
                challenge,
                targets,
            } = event
            {
                return Ready {
                    mode,
                    challenge,
                    targets,
                };
            }
            self.seen.push(event);
        }
    }

    async fn balance_update(&mut self) -> (u64, u64) {
        loop {
            let event = self
                .session_rx
                .recv()
                .await
                .expect("session events should keep flowing");
            if let GameEvent::BalanceUpdated { balance, delta } = event {
                return (balance, delta);
            }
        }
    }

    fn accepted(&self) -> Vec<bool> {
        self.seen
            .iter()
            .filter_map(|event| match event {
                GameEvent::AnswerAccepted { correct, .. } => Some(*correct),
                _ => None,
            })
            .collect()
    }

    fn dropped(&self) -> Vec<DropReason> {
        self.seen
            .iter()
            .filter_map(|event| match event {
                GameEvent::InputDropped { reason, .. } => Some(*reason),
                _ => None,
            })
            .collect()
    }

    /// Drains challenge events published so far without waiting.
    fn collect_pending(&mut self) {
        while let Ok(event) = self.challenge_rx.try_recv() {
            self.seen.push(event);
        }
    }

    async fn exit(self) -> (SessionSummary, Self) {
        self.handle.exit().expect("session should accept exit");
        self.join().await
    }

    async fn join(mut self) -> (SessionSummary, Self) {
        let summary = (&mut self.task)
            .await
            .expect("session task should not panic")
            .expect("session should end cleanly");
        (summary, self)
    }
}

#[tokio::test(start_paused = true)]
async fn six_correct_directions_win_exactly_once() {
    let mut h = Harness::start(
        ModeSelection::Pinned(ModeKind::LeftRightDirections),
        Arc::new(FixedReward(2)),
    );

    for answer in 1..=6 {
        let ready = h.ready().await;
        assert_eq!(ready.mode, ModeKind::LeftRightDirections);
        assert!(h.accepted().is_empty(), "win reported before answer {answer}");

        h.handle.activate(ready.pick(true)).unwrap();
    }

    // Next round only starts after the reward has been persisted.
    let next = h.ready().await;
    assert_eq!(next.mode, ModeKind::LeftRightDirections);
    assert_eq!(h.accepted(), vec![true]);

    let (summary, h) = h.exit().await;
    assert_eq!(summary.end, SessionEnd::Exited);
    assert_eq!(summary.challenges_completed, 1);
    assert_eq!(summary.balance, INITIAL_BALANCE + 2);
    assert_eq!(h.store.balance().unwrap(), INITIAL_BALANCE + 2);
}

#[tokio::test(start_paused = true)]
async fn answers_during_a_reward_have_no_effect() {
    let mut h = Harness::start(
        ModeSelection::Pinned(ModeKind::WordEmojiMatch),
        Arc::new(FixedReward(2)),
    );

    let ready = h.ready().await;
    let right = ready.pick(true);
    let wrong = ready.pick(false);
    h.handle.activate(right).unwrap();
    h.handle.activate(right).unwrap();
    h.handle.activate(wrong).unwrap();

    assert_eq!(h.balance_update().await, (INITIAL_BALANCE + 2, 2));
    h.ready().await;

    assert_eq!(h.accepted(), vec![true]);
    assert_eq!(
        h.dropped(),
        vec![DropReason::RewardInFlight, DropReason::RewardInFlight]
    );
    assert_eq!(h.mistakes.snapshot().total(), 0);

    let (summary, h) = h.exit().await;
    assert_eq!(summary.challenges_completed, 1);
    assert_eq!(summary.coins_earned, 2);
    assert_eq!(h.store.write_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn balance_is_initial_plus_every_reward_in_order() {
    let mut h = Harness::start(ModeSelection::Alternate, Arc::new(UniformReward::new(1, 3)));

    let mut modes = Vec::new();
    let mut deltas = Vec::new();
    let mut expected = INITIAL_BALANCE;
    for _ in 0..5 {
        let ready = h.ready().await;
        modes.push(ready.mode);
        h.handle.activate(ready.pick(true)).unwrap();

        let (balance, delta) = h.balance_update().await;
        assert!((1..=3).contains(&delta));
        expected += delta;
        assert_eq!(balance, expected);
        deltas.push(delta);
    }
    h.ready().await;

    assert_eq!(
        modes,
        vec![
            ModeKind::LetterListening,
            ModeKind::WordEmojiMatch,
            ModeKind::LetterListening,
            ModeKind::WordEmojiMatch,
            ModeKind::LetterListening,
        ]
    );

    let (summary, h) = h.exit().await;
    assert_eq!(summary.challenges_completed, 5);
    assert_eq!(summary.coins_earned, deltas.iter().sum::<u64>());
    assert_eq!(summary.balance, INITIAL_BALANCE + summary.coins_earned);
    assert_eq!(h.store.balance().unwrap(), summary.balance);
}

#[tokio::test(start_paused = true)]
async fn boosted_reward_shows_multiplier_before_coins_and_pays_raw_amount() {
    let mut h = Harness::start(
        ModeSelection::Pinned(ModeKind::WordEmojiMatch),
        Arc::new(FixedReward(2)),
    );

    for _ in 0..2 {
        let ready = h.ready().await;
        h.handle.activate(ready.pick(true)).unwrap();
        h.balance_update().await;
    }
    while h.reward_rx.try_recv().is_ok() {}
    h.surface.clear_ops();

    let ready = h.ready().await;
    h.handle.activate(ready.pick(true)).unwrap();
    assert_eq!(h.balance_update().await, (INITIAL_BALANCE + 6, 2));

    let mut stages = Vec::new();
    let mut finished = None;
    while let Ok(event) = h.reward_rx.try_recv() {
        match event {
            GameEvent::RewardStage { stage } => stages.push(stage),
            GameEvent::RewardFinished {
                coins, multiplier, ..
            } => finished = Some((coins, multiplier)),
            _ => {}
        }
    }
    assert_eq!(finished, Some((2, 3)));
    let multiplier_at = stages
        .iter()
        .position(|s| *s == RewardStage::Multiplier)
        .expect("multiplier stage should run");
    let coins_at = stages
        .iter()
        .position(|s| *s == RewardStage::CoinReveal)
        .expect("coin stage should run");
    assert!(multiplier_at < coins_at);

    let ops = h.surface.ops();
    let multiplier_text = ops
        .iter()
        .find_map(|op| match op {
            SurfaceOp::Create {
                handle,
                visual:
                    Visual::Text {
                        role: TextRole::Multiplier,
                        text,
                    },
                ..
            } => {
                assert_eq!(text, "x3");
                Some(*handle)
            }
            _ => None,
        })
        .expect("multiplier text should be created");
    let destroyed_at = ops
        .iter()
        .position(|op| *op == SurfaceOp::Destroy { handle: multiplier_text })
        .expect("multiplier text should be destroyed");
    let coin_text_at = ops
        .iter()
        .position(|op| {
            matches!(
                op,
                SurfaceOp::Create {
                    visual: Visual::Text {
                        role: TextRole::CoinAmount,
                        ..
                    },
                    ..
                }
            )
        })
        .expect("coin amount should be shown");
    assert!(destroyed_at < coin_text_at);

    let (summary, _) = h.exit().await;
    assert_eq!(summary.coins_earned, 6);
}

#[tokio::test(start_paused = true)]
async fn wrong_answer_retries_the_same_challenge() {
    let mut h = Harness::start(
        ModeSelection::Pinned(ModeKind::WordEmojiMatch),
        Arc::new(FixedReward(1)),
    );

    let ready = h.ready().await;
    h.handle.activate(ready.pick(false)).unwrap();
    h.handle.activate(ready.pick(true)).unwrap();

    tokio::time::sleep(Duration::from_millis(100)).await;
    h.collect_pending();
    assert_eq!(h.accepted(), vec![false]);
    assert_eq!(h.dropped(), vec![DropReason::AnswerPending]);

    let retry = h.surface.live_matching(|visual| {
        matches!(visual, Visual::Text { text, role: TextRole::Feedback } if text == RETRY_MESSAGE)
    });
    assert_eq!(retry.len(), 1);

    tokio::time::sleep(Duration::from_millis(1_000)).await;
    assert!(!h.surface.is_live(retry[0]));

    // Same handles, same challenge.
    h.handle.activate(ready.pick(true)).unwrap();
    assert_eq!(h.balance_update().await, (INITIAL_BALANCE + 1, 1));
    h.ready().await;
    assert_eq!(h.accepted(), vec![false, true]);

    let mistakes = h.mistakes.snapshot();
    assert_eq!(mistakes.total(), 1);
    assert!(mistakes.mode_mistakes(ModeKind::WordEmojiMatch).is_some());

    h.exit().await;
}

#[tokio::test(start_paused = true)]
async fn missed_direction_ends_the_session() {
    let mut h = Harness::start(
        ModeSelection::Pinned(ModeKind::LeftRightDirections),
        Arc::new(FixedReward(2)),
    );

    let ready = h.ready().await;
    h.handle.activate(ready.pick(true)).unwrap();
    let ready = h.ready().await;
    h.handle.activate(ready.pick(false)).unwrap();

    let (summary, h) = h.join().await;
    assert_eq!(
        summary.end,
        SessionEnd::StreakBroken {
            correct_in_row: 1,
            total_attempts: 2
        }
    );
    assert_eq!(summary.challenges_completed, 0);
    assert_eq!(summary.balance, INITIAL_BALANCE);
    assert_eq!(h.store.write_count(), 0);
    assert_eq!(h.mistakes.snapshot().total(), 1);
    assert_eq!(h.surface.live_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn exit_during_reward_waits_for_persistence() {
    let mut h = Harness::start(
        ModeSelection::Pinned(ModeKind::LetterListening),
        Arc::new(FixedReward(3)),
    );

    let ready = h.ready().await;
    h.handle.activate(ready.pick(true)).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    h.handle.exit().unwrap();

    let (summary, mut h) = h.join().await;
    assert_eq!(summary.end, SessionEnd::Exited);
    assert_eq!(summary.challenges_completed, 1);
    assert_eq!(summary.balance, INITIAL_BALANCE + 3);
    assert_eq!(h.store.write_count(), 1);
    assert_eq!(h.surface.live_count(), 0);

    let mut ended = false;
    while let Ok(event) = h.session_rx.try_recv() {
        if let GameEvent::SessionEnded {
            end,
            challenges_completed,
        } = event
        {
            assert_eq!(end, SessionEnd::Exited);
            assert_eq!(challenges_completed, 1);
            ended = true;
        }
    }
    assert!(ended);
}

#[tokio::test(start_paused = true)]
async fn direction_wins_advance_the_booster() {
    let mut h = Harness::start(
        ModeSelection::Pinned(ModeKind::LeftRightDirections),
        Arc::new(FixedReward(2)),
    );

    let mut boosters = Vec::new();
    let mut finished = Vec::new();
    for round in 1..=2u64 {
        for _ in 0..6 {
            let ready = h.ready().await;
            h.handle.activate(ready.pick(true)).unwrap();
        }

        loop {
            match h.session_rx.recv().await.expect("session events should keep flowing") {
                GameEvent::BoosterChanged { streak, multiplier } => {
                    boosters.push((streak, multiplier));
                }
                GameEvent::BalanceUpdated { balance, delta } => {
                    assert_eq!((balance, delta), (INITIAL_BALANCE + 2 * round, 2));
                    break;
                }
                _ => {}
            }
        }
        while let Ok(event) = h.reward_rx.try_recv() {
            if let GameEvent::RewardFinished {
                multiplier, variant, ..
            } = event
            {
                finished.push((variant, multiplier));
            }
        }
    }

    assert_eq!(boosters, vec![(1, 1), (2, 2)]);
    assert_eq!(
        finished,
        vec![(RewardVariant::Gift, 1), (RewardVariant::Gift, 2)]
    );

    let (summary, _) = h.exit().await;
    assert_eq!(summary.challenges_completed, 2);
    assert_eq!(summary.coins_earned, 4);
}

#[tokio::test(start_paused = true)]
async fn dropping_every_handle_ends_the_session() {
    let mut h = Harness::start(ModeSelection::Alternate, Arc::new(FixedReward(1)));
    h.ready().await;
    assert!(h.surface.live_count() > 0);

    let Harness {
        handle,
        surface,
        store,
        task,
        ..
    } = h;
    drop(handle);

    let summary = tokio::time::timeout(Duration::from_secs(60), task)
        .await
        .expect("session should end once no handle is left")
        .expect("session task should not panic")
        .expect("session should end cleanly");
    assert_eq!(summary.end, SessionEnd::Exited);
    assert_eq!(summary.challenges_completed, 0);
    assert_eq!(store.write_count(), 0);
    assert_eq!(surface.live_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn handles_dropped_during_a_reward_still_persist_it() {
    let mut h = Harness::start(
        ModeSelection::Pinned(ModeKind::WordEmojiMatch),
        Arc::new(FixedReward(3)),
    );

    let ready = h.ready().await;
    h.handle.activate(ready.pick(true)).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    let Harness {
        handle,
        surface,
        store,
        task,
        ..
    } = h;
    drop(handle);

    let summary = task
        .await
        .expect("session task should not panic")
        .expect("session should end cleanly");
    assert_eq!(summary.end, SessionEnd::Exited);
    assert_eq!(summary.challenges_completed, 1);
    assert_eq!(summary.balance, INITIAL_BALANCE + 3);
    assert_eq!(store.write_count(), 1);
    assert_eq!(surface.live_count(), 0);
}
