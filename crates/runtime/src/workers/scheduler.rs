//! Session event queue and one-shot timers.
//!
//! Every continuation of the session (input, elapsed delays, exit requests)
//! arrives as a [`SessionEvent`] on one queue, so the orchestrator processes
//! them strictly one at a time.
//!
//! The scheduler only holds a weak sender: once every [`SessionHandle`] is
//! gone the queue closes, and timers still pending are dropped.
//!
//! [`SessionHandle`]: crate::api::SessionHandle

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::mpsc;

use crate::modes::ModeTimer;
use crate::surface::HandleId;

/// Events consumed by the session loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SessionEvent {
    /// A bound handle was activated.
    Input(HandleId),
    Timer(SessionTimer),
    Exit,
}

/// Delayed continuations. Each carries the token it was scheduled under;
/// a token that no longer matches marks the timer as stale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionTimer {
    Mode(ModeTimer),
    /// The retry message of answer `epoch` has been shown long enough.
    FeedbackElapsed { epoch: u64 },
    /// Success particles of batch `batch` should be cleared.
    ParticlesExpired { batch: u64 },
}

/// Schedules timers back onto the session queue.
#[derive(Clone, Debug)]
pub struct Scheduler {
    tx: mpsc::WeakUnboundedSender<SessionEvent>,
    /// Source of mode round tokens, shared by every mode of the session.
    rounds: Arc<AtomicU64>,
}

impl Scheduler {
    pub(crate) fn new(tx: &mpsc::UnboundedSender<SessionEvent>) -> Self {
        Self {
            tx: tx.downgrade(),
            rounds: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Next round token. Unique within the session and never zero.
    pub(crate) fn next_round(&self) -> u64 {
        self.rounds.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Delivers `timer` after `delay`. Timers outliving the session are dropped.
    pub fn after(&self, delay: Duration, timer: SessionTimer) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let delivered = tx
                .upgrade()
                .is_some_and(|tx| tx.send(SessionEvent::Timer(timer)).is_ok());
            if !delivered {
                tracing::trace!(target: "runtime::session", ?timer, "timer fired after session end");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn delivers_timer_after_delay() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let scheduler = Scheduler::new(&tx);

        scheduler.after(
            Duration::from_millis(300),
            SessionTimer::FeedbackElapsed { epoch: 7 },
        );
        scheduler.after(
            Duration::from_millis(100),
            SessionTimer::ParticlesExpired { batch: 1 },
        );

        assert_eq!(
            rx.recv().await,
            Some(SessionEvent::Timer(SessionTimer::ParticlesExpired { batch: 1 }))
        );
        assert_eq!(
            rx.recv().await,
            Some(SessionEvent::Timer(SessionTimer::FeedbackElapsed { epoch: 7 }))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn pending_timers_do_not_hold_the_queue_open() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let scheduler = Scheduler::new(&tx);

        scheduler.after(
            Duration::from_millis(100),
            SessionTimer::FeedbackElapsed { epoch: 1 },
        );
        drop(tx);

        assert_eq!(rx.recv().await, None);
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn round_tokens_are_shared_between_clones() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let scheduler = Scheduler::new(&tx);
        let clone = scheduler.clone();

        assert_eq!(scheduler.next_round(), 1);
        assert_eq!(clone.next_round(), 2);
        assert_eq!(scheduler.next_round(), 3);
    }
}
