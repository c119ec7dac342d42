//! Off-timer — the cancellable, one-shot scheduled turn-off.
//!
//! Scheduling spawns a task that sleeps until the deadline and then posts its
//! [`TimerToken`] on the wake-up channel. The consumer of that channel (the
//! dispatcher) hands the token back to the automation, so the turn-off runs on
//! the same single consumer as detections do.
//!
//! Cancelling aborts the task. A token that was posted just before the
//! cancellation may still be sitting in the channel; the automation tells it
//! apart because it no longer matches the pending [`PendingOff`].

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Identifies one scheduled turn-off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

/// Schedules turn-offs and hands out their handles.
pub struct OffTimer {
    next: u64,
    fired: mpsc::Sender<TimerToken>,
}

impl OffTimer {
    /// Create a timer and the receiving end of its wake-up channel.
    #[must_use]
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<TimerToken>) {
        let (fired, wakeups) = mpsc::channel(capacity);
        (Self { next: 0, fired }, wakeups)
    }

    /// Schedule a turn-off at `deadline`.
    ///
    /// A deadline already in the past fires on the next tick. Must be called
    /// from within a tokio runtime.
    pub fn schedule_at(&mut self, deadline: Instant) -> PendingOff {
        self.next += 1;
        let token = TimerToken(self.next);
        let fired = self.fired.clone();

        let handle = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            // The receiver only goes away on shutdown, where nobody cares.
            let _ = fired.send(token).await;
        });

        PendingOff {
            token,
            deadline,
            handle,
        }
    }
}

/// Owned handle to a scheduled turn-off.
///
/// Dropping the handle cancels the turn-off.
#[derive(Debug)]
pub struct PendingOff {
    token: TimerToken,
    deadline: Instant,
    handle: JoinHandle<()>,
}

impl PendingOff {
    #[must_use]
    pub fn token(&self) -> TimerToken {
        self.token
    }

    /// When the turn-off is due.
    #[must_use]
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Cancel the turn-off.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for PendingOff {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
