//! Dispatcher — the single consumer that serialises every automation input.
//!
//! Detections arrive over one mpsc channel (fed by the notification source),
//! timer wake-ups over another (fed by timer tasks). Both are drained by one
//! `select!` loop that owns the [`PresenceAutomation`], so each input is
//! handled to completion before the next one is looked at and no lock is
//! needed around the timer state.

use std::future::Future;

use tokio::sync::mpsc;

use porchlight_domain::automation::AutomationSettings;
use porchlight_domain::detection::DetectionEvent;

use crate::automation::{DetectionOutcome, PresenceAutomation, TimerOutcome};
use crate::ports::{DaylightOracle, LightBridge};
use crate::timer::{OffTimer, TimerToken};

/// Capacity of the internal timer wake-up channel.
///
/// At most one live timer exists; the slack absorbs stale tokens.
const WAKEUP_CAPACITY: usize = 4;

/// Counters describing one dispatcher run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Detections received, whatever their outcome.
    pub detections: usize,
    /// Times the lights were switched on.
    pub turned_on: usize,
    /// Times a pending turn-off was pushed back.
    pub extended: usize,
    /// Times the lights were switched off by the timer.
    pub turned_off: usize,
    /// Whether a pending turn-off was cancelled on exit.
    pub cancelled_pending: bool,
}

/// Owns the automation and drives it from its two input channels.
pub struct Dispatcher<O, B> {
    automation: PresenceAutomation<O, B>,
    detections: mpsc::Receiver<DetectionEvent>,
    wakeups: mpsc::Receiver<TimerToken>,
}

impl<O, B> Dispatcher<O, B>
where
    O: DaylightOracle,
    B: LightBridge,
{
    /// Build a dispatcher and the sender notification sources push into.
    ///
    /// `capacity` bounds how many detections may queue while one is being
    /// handled; a full queue applies back-pressure to the source.
    pub fn new(
        settings: AutomationSettings,
        oracle: O,
        bridge: B,
        capacity: usize,
    ) -> (Self, mpsc::Sender<DetectionEvent>) {
        let (timer, wakeups) = OffTimer::channel(WAKEUP_CAPACITY);
        let (sink, detections) = mpsc::channel(capacity);
        let dispatcher = Self {
            automation: PresenceAutomation::new(settings, oracle, bridge, timer),
            detections,
            wakeups,
        };
        (dispatcher, sink)
    }

    #[must_use]
    pub fn automation(&self) -> &PresenceAutomation<O, B> {
        &self.automation
    }

    /// Run until every detection sender is dropped and no turn-off is pending.
    pub async fn run(self) -> RunSummary {
        self.run_until(std::future::pending()).await
    }

    /// Run until `shutdown` completes, or until every detection sender is
    /// dropped and no turn-off is pending, whichever comes first.
    ///
    /// On exit any pending turn-off is cancelled.
    pub async fn run_until(mut self, shutdown: impl Future<Output = ()>) -> RunSummary {
        let mut shutdown = std::pin::pin!(shutdown);
        let mut summary = RunSummary::default();
        let mut source_open = true;

        tracing::info!(
            camera = %self.automation.settings().camera(),
            lights = %self.automation.settings().lights(),
            on_secs = self.automation.settings().on_duration().as_secs(),
            "listening for detections"
        );

        loop {
            if !source_open && !self.automation.is_pending() {
                tracing::info!("notification source ended and no auto-off pending");
                break;
            }

            tokio::select! {
                biased;
                () = &mut shutdown => {
                    tracing::info!("shutdown requested");
                    break;
                }
                Some(token) = self.wakeups.recv() => {
                    if let TimerOutcome::TurnedOff(_) = self.automation.on_timer_fired(token).await {
                        summary.turned_off += 1;
                    }
                }
                event = self.detections.recv(), if source_open => match event {
                    Some(event) => {
                        summary.detections += 1;
                        match self.automation.on_detection(&event).await {
                            DetectionOutcome::TurnedOn(_) => summary.turned_on += 1,
                            DetectionOutcome::Extended => summary.extended += 1,
                            _ => {}
                        }
                    }
                    None => {
                        tracing::info!("notification source closed");
                        source_open = false;
                    }
                },
                else => break,
            }
        }

        summary.cancelled_pending = self.automation.shutdown();
        tracing::info!(
            detections = summary.detections,
            turned_on = summary.turned_on,
            extended = summary.extended,
            turned_off = summary.turned_off,
            "dispatcher stopped"
        );
        summary
    }
}
