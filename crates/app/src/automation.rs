//! Presence automation — the light-control state machine.
//!
//! The machine has two states, [`TimerState::Idle`] and
//! [`TimerState::Pending`], and two inputs: a detection from the camera and
//! the firing of the auto-off timer.
//!
//! Whether lights that are on were switched on by the automation or by a
//! person is inferred only from the timer: lights found on while `Idle` are
//! someone else's and are left alone, lights on while `Pending` are ours and a
//! new detection just pushes the deadline back. A person switching the lights
//! on while `Pending` is not noticed, and the auto-off still fires.
//!
//! Failures to read the daylight source or the lights drop the detection
//! without a transition. Failures to command lights never block one.

use tokio::time::Instant;

use porchlight_domain::automation::AutomationSettings;
use porchlight_domain::detection::DetectionEvent;
use porchlight_domain::time::now;

use crate::ports::{DaylightOracle, LightBridge};
use crate::services::light_group::{FanOutReport, LightGroupController};
use crate::timer::{OffTimer, PendingOff, TimerToken};

/// The only mutable state of the automation.
#[derive(Debug, Default)]
pub enum TimerState {
    /// No automatic turn-off is scheduled.
    #[default]
    Idle,
    /// An automatic turn-off is scheduled.
    Pending(PendingOff),
}

/// Which transition a detection produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionOutcome {
    /// Raised by a camera other than the watched one.
    OtherCamera,
    /// Not a human.
    NotHuman,
    /// The sun is up.
    Daylight,
    /// The daylight source failed; treated as daylight.
    DaylightUnknown,
    /// The lights could not be queried.
    LightsUnknown,
    /// Lights were already on with no timer pending: someone switched them on.
    ManualOverride,
    /// Lights were off and have been switched on; a timer is now pending.
    TurnedOn(FanOutReport),
    /// A timer was pending and has been replaced by a fresh one.
    Extended,
}

/// Which transition a timer wake-up produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerOutcome {
    /// The pending timer fired and the lights have been switched off.
    TurnedOff(FanOutReport),
    /// The token belongs to a timer that has since been replaced or cancelled.
    Stale,
}

/// The presence-lighting state machine.
///
/// Exactly one task (the [`Dispatcher`](crate::dispatcher::Dispatcher))
/// owns it and feeds it inputs one at a time.
pub struct PresenceAutomation<O, B> {
    settings: AutomationSettings,
    oracle: O,
    lights: LightGroupController<B>,
    timer: OffTimer,
    state: TimerState,
}

impl<O, B> PresenceAutomation<O, B>
where
    O: DaylightOracle,
    B: LightBridge,
{
    /// Create an idle automation.
    pub fn new(settings: AutomationSettings, oracle: O, bridge: B, timer: OffTimer) -> Self {
        Self {
            settings,
            oracle,
            lights: LightGroupController::new(bridge),
            timer,
            state: TimerState::Idle,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &AutomationSettings {
        &self.settings
    }

    #[must_use]
    pub fn state(&self) -> &TimerState {
        &self.state
    }

    /// Whether an automatic turn-off is scheduled.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self.state, TimerState::Pending(_))
    }

    /// When the scheduled turn-off is due, if any.
    #[must_use]
    pub fn pending_deadline(&self) -> Option<Instant> {
        match &self.state {
            TimerState::Pending(pending) => Some(pending.deadline()),
            TimerState::Idle => None,
        }
    }

    /// Handle one detection to completion.
    pub async fn on_detection(&mut self, event: &DetectionEvent) -> DetectionOutcome {
        if !self.settings.watches(&event.camera) {
            tracing::debug!(detection = %event.id, camera = %event.camera, "ignoring detection from unwatched camera");
            return DetectionOutcome::OtherCamera;
        }

        if !event.subject.is_human() {
            tracing::debug!(detection = %event.id, subject = %event.subject, "ignoring non-human detection");
            return DetectionOutcome::NotHuman;
        }

        tracing::info!(detection = %event.id, "human detected");
        // The auto-off counts from here, not from after the lookups below.
        let detected_at = Instant::now();

        match self.oracle.is_dark(self.settings.coordinate(), now()).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::info!(detection = %event.id, "sun is still up, doing nothing");
                return DetectionOutcome::Daylight;
            }
            Err(err) => {
                tracing::warn!(detection = %event.id, %err, "cannot confirm darkness, ignoring detection");
                return DetectionOutcome::DaylightUnknown;
            }
        }

        if self.is_pending() {
            tracing::info!(detection = %event.id, "lights were turned on automatically, extending auto-off");
            self.arm(detected_at);
            return DetectionOutcome::Extended;
        }

        match self.lights.query_any_on(self.settings.lights()).await {
            Ok(false) => {}
            Ok(true) => {
                tracing::info!(detection = %event.id, "lights were turned on manually, doing nothing");
                return DetectionOutcome::ManualOverride;
            }
            Err(err) => {
                tracing::warn!(detection = %event.id, %err, "cannot read light state, ignoring detection");
                return DetectionOutcome::LightsUnknown;
            }
        }

        let report = self.lights.set_all(self.settings.lights(), true).await;
        tracing::info!(
            detection = %event.id,
            succeeded = report.succeeded,
            failed = report.failed,
            missing = report.missing,
            "turned lights on"
        );
        self.arm(detected_at);
        DetectionOutcome::TurnedOn(report)
    }

    /// Handle a timer wake-up carrying `token`.
    pub async fn on_timer_fired(&mut self, token: TimerToken) -> TimerOutcome {
        match &self.state {
            TimerState::Pending(pending) if pending.token() == token => {}
            _ => {
                tracing::debug!(?token, "ignoring stale auto-off");
                return TimerOutcome::Stale;
            }
        }

        self.state = TimerState::Idle;
        let report = self.lights.set_all(self.settings.lights(), false).await;
        tracing::info!(
            succeeded = report.succeeded,
            failed = report.failed,
            missing = report.missing,
            "turned lights off"
        );
        TimerOutcome::TurnedOff(report)
    }

    /// Cancel any pending turn-off before the process exits.
    ///
    /// Lights are left as they are. Returns whether a turn-off was cancelled.
    pub fn shutdown(&mut self) -> bool {
        match std::mem::take(&mut self.state) {
            TimerState::Pending(pending) => {
                tracing::warn!("cancelling pending auto-off, lights stay as they are");
                pending.cancel();
                true
            }
            TimerState::Idle => false,
        }
    }

    /// Replace any pending turn-off with a fresh one due `on_duration` after
    /// `detected_at`.
    fn arm(&mut self, detected_at: Instant) {
        // Two timers never coexist.
        if let TimerState::Pending(previous) = std::mem::take(&mut self.state) {
            previous.cancel();
        }
        let after = self.settings.on_duration();
        let pending = self.timer.schedule_at(detected_at + after);
        tracing::info!(after_secs = after.as_secs(), "auto-off scheduled");
        self.state = TimerState::Pending(pending);
    }
}
