//! Virtual camera — a detection every `interval`.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use porchlight_app::ports::NotificationSource;
use porchlight_domain::detection::{DetectionEvent, SubjectType};
use porchlight_domain::error::NotificationError;

/// [`NotificationSource`] that raises one detection of a fixed subject per
/// interval, the first one immediately.
#[derive(Debug, Clone)]
pub struct VirtualCamera {
    camera: String,
    subject: SubjectType,
    interval: Duration,
    limit: Option<usize>,
}

impl VirtualCamera {
    #[must_use]
    pub fn new(camera: impl Into<String>, subject: SubjectType, interval: Duration) -> Self {
        Self {
            camera: camera.into(),
            subject,
            interval,
            limit: None,
        }
    }

    /// Stop after `count` detections instead of running forever.
    #[must_use]
    pub fn limit(mut self, count: usize) -> Self {
        self.limit = Some(count);
        self
    }
}

impl NotificationSource for VirtualCamera {
    fn name(&self) -> &'static str {
        "virtual"
    }

    async fn subscribe(self, sink: mpsc::Sender<DetectionEvent>) -> Result<(), NotificationError> {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut sent = 0;

        while self.limit.is_none_or(|limit| sent < limit) {
            ticker.tick().await;
            let event = DetectionEvent::new(self.camera.clone(), self.subject);
            tracing::debug!(
                detection_id = %event.id,
                camera = %event.camera,
                subject = %event.subject,
                "virtual camera detection"
            );
            sink.send(event)
                .await
                .map_err(|_| NotificationError::Closed)?;
            sent += 1;
        }

        Ok(())
    }
}
