//! Notification port — where detections come from.

use std::future::Future;

use tokio::sync::mpsc;

use porchlight_domain::detection::DetectionEvent;
use porchlight_domain::error::NotificationError;

/// A stream of camera detections.
///
/// Sources may read from any transport on any task, but they only ever hand
/// events to the core through `sink`, the sending half of the dispatcher's
/// single-consumer channel. That is what keeps state transitions serialised.
pub trait NotificationSource {
    /// Short name used in logs (e.g. `"jsonl"`).
    fn name(&self) -> &'static str;

    /// Deliver detections into `sink` until the transport ends.
    ///
    /// Returns `Ok(())` on a clean end of stream.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError::Closed`] if the consumer went away, or
    /// [`NotificationError::Transport`] if the transport failed.
    fn subscribe(
        self,
        sink: mpsc::Sender<DetectionEvent>,
    ) -> impl Future<Output = Result<(), NotificationError>> + Send;
}
