//! # porchlight-adapter-jsonl
//!
//! Notification source that reads one JSON object per line from any
//! [`AsyncBufRead`], typically the daemon's stdin fed by whatever bridges the
//! camera's push notifications:
//!
//! ```text
//! {"camera": "Front Door", "subtype": "human", "timestamp": "2024-01-01T20:00:00Z"}
//! {"camera": "Front Door", "subject": "vehicle"}
//! ```
//!
//! `subject` is accepted in place of `subtype`, and a missing `timestamp`
//! means "now". Blank lines are skipped. A line that does not decode is
//! logged and skipped; it never ends the stream.

mod error;

pub use error::JsonLinesError;

use serde::Deserialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::LinesStream;

use porchlight_app::ports::NotificationSource;
use porchlight_domain::detection::{DetectionEvent, SubjectType};
use porchlight_domain::error::NotificationError;
use porchlight_domain::time::{Timestamp, now};

#[derive(Debug, Deserialize)]
struct Notification {
    camera: String,
    #[serde(alias = "subject")]
    subtype: String,
    #[serde(default)]
    timestamp: Option<Timestamp>,
}

impl From<Notification> for DetectionEvent {
    fn from(notification: Notification) -> Self {
        let subject: SubjectType = notification.subtype.parse().unwrap_or_default();
        Self::at(
            notification.camera,
            subject,
            notification.timestamp.unwrap_or_else(now),
        )
    }
}

/// Decode one line. Blank lines yield `Ok(None)`.
///
/// # Errors
///
/// Returns [`JsonLinesError::Decode`] when the line is not a notification
/// object.
pub fn parse_line(line_no: usize, line: &str) -> Result<Option<DetectionEvent>, JsonLinesError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let notification: Notification =
        serde_json::from_str(line).map_err(|source| JsonLinesError::Decode {
            line: line_no,
            source,
        })?;
    Ok(Some(notification.into()))
}

/// [`NotificationSource`] over newline-delimited JSON.
pub struct JsonLinesSource<R> {
    reader: R,
}

impl<R> JsonLinesSource<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl JsonLinesSource<BufReader<Stdin>> {
    /// Read notifications from the process's standard input.
    #[must_use]
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R> NotificationSource for JsonLinesSource<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    fn name(&self) -> &'static str {
        "jsonl"
    }

    async fn subscribe(self, sink: mpsc::Sender<DetectionEvent>) -> Result<(), NotificationError> {
        let mut lines = LinesStream::new(self.reader.lines());
        let mut line_no = 0;
        let mut delivered = 0;

        while let Some(line) = lines.next().await {
            line_no += 1;
            let line = line.map_err(JsonLinesError::Read)?;
            match parse_line(line_no, &line) {
                Ok(Some(event)) => {
                    tracing::debug!(
                        detection_id = %event.id,
                        camera = %event.camera,
                        subject = %event.subject,
                        "notification received"
                    );
                    sink.send(event)
                        .await
                        .map_err(|_| NotificationError::Closed)?;
                    delivered += 1;
                }
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(%err, "skipping malformed notification");
                }
            }
        }

        tracing::info!(lines = line_no, delivered, "notification stream ended");
        Ok(())
    }
}
