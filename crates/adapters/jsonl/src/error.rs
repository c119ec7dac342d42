//! JSON-lines adapter error types.

use porchlight_domain::error::NotificationError;

#[derive(Debug, thiserror::Error)]
pub enum JsonLinesError {
    /// The underlying reader failed.
    #[error("failed to read notification stream")]
    Read(#[from] std::io::Error),

    /// One line was not a valid notification.
    #[error("line {line} is not a valid notification")]
    Decode {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

impl JsonLinesError {
    #[must_use]
    pub fn into_domain(self) -> NotificationError {
        NotificationError::Transport(Box::new(self))
    }
}

impl From<JsonLinesError> for NotificationError {
    fn from(err: JsonLinesError) -> Self {
        err.into_domain()
    }
}
