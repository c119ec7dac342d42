//! Sunrise-sunset adapter error types.

use porchlight_domain::error::LookupError;

/// Errors specific to the sunrise-sunset.org adapter.
#[derive(Debug, thiserror::Error)]
pub enum SunriseSunsetError {
    #[error("HTTP request to sunrise-sunset API failed")]
    Http(#[from] reqwest::Error),

    #[error("sunrise-sunset API answered with HTTP status {0}")]
    Status(u16),

    #[error("sunrise-sunset API reported status {0}")]
    Api(String),

    #[error("failed to parse sunrise-sunset payload")]
    PayloadParse(#[source] serde_json::Error),
}

impl SunriseSunsetError {
    /// Convert into the [`LookupError`] kind the core reasons about.
    #[must_use]
    pub fn into_domain(self) -> LookupError {
        match self {
            Self::Api(status) => LookupError::Upstream { status },
            Self::PayloadParse(_) => LookupError::Malformed(Box::new(self)),
            Self::Http(_) | Self::Status(_) => LookupError::Transport(Box::new(self)),
        }
    }
}

impl From<SunriseSunsetError> for LookupError {
    fn from(err: SunriseSunsetError) -> Self {
        err.into_domain()
    }
}
