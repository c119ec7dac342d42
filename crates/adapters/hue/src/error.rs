//! Hue adapter error types.

use porchlight_domain::error::DeviceError;

/// Errors specific to the Hue adapter.
#[derive(Debug, thiserror::Error)]
pub enum HueError {
    /// The HTTP request could not be sent or its body could not be read.
    #[error("HTTP request to Hue bridge failed")]
    Http(#[from] reqwest::Error),

    /// The bridge answered with a non-success HTTP status.
    #[error("Hue bridge answered with HTTP status {0}")]
    Status(u16),

    /// The bridge answered with a body we could not decode.
    #[error("failed to parse Hue bridge payload")]
    PayloadParse(#[source] serde_json::Error),

    /// The bridge reported an API error (bad username, unknown light, …).
    #[error("Hue bridge error {kind} at {address}: {description}")]
    Api {
        /// Hue error type code.
        kind: u32,
        /// Resource the error applies to.
        address: String,
        /// Human-readable description.
        description: String,
    },

    /// The bridge answered a command with an empty result list.
    #[error("Hue bridge returned an empty result")]
    EmptyResult,
}

impl HueError {
    /// Convert into the [`DeviceError`] kind the core reasons about.
    #[must_use]
    pub fn into_domain(self) -> DeviceError {
        match self {
            Self::Api {
                kind, description, ..
            } => DeviceError::Rejected { kind, description },
            Self::PayloadParse(_) | Self::EmptyResult => DeviceError::Malformed(Box::new(self)),
            Self::Http(_) | Self::Status(_) => DeviceError::Unreachable(Box::new(self)),
        }
    }
}

impl From<HueError> for DeviceError {
    fn from(err: HueError) -> Self {
        err.into_domain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_status_error() {
        let err = HueError::Status(503);
        assert_eq!(err.to_string(), "Hue bridge answered with HTTP status 503");
    }

    #[test]
    fn should_convert_api_error_to_rejected() {
        let err: DeviceError = HueError::Api {
            kind: 1,
            address: "/lights".to_string(),
            description: "unauthorized user".to_string(),
        }
        .into();
        assert!(matches!(
            err,
            DeviceError::Rejected { kind: 1, ref description } if description == "unauthorized user"
        ));
    }

    #[test]
    fn should_convert_status_to_unreachable() {
        let err: DeviceError = HueError::Status(500).into();
        assert!(matches!(err, DeviceError::Unreachable(_)));
    }

    #[test]
    fn should_convert_parse_failure_to_malformed() {
        let json_err = serde_json::from_str::<serde_json::Value>("{{bad").unwrap_err();
        let err: DeviceError = HueError::PayloadParse(json_err).into();
        assert!(matches!(err, DeviceError::Malformed(_)));
    }
}
