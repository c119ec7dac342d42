//! Error taxonomy shared across the workspace.
//!
//! Each IO boundary has its own typed error. Adapters define richer errors
//! internally and convert into these at the port boundary, so the automation
//! core only ever reasons about the kind of failure, never the transport.

use crate::light::LightName;

/// Boxed source error carried across port boundaries.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The daylight source could not produce a sunrise/sunset window.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// The upstream service could not be reached or answered with an HTTP error.
    #[error("daylight source unreachable")]
    Transport(#[source] BoxError),

    /// The upstream service answered but reported a failure.
    #[error("daylight source reported status {status}")]
    Upstream {
        /// Status string reported by the service.
        status: String,
    },

    /// The upstream answer could not be decoded.
    #[error("daylight source returned malformed data")]
    Malformed(#[source] BoxError),
}

/// The light hub could not answer a query or accept a command.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// The hub could not be reached or answered with an HTTP error.
    #[error("light hub unreachable")]
    Unreachable(#[source] BoxError),

    /// The hub answered with an explicit error.
    #[error("light hub rejected request: {description} (type {kind})")]
    Rejected {
        /// Hub-specific error code.
        kind: u32,
        /// Human-readable description from the hub.
        description: String,
    },

    /// The hub answered with a body that could not be decoded.
    #[error("light hub returned malformed data")]
    Malformed(#[source] BoxError),
}

/// A single light failed to accept a state change.
#[derive(Debug, thiserror::Error)]
#[error("light {light} did not accept the command")]
pub struct CommandError {
    /// The light that failed.
    pub light: LightName,
    /// Why it failed.
    #[source]
    pub source: DeviceError,
}

/// The notification source stopped delivering events abnormally.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    /// Reading from the underlying transport failed.
    #[error("notification transport failed")]
    Transport(#[source] BoxError),

    /// The consumer side of the event channel has gone away.
    #[error("detection consumer closed")]
    Closed,
}

/// Domain validation failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// A light name was empty or whitespace only.
    #[error("light name must not be empty")]
    EmptyLightName,

    /// A light group contained no light names.
    #[error("light group must contain at least one light")]
    EmptyLightGroup,

    /// The camera filter was empty or whitespace only.
    #[error("camera name must not be empty")]
    EmptyCameraName,

    /// The auto-off duration was zero.
    #[error("auto-off duration must be greater than zero")]
    ZeroDuration,

    /// The auto-off duration exceeded [`MAX_ON_DURATION`](crate::automation::MAX_ON_DURATION).
    #[error("auto-off duration of {}s exceeds the maximum of {}s", .0.as_secs(), crate::automation::MAX_ON_DURATION.as_secs())]
    DurationTooLong(std::time::Duration),

    /// Latitude outside `[-90, 90]`.
    #[error("latitude {0} is out of range [-90, 90]")]
    LatitudeOutOfRange(f64),

    /// No coordinate was supplied.
    #[error("a coordinate is required")]
    MissingCoordinate,

    /// Longitude outside `[-180, 180]`.
    #[error("longitude {0} is out of range [-180, 180]")]
    LongitudeOutOfRange(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_upstream_status() {
        let err = LookupError::Upstream {
            status: "INVALID_REQUEST".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "daylight source reported status INVALID_REQUEST"
        );
    }

    #[test]
    fn should_display_rejected_hub_error() {
        let err = DeviceError::Rejected {
            kind: 1,
            description: "unauthorized user".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "light hub rejected request: unauthorized user (type 1)"
        );
    }

    #[test]
    fn should_keep_device_error_as_command_error_source() {
        use std::error::Error as _;

        let err = CommandError {
            light: LightName::new("Porch").unwrap(),
            source: DeviceError::Unreachable(Box::new(std::io::Error::other("timeout"))),
        };
        assert_eq!(err.to_string(), "light Porch did not accept the command");
        assert_eq!(err.source().unwrap().to_string(), "light hub unreachable");
    }

    #[test]
    fn should_display_coordinate_out_of_range() {
        let err = ValidationError::LatitudeOutOfRange(91.0);
        assert_eq!(err.to_string(), "latitude 91 is out of range [-90, 90]");
    }
}
