//! Automation settings — the fixed parameters of the presence-lighting rule.
//!
//! One camera drives one light group. The rule only acts when a human is
//! detected by that camera while it is dark at [`Coordinate`], and leaves the
//! lights on for [`on_duration`](AutomationSettings::on_duration) after the
//! last such detection.

use std::time::Duration;

use crate::daylight::Coordinate;
use crate::error::ValidationError;
use crate::light::LightGroup;

/// Longest accepted auto-off duration (one day).
pub const MAX_ON_DURATION: Duration = Duration::from_secs(24 * 60 * 60);

/// Validated, immutable configuration for the automation.
#[derive(Debug, Clone, PartialEq)]
pub struct AutomationSettings {
    camera: String,
    lights: LightGroup,
    on_duration: Duration,
    coordinate: Coordinate,
}

impl AutomationSettings {
    /// Create a builder.
    #[must_use]
    pub fn builder() -> AutomationSettingsBuilder {
        AutomationSettingsBuilder::default()
    }

    /// Name of the camera whose detections are acted upon.
    #[must_use]
    pub fn camera(&self) -> &str {
        &self.camera
    }

    /// Whether a detection from `camera` should be considered.
    ///
    /// This is deliberately looser than an exact string match: ASCII case and
    /// surrounding whitespace in the reported name are ignored, so `"front
    /// door "` matches a configured `"Front Door"`.
    #[must_use]
    pub fn watches(&self, camera: &str) -> bool {
        self.camera.eq_ignore_ascii_case(camera.trim())
    }

    #[must_use]
    pub fn lights(&self) -> &LightGroup {
        &self.lights
    }

    /// How long lights stay on after the last human detection.
    #[must_use]
    pub fn on_duration(&self) -> Duration {
        self.on_duration
    }

    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }
}

/// Builder for [`AutomationSettings`].
#[derive(Debug, Default)]
pub struct AutomationSettingsBuilder {
    camera: Option<String>,
    lights: Option<LightGroup>,
    on_duration: Option<Duration>,
    coordinate: Option<Coordinate>,
}

impl AutomationSettingsBuilder {
    #[must_use]
    pub fn camera(mut self, camera: impl Into<String>) -> Self {
        self.camera = Some(camera.into());
        self
    }

    #[must_use]
    pub fn lights(mut self, lights: LightGroup) -> Self {
        self.lights = Some(lights);
        self
    }

    #[must_use]
    pub fn on_duration(mut self, on_duration: Duration) -> Self {
        self.on_duration = Some(on_duration);
        self
    }

    #[must_use]
    pub fn coordinate(mut self, coordinate: Coordinate) -> Self {
        self.coordinate = Some(coordinate);
        self
    }

    /// Validate and build.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the camera name is blank, the light
    /// group or coordinate is missing, or the duration is zero, missing or
    /// longer than [`MAX_ON_DURATION`].
    pub fn build(self) -> Result<AutomationSettings, ValidationError> {
        let camera = self
            .camera
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or(ValidationError::EmptyCameraName)?;
        let lights = self.lights.ok_or(ValidationError::EmptyLightGroup)?;
        let on_duration = self
            .on_duration
            .filter(|d| !d.is_zero())
            .ok_or(ValidationError::ZeroDuration)?;
        if on_duration > MAX_ON_DURATION {
            return Err(ValidationError::DurationTooLong(on_duration));
        }
        let coordinate = self.coordinate.ok_or(ValidationError::MissingCoordinate)?;

        Ok(AutomationSettings {
            camera,
            lights,
            on_duration,
            coordinate,
        })
    }
}
