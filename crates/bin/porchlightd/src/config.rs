//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `porchlight.toml` in the working directory, or at the path in
//! `PORCHLIGHT_CONFIG`. Every field has a default so the file is optional.
//! Environment variables take precedence over file values; `PORCHLIGHT_*`
//! variables take precedence over the legacy unprefixed ones.

use std::time::Duration;

use serde::Deserialize;

use porchlight_adapter_hue::HueConfig;
use porchlight_adapter_sunrise_sunset::SunriseSunsetConfig;
use porchlight_domain::automation::AutomationSettings;
use porchlight_domain::daylight::Coordinate;
use porchlight_domain::error::ValidationError;
use porchlight_domain::light::LightGroup;

/// Default config file name, relative to the working directory.
pub const DEFAULT_PATH: &str = "porchlight.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub automation: AutomationConfig,
    pub hue: HueConfig,
    pub daylight: SunriseSunsetConfig,
    pub logging: LoggingConfig,
    pub integrations: IntegrationsConfig,
}

/// What to watch, what to switch, and for how long.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AutomationConfig {
    /// Display name of the camera whose detections count.
    pub camera: String,
    /// Comma-separated light names.
    pub lights: String,
    /// How long lights stay on after the last human detection.
    pub on_duration_secs: u64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Detections that may queue while one is being handled.
    pub queue_capacity: usize,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Per-integration toggles.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct IntegrationsConfig {
    /// Replace the Hue bridge, the daylight API and stdin with virtual
    /// adapters.
    pub virtual_enabled: bool,
    /// Seconds between two virtual camera detections.
    pub virtual_camera_interval_secs: u64,
}

impl Config {
    /// Load configuration from the config file (if present) then apply
    /// environment-variable overrides and validate.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is unreadable or malformed,
    /// if an override does not parse, or if the result is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("PORCHLIGHT_CONFIG").unwrap_or_else(|_| DEFAULT_PATH.to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        let var = |keys: &[&'static str]| first_set(&lookup, keys);

        if let Some((_, val)) = var(&["PORCHLIGHT_CAMERA", "RING_CAMERA_NAME"]) {
            self.automation.camera = val;
        }
        if let Some((_, val)) = var(&["PORCHLIGHT_LIGHTS", "HUE_LIGHTS"]) {
            self.automation.lights = val;
        }
        if let Some((key, val)) = var(&["PORCHLIGHT_ON_DURATION_SECS", "LIGHT_ON_TIME"]) {
            self.automation.on_duration_secs = parse(key, &val)?;
        }
        if let Some((key, val)) = var(&["PORCHLIGHT_LATITUDE", "LATITUDE"]) {
            self.automation.latitude = Some(parse(key, &val)?);
        }
        if let Some((key, val)) = var(&["PORCHLIGHT_LONGITUDE", "LONGITUDE"]) {
            self.automation.longitude = Some(parse(key, &val)?);
        }
        if let Some((_, val)) = var(&["PORCHLIGHT_HUE_HOST", "HUE_HOST"]) {
            self.hue.host = val;
        }
        if let Some((_, val)) = var(&["PORCHLIGHT_HUE_USERNAME", "HUE_USERNAME"]) {
            self.hue.username = val;
        }
        if let Some((_, val)) = var(&["PORCHLIGHT_DAYLIGHT_URL"]) {
            self.daylight.base_url = val;
        }
        if let Some((key, val)) = var(&["PORCHLIGHT_VIRTUAL"]) {
            self.integrations.virtual_enabled = parse(key, &val)?;
        }
        if let Some((_, val)) = var(&["PORCHLIGHT_LOG", "RUST_LOG"]) {
            self.logging.filter = val;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.settings()?;
        if self.automation.queue_capacity == 0 {
            return Err(ConfigError::Validation(
                "queue_capacity must be non-zero".to_string(),
            ));
        }
        if self.integrations.virtual_enabled {
            if self.integrations.virtual_camera_interval_secs == 0 {
                return Err(ConfigError::Validation(
                    "virtual_camera_interval_secs must be non-zero".to_string(),
                ));
            }
        } else {
            if self.hue.host.trim().is_empty() {
                return Err(ConfigError::Validation("hue.host is required".to_string()));
            }
            if self.hue.username.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "hue.username is required".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Build the validated automation settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Settings`] for an empty camera name or light
    /// list, a zero duration, or a missing or out-of-range coordinate.
    pub fn settings(&self) -> Result<AutomationSettings, ConfigError> {
        let automation = &self.automation;
        let mut builder = AutomationSettings::builder()
            .camera(automation.camera.clone())
            .lights(LightGroup::parse_list(&automation.lights)?)
            .on_duration(Duration::from_secs(automation.on_duration_secs));
        if let (Some(latitude), Some(longitude)) = (automation.latitude, automation.longitude) {
            builder = builder.coordinate(Coordinate::new(latitude, longitude)?);
        }
        Ok(builder.build()?)
    }

    /// Interval between virtual camera detections.
    #[must_use]
    pub fn virtual_camera_interval(&self) -> Duration {
        Duration::from_secs(self.integrations.virtual_camera_interval_secs)
    }
}

/// First of `keys` that is set, with its value.
fn first_set(
    lookup: &impl Fn(&str) -> Option<String>,
    keys: &[&'static str],
) -> Option<(&'static str, String)> {
    keys.iter().find_map(|key| lookup(key).map(|val| (*key, val)))
}

fn parse<T: std::str::FromStr>(key: &str, val: &str) -> Result<T, ConfigError> {
    val.trim().parse().map_err(|_| ConfigError::Override {
        key: key.to_string(),
        value: val.to_string(),
    })
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            camera: String::new(),
            lights: String::new(),
            on_duration_secs: 300,
            latitude: None,
            longitude: None,
            queue_capacity: 32,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "porchlightd=info,porchlight=info".to_string(),
        }
    }
}

impl Default for IntegrationsConfig {
    fn default() -> Self {
        Self {
            virtual_enabled: false,
            virtual_camera_interval_secs: 45,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// An environment override could not be parsed.
    #[error("environment variable {key} has invalid value {value:?}")]
    Override { key: String, value: String },
    /// The automation settings are invalid.
    #[error("invalid automation settings")]
    Settings(#[from] ValidationError),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn complete() -> Config {
        toml::from_str(
            "
            [automation]
            camera = 'Front Door'
            lights = 'Porch, Driveway'
            on_duration_secs = 120
            latitude = 52.37
            longitude = 4.89

            [hue]
            host = '192.168.1.20'
            username = 'abcdef'
            ",
        )
        .unwrap()
    }

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.automation.on_duration_secs, 300);
        assert_eq!(config.automation.queue_capacity, 32);
        assert!(config.automation.latitude.is_none());
        assert_eq!(config.hue.timeout_secs, 10);
        assert_eq!(
            config.daylight.base_url,
            "https://api.sunrise-sunset.org/json"
        );
        assert!(!config.integrations.virtual_enabled);
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.automation.on_duration_secs, 300);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [automation]
            camera = 'Front Door'
            lights = 'Porch,Driveway'
            on_duration_secs = 90
            latitude = 52.37
            longitude = 4.89
            queue_capacity = 4

            [hue]
            host = 'bridge.local'
            username = 'abc'
            timeout_secs = 3

            [daylight]
            base_url = 'http://localhost:8080/json'

            [logging]
            filter = 'debug'

            [integrations]
            virtual_enabled = true
            virtual_camera_interval_secs = 10
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.automation.camera, "Front Door");
        assert_eq!(config.automation.queue_capacity, 4);
        assert_eq!(config.hue.host, "bridge.local");
        assert_eq!(config.hue.timeout_secs, 3);
        assert_eq!(config.daylight.base_url, "http://localhost:8080/json");
        assert_eq!(config.logging.filter, "debug");
        assert!(config.integrations.virtual_enabled);
        assert_eq!(config.virtual_camera_interval(), Duration::from_secs(10));
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.automation.on_duration_secs, 300);
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }

    #[test]
    fn should_build_settings_from_complete_config() {
        let settings = complete().settings().unwrap();
        assert_eq!(settings.camera(), "Front Door");
        assert_eq!(settings.lights().len(), 2);
        assert_eq!(settings.on_duration(), Duration::from_secs(120));
        assert!((settings.coordinate().latitude() - 52.37).abs() < f64::EPSILON);
    }

    #[test]
    fn should_accept_complete_config() {
        assert!(complete().validate().is_ok());
    }

    #[test]
    fn should_apply_legacy_variables() {
        let mut config = Config::default();
        config
            .apply_overrides(env(&[
                ("RING_CAMERA_NAME", "Back Yard"),
                ("HUE_LIGHTS", "Garden,Shed"),
                ("LIGHT_ON_TIME", "45"),
                ("LATITUDE", "40.71"),
                ("LONGITUDE", "-74.01"),
                ("HUE_HOST", "10.0.0.2"),
                ("HUE_USERNAME", "legacy"),
            ]))
            .unwrap();

        assert_eq!(config.automation.camera, "Back Yard");
        assert_eq!(config.automation.lights, "Garden,Shed");
        assert_eq!(config.automation.on_duration_secs, 45);
        assert_eq!(config.automation.longitude, Some(-74.01));
        assert_eq!(config.hue.host, "10.0.0.2");
        assert_eq!(config.hue.username, "legacy");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_prefer_prefixed_variables_over_legacy() {
        let mut config = Config::default();
        config
            .apply_overrides(env(&[
                ("LIGHT_ON_TIME", "45"),
                ("PORCHLIGHT_ON_DURATION_SECS", "600"),
                ("RUST_LOG", "warn"),
                ("PORCHLIGHT_LOG", "trace"),
            ]))
            .unwrap();
        assert_eq!(config.automation.on_duration_secs, 600);
        assert_eq!(config.logging.filter, "trace");
    }

    #[test]
    fn should_override_file_values() {
        let mut config = complete();
        config
            .apply_overrides(env(&[("PORCHLIGHT_CAMERA", "Garage")]))
            .unwrap();
        assert_eq!(config.automation.camera, "Garage");
        assert_eq!(config.automation.lights, "Porch, Driveway");
    }

    #[test]
    fn should_reject_unparsable_override() {
        let mut config = Config::default();
        let err = config
            .apply_overrides(env(&[("LATITUDE", "north")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Override { ref key, .. } if key == "LATITUDE"));
    }

    #[test]
    fn should_reject_missing_coordinate() {
        let mut config = complete();
        config.automation.longitude = None;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Settings(ValidationError::MissingCoordinate))
        ));
    }

    #[test]
    fn should_reject_out_of_range_latitude() {
        let mut config = complete();
        config.automation.latitude = Some(95.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Settings(ValidationError::LatitudeOutOfRange(_)))
        ));
    }

    #[test]
    fn should_reject_empty_light_list() {
        let mut config = complete();
        config.automation.lights = " , ".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Settings(ValidationError::EmptyLightGroup))
        ));
    }

    #[test]
    fn should_reject_zero_duration() {
        let mut config = complete();
        config.automation.on_duration_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Settings(ValidationError::ZeroDuration))
        ));
    }

    #[test]
    fn should_reject_duration_too_long_for_the_clock() {
        let mut config = complete();
        config
            .apply_overrides(env(&[("LIGHT_ON_TIME", "18446744073709551615")]))
            .unwrap();
        assert_eq!(config.automation.on_duration_secs, u64::MAX);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Settings(ValidationError::DurationTooLong(_)))
        ));
    }

    #[test]
    fn should_require_hue_credentials_unless_virtual() {
        let mut config = complete();
        config.hue.username = String::new();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        config.integrations.virtual_enabled = true;
        assert!(config.validate().is_ok());
    }
}
