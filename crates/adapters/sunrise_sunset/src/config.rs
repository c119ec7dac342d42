//! Sunrise-sunset adapter configuration.

use serde::Deserialize;

/// Public endpoint of the sunrise-sunset.org API.
pub const DEFAULT_BASE_URL: &str = "https://api.sunrise-sunset.org/json";

/// Configuration for the sunrise-sunset.org daylight oracle.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SunriseSunsetConfig {
    /// Endpoint queried for each lookup.
    pub base_url: String,
    /// Per-request timeout, in seconds.
    pub timeout_secs: u16,
}

impl Default for SunriseSunsetConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }
}
