//! Hue bridge configuration.

use serde::Deserialize;

/// Configuration for the Hue bridge adapter.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HueConfig {
    /// Bridge address, either `host[:port]` or a full `scheme://host[:port]` URL.
    pub host: String,
    /// Whitelisted API username issued by the bridge.
    pub username: String,
    /// Per-request timeout, in seconds.
    pub timeout_secs: u16,
}

impl Default for HueConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            username: String::new(),
            timeout_secs: 10,
        }
    }
}

impl HueConfig {
    /// Root of the bridge REST API for the configured user.
    #[must_use]
    pub fn api_root(&self) -> String {
        let host = self.host.trim().trim_end_matches('/');
        if host.contains("://") {
            format!("{host}/api/{}", self.username)
        } else {
            format!("http://{host}/api/{}", self.username)
        }
    }
}
