//! # porchlight-adapter-sunrise-sunset
//!
//! Daylight oracle backed by the free [sunrise-sunset.org] JSON API.
//!
//! Each lookup requests the window for the local solar date at the
//! coordinate with `formatted=0`, so sunrise and sunset come back as
//! RFC 3339 instants. Nothing is cached: the core asks once per human
//! detection.
//!
//! [sunrise-sunset.org]: https://sunrise-sunset.org/api

mod config;
mod error;

pub use config::{DEFAULT_BASE_URL, SunriseSunsetConfig};
pub use error::SunriseSunsetError;

use std::time::Duration;

use chrono::{DateTime, FixedOffset, Utc};
use serde::Deserialize;

use porchlight_app::ports::DaylightOracle;
use porchlight_domain::daylight::{Coordinate, DaylightWindow};
use porchlight_domain::error::LookupError;
use porchlight_domain::time::{Timestamp, solar_date};

#[derive(Debug, Deserialize)]
struct Envelope {
    status: String,
    #[serde(default)]
    results: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct Times {
    sunrise: DateTime<FixedOffset>,
    sunset: DateTime<FixedOffset>,
}

/// Decode an API answer into a [`DaylightWindow`].
///
/// # Errors
///
/// Returns [`SunriseSunsetError::Api`] when `status` is not `OK` and
/// [`SunriseSunsetError::PayloadParse`] when the body or its timestamps
/// cannot be decoded.
pub fn parse_window(body: &[u8]) -> Result<DaylightWindow, SunriseSunsetError> {
    let envelope: Envelope =
        serde_json::from_slice(body).map_err(SunriseSunsetError::PayloadParse)?;
    if envelope.status != "OK" {
        return Err(SunriseSunsetError::Api(envelope.status));
    }
    let times: Times =
        serde_json::from_value(envelope.results).map_err(SunriseSunsetError::PayloadParse)?;
    Ok(DaylightWindow::new(
        times.sunrise.with_timezone(&Utc),
        times.sunset.with_timezone(&Utc),
    ))
}

/// [`DaylightOracle`] querying sunrise-sunset.org over HTTP.
#[derive(Debug, Clone)]
pub struct SunriseSunsetOracle {
    client: reqwest::Client,
    base_url: String,
}

impl SunriseSunsetOracle {
    /// # Errors
    ///
    /// Returns [`SunriseSunsetError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &SunriseSunsetConfig) -> Result<Self, SunriseSunsetError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(u64::from(config.timeout_secs)))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    async fn fetch(
        &self,
        coordinate: Coordinate,
        now: Timestamp,
    ) -> Result<DaylightWindow, SunriseSunsetError> {
        let date = solar_date(now, coordinate.longitude());
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("lat", coordinate.latitude().to_string()),
                ("lng", coordinate.longitude().to_string()),
                ("formatted", "0".to_string()),
                ("date", date.to_string()),
            ])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SunriseSunsetError::Status(status.as_u16()));
        }
        let body = response.bytes().await?;
        let window = parse_window(&body)?;
        tracing::debug!(
            %coordinate,
            %date,
            sunrise = %window.sunrise,
            sunset = %window.sunset,
            "fetched daylight window"
        );
        Ok(window)
    }
}

impl DaylightOracle for SunriseSunsetOracle {
    async fn window(
        &self,
        coordinate: Coordinate,
        now: Timestamp,
    ) -> Result<DaylightWindow, LookupError> {
        Ok(self.fetch(coordinate, now).await?)
    }
}
