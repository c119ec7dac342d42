//! Daylight — where the lights are, and when the sun is up there.

use std::fmt;

use crate::error::ValidationError;
use crate::time::Timestamp;

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Build a coordinate, checking both axes are in range.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::LatitudeOutOfRange`] or
    /// [`ValidationError::LongitudeOutOfRange`] for values outside the globe
    /// (NaN included).
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ValidationError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ValidationError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(ValidationError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    #[must_use]
    pub fn latitude(self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub fn longitude(self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4},{:.4}", self.latitude, self.longitude)
    }
}

/// Sunrise and sunset for one day at one place.
///
/// Never cached: callers fetch a fresh window for every decision so that day
/// rollover and DST changes need no bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaylightWindow {
    pub sunrise: Timestamp,
    pub sunset: Timestamp,
}

impl DaylightWindow {
    #[must_use]
    pub fn new(sunrise: Timestamp, sunset: Timestamp) -> Self {
        Self { sunrise, sunset }
    }

    /// Whether `now` falls strictly between sunrise and sunset.
    #[must_use]
    pub fn is_daytime_at(&self, now: Timestamp) -> bool {
        self.sunrise < now && now < self.sunset
    }

    /// Whether it is dark enough to light at `now`.
    ///
    /// The window is open on both ends, so the exact sunrise and sunset
    /// instants count as dark.
    #[must_use]
    pub fn is_dark_at(&self, now: Timestamp) -> bool {
        !self.is_daytime_at(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone, Utc};

    fn window() -> DaylightWindow {
        DaylightWindow::new(
            Utc.with_ymd_and_hms(2024, 3, 1, 6, 30, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 1, 18, 15, 0).unwrap(),
        )
    }

    #[test]
    fn should_be_dark_before_sunrise() {
        let w = window();
        assert!(w.is_dark_at(w.sunrise - TimeDelta::seconds(1)));
    }

    #[test]
    fn should_be_light_between_sunrise_and_sunset() {
        let w = window();
        assert!(!w.is_dark_at(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()));
    }

    #[test]
    fn should_be_dark_after_sunset() {
        let w = window();
        assert!(w.is_dark_at(w.sunset + TimeDelta::seconds(1)));
    }

    #[test]
    fn should_treat_exact_sunrise_as_dark() {
        let w = window();
        assert!(w.is_dark_at(w.sunrise));
    }

    #[test]
    fn should_treat_exact_sunset_as_dark() {
        let w = window();
        assert!(w.is_dark_at(w.sunset));
    }

    #[test]
    fn should_accept_valid_coordinate() {
        let c = Coordinate::new(52.37, 4.89).unwrap();
        assert!((c.latitude() - 52.37).abs() < f64::EPSILON);
        assert!((c.longitude() - 4.89).abs() < f64::EPSILON);
    }

    #[test]
    fn should_reject_latitude_out_of_range() {
        assert_eq!(
            Coordinate::new(90.5, 0.0),
            Err(ValidationError::LatitudeOutOfRange(90.5))
        );
    }

    #[test]
    fn should_reject_longitude_out_of_range() {
        assert_eq!(
            Coordinate::new(0.0, -181.0),
            Err(ValidationError::LongitudeOutOfRange(-181.0))
        );
    }

    #[test]
    fn should_reject_nan() {
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
    }
}
