//! Time and timestamp helpers.

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};

/// UTC timestamp used for detection times and daylight windows.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Calendar date at `longitude` for the instant `at`, using mean solar time.
///
/// The sun moves 15° per hour, so every degree east of Greenwich shifts the
/// local clock by four minutes. This keeps "today" anchored to the place
/// being lit instead of to UTC.
#[must_use]
pub fn solar_date(at: Timestamp, longitude: f64) -> NaiveDate {
    // |longitude| <= 180 so the offset always fits in ±12h.
    #[allow(clippy::cast_possible_truncation)]
    let offset = TimeDelta::seconds((longitude * 240.0).round() as i64);
    (at + offset).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn should_return_current_utc_time() {
        let before = Utc::now();
        let ts = now();
        let after = Utc::now();
        assert!(ts >= before);
        assert!(ts <= after);
    }

    #[test]
    fn should_keep_utc_date_on_greenwich_meridian() {
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 23, 30, 0).unwrap();
        assert_eq!(solar_date(at, 0.0), NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    }

    #[test]
    fn should_roll_back_a_day_far_west() {
        // 02:00 UTC is 18:00 local mean time at 120°W.
        let at = Utc.with_ymd_and_hms(2024, 6, 2, 2, 0, 0).unwrap();
        assert_eq!(
            solar_date(at, -120.0),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
        );
    }

    #[test]
    fn should_roll_forward_a_day_far_east() {
        // 20:00 UTC is 05:00 local mean time at 135°E.
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 20, 0, 0).unwrap();
        assert_eq!(
            solar_date(at, 135.0),
            NaiveDate::from_ymd_opt(2024, 6, 2).unwrap()
        );
    }
}
