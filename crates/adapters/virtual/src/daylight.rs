//! Virtual daylight oracle.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use chrono::TimeDelta;

use porchlight_app::ports::DaylightOracle;
use porchlight_domain::daylight::{Coordinate, DaylightWindow};
use porchlight_domain::error::LookupError;
use porchlight_domain::time::Timestamp;

/// What [`FixedDaylight`] answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sky {
    #[default]
    Dark,
    Daytime,
    /// Every lookup fails.
    Outage,
}

/// [`DaylightOracle`] that answers whatever it is told, regardless of place
/// or time.
#[derive(Debug, Default)]
pub struct FixedDaylight {
    sky: Mutex<Sky>,
    lookups: AtomicUsize,
}

impl FixedDaylight {
    #[must_use]
    pub fn new(sky: Sky) -> Self {
        Self {
            sky: Mutex::new(sky),
            lookups: AtomicUsize::new(0),
        }
    }

    pub fn set(&self, sky: Sky) {
        *self.sky.lock().unwrap_or_else(PoisonError::into_inner) = sky;
    }

    #[must_use]
    pub fn sky(&self) -> Sky {
        *self.sky.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of lookups answered so far, failed ones included.
    #[must_use]
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }
}

impl DaylightOracle for FixedDaylight {
    async fn window(
        &self,
        _coordinate: Coordinate,
        now: Timestamp,
    ) -> Result<DaylightWindow, LookupError> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        let hour = TimeDelta::hours(1);
        match self.sky() {
            // Before today's sunrise.
            Sky::Dark => Ok(DaylightWindow::new(now + hour, now + hour * 12)),
            Sky::Daytime => Ok(DaylightWindow::new(now - hour, now + hour)),
            Sky::Outage => Err(LookupError::Upstream {
                status: "VIRTUAL_OUTAGE".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use porchlight_domain::time::now;

    fn here() -> Coordinate {
        Coordinate::new(0.0, 0.0).unwrap()
    }

    #[tokio::test]
    async fn should_default_to_dark() {
        assert!(FixedDaylight::default().is_dark(here(), now()).await.unwrap());
    }

    #[tokio::test]
    async fn should_answer_daytime() {
        let oracle = FixedDaylight::new(Sky::Daytime);
        assert!(!oracle.is_dark(here(), now()).await.unwrap());
    }

    #[tokio::test]
    async fn should_fail_during_outage() {
        let oracle = FixedDaylight::new(Sky::Outage);
        let result = oracle.is_dark(here(), now()).await;
        assert!(matches!(result, Err(LookupError::Upstream { .. })));
    }

    #[tokio::test]
    async fn should_follow_changes_and_count_lookups() {
        let oracle = FixedDaylight::new(Sky::Daytime);
        assert!(!oracle.is_dark(here(), now()).await.unwrap());
        oracle.set(Sky::Dark);
        assert!(oracle.is_dark(here(), now()).await.unwrap());
        assert_eq!(oracle.sky(), Sky::Dark);
        assert_eq!(oracle.lookups(), 2);
    }
}
