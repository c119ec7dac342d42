//! Daylight port — sunrise/sunset lookups for the daylight gate.

use std::future::Future;
use std::sync::Arc;

use porchlight_domain::daylight::{Coordinate, DaylightWindow};
use porchlight_domain::error::LookupError;
use porchlight_domain::time::Timestamp;

/// Answers whether it is dark at a place and instant.
///
/// Implementations fetch a fresh [`DaylightWindow`] on every call and never
/// retry; the caller decides what an unknown answer means.
pub trait DaylightOracle: Send + Sync {
    /// Sunrise and sunset for the day containing `now` at `coordinate`.
    fn window(
        &self,
        coordinate: Coordinate,
        now: Timestamp,
    ) -> impl Future<Output = Result<DaylightWindow, LookupError>> + Send;

    /// Whether it is dark enough to light at `coordinate` and `now`.
    fn is_dark(
        &self,
        coordinate: Coordinate,
        now: Timestamp,
    ) -> impl Future<Output = Result<bool, LookupError>> + Send {
        async move {
            let window = self.window(coordinate, now).await?;
            Ok(window.is_dark_at(now))
        }
    }
}

impl<T: DaylightOracle> DaylightOracle for Arc<T> {
    fn window(
        &self,
        coordinate: Coordinate,
        now: Timestamp,
    ) -> impl Future<Output = Result<DaylightWindow, LookupError>> + Send {
        (**self).window(coordinate, now)
    }
}
