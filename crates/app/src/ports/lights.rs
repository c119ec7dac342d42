//! Light bridge port — the hub that owns the physical lights.

use std::future::Future;
use std::sync::Arc;

use porchlight_domain::error::DeviceError;
use porchlight_domain::light::{LightId, LightInfo};

/// A light hub (Hue bridge, virtual hub, …).
///
/// Stateless from the core's perspective: every call reflects the hub's
/// current view of its lights.
pub trait LightBridge: Send + Sync {
    /// List every light the hub knows about.
    fn lights(&self) -> impl Future<Output = Result<Vec<LightInfo>, DeviceError>> + Send;

    /// Whether the light currently reports on.
    fn is_on(&self, id: &LightId) -> impl Future<Output = Result<bool, DeviceError>> + Send;

    /// Switch one light on or off.
    fn set_on(
        &self,
        id: &LightId,
        on: bool,
    ) -> impl Future<Output = Result<(), DeviceError>> + Send;
}

impl<T: LightBridge> LightBridge for Arc<T> {
    fn lights(&self) -> impl Future<Output = Result<Vec<LightInfo>, DeviceError>> + Send {
        (**self).lights()
    }

    fn is_on(&self, id: &LightId) -> impl Future<Output = Result<bool, DeviceError>> + Send {
        (**self).is_on(id)
    }

    fn set_on(
        &self,
        id: &LightId,
        on: bool,
    ) -> impl Future<Output = Result<(), DeviceError>> + Send {
        (**self).set_on(id, on)
    }
}

impl<T: LightBridge> LightBridge for &T {
    fn lights(&self) -> impl Future<Output = Result<Vec<LightInfo>, DeviceError>> + Send {
        (**self).lights()
    }

    fn is_on(&self, id: &LightId) -> impl Future<Output = Result<bool, DeviceError>> + Send {
        (**self).is_on(id)
    }

    fn set_on(
        &self,
        id: &LightId,
        on: bool,
    ) -> impl Future<Output = Result<(), DeviceError>> + Send {
        (**self).set_on(id, on)
    }
}
