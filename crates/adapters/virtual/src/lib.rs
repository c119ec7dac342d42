//! # porchlight-adapter-virtual
//!
//! Simulated collaborators for demo mode and tests.
//!
//! | Adapter | Port | Behaviour |
//! |---------|------|-----------|
//! | [`VirtualBridge`] | `LightBridge` | Named in-memory lights; manual flips, outages and per-light failures on demand; records every command |
//! | [`FixedDaylight`] | `DaylightOracle` | Answers dark, daytime or outage as told |
//! | [`VirtualCamera`] | `NotificationSource` | Emits one detection of a fixed subject per interval |
//!
//! ## Dependency rule
//!
//! Depends on `porchlight-app` (port traits) and `porchlight-domain` only.

mod bridge;
mod camera;
mod daylight;

pub use bridge::{Command, VirtualBridge};
pub use camera::VirtualCamera;
pub use daylight::{FixedDaylight, Sky};
