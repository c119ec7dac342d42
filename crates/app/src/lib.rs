//! # porchlight-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `DaylightOracle` — sunrise/sunset window for a coordinate
//!   - `LightBridge` — list, query and command the lights of a hub
//!   - `NotificationSource` — push camera detections into the core
//! - Provide the **light-group controller** (aggregate query, best-effort fan-out)
//! - Provide the **off-timer** (cancellable, token-identified scheduled turn-off)
//! - Provide the **presence automation** state machine and the
//!   **dispatcher** that serialises every input onto one consumer
//!
//! ## Dependency rule
//! Depends on `porchlight-domain` only (plus `tokio` for channels and timers).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod automation;
pub mod dispatcher;
pub mod ports;
pub mod services;
pub mod timer;
