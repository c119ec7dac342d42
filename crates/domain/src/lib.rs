//! # porchlight-domain
//!
//! Pure domain model for the porchlight presence-lighting daemon.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error taxonomy, timestamps
//! - Define **detections** (camera notifications classified by subject)
//! - Define **lights** (names, groups, bridge-side light descriptors)
//! - Define **daylight** (coordinates and the sunrise/sunset window)
//! - Define the **automation settings** the state machine runs with
//! - Contain all invariant enforcement and validation
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod automation;
pub mod daylight;
pub mod detection;
pub mod light;
