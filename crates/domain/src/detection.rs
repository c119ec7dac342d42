//! Detection — a camera notification classified by what triggered it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::id::DetectionId;
use crate::time::{Timestamp, now};

/// What the camera believes triggered the notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectType {
    Human,
    Vehicle,
    Animal,
    Package,
    Other,
    #[default]
    #[serde(other)]
    Unknown,
}

impl SubjectType {
    /// Only people switch the lights on.
    #[must_use]
    pub fn is_human(self) -> bool {
        matches!(self, Self::Human)
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Human => "human",
            Self::Vehicle => "vehicle",
            Self::Animal => "animal",
            Self::Package => "package",
            Self::Other => "other",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SubjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubjectType {
    type Err = std::convert::Infallible;

    /// Lenient parse: anything unrecognised becomes [`SubjectType::Unknown`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "human" | "person" => Self::Human,
            "vehicle" | "car" => Self::Vehicle,
            "animal" => Self::Animal,
            "package" | "package_delivery" => Self::Package,
            "other" | "other_motion" | "motion" => Self::Other,
            _ => Self::Unknown,
        })
    }
}

/// A single notification from the watched camera.
///
/// Consumed exactly once by the automation and never retained.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionEvent {
    pub id: DetectionId,
    /// Display name of the camera that raised the notification.
    pub camera: String,
    pub subject: SubjectType,
    pub timestamp: Timestamp,
}

impl DetectionEvent {
    /// A detection that happened just now.
    #[must_use]
    pub fn new(camera: impl Into<String>, subject: SubjectType) -> Self {
        Self::at(camera, subject, now())
    }

    /// A detection that happened at `timestamp`.
    #[must_use]
    pub fn at(camera: impl Into<String>, subject: SubjectType, timestamp: Timestamp) -> Self {
        Self {
            id: DetectionId::new(),
            camera: camera.into(),
            subject,
            timestamp,
        }
    }
}
