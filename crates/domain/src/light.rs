//! Lights — names, groups, and the hub-side description of a light.
//!
//! The automation addresses lights by their human-facing name. The hub
//! addresses them by its own identifiers; [`LightInfo`] pairs the two.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Name of a light as shown by the hub (e.g. `"Porch"`).
///
/// Always trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LightName(String);

impl LightName {
    /// Build a light name, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyLightName`] if nothing is left after trimming.
    pub fn new(name: impl AsRef<str>) -> Result<Self, ValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyLightName);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Borrow the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for LightName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LightName> for String {
    fn from(value: LightName) -> Self {
        value.0
    }
}

impl fmt::Display for LightName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hub-assigned identifier of a light (e.g. `"3"` on a Hue bridge).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LightId(String);

impl LightId {
    /// Wrap a hub identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A light known to the hub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightInfo {
    pub id: LightId,
    pub name: LightName,
}

/// The set of lights the automation drives together.
///
/// Order is irrelevant and duplicates collapse. A group is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightGroup {
    names: BTreeSet<LightName>,
}

impl LightGroup {
    /// Build a group from individual names.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyLightGroup`] if `names` is empty.
    pub fn new(names: impl IntoIterator<Item = LightName>) -> Result<Self, ValidationError> {
        let names: BTreeSet<_> = names.into_iter().collect();
        if names.is_empty() {
            return Err(ValidationError::EmptyLightGroup);
        }
        Ok(Self { names })
    }

    /// Parse a comma-separated list such as `"Porch, Driveway,Garden"`.
    ///
    /// Blank entries are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyLightGroup`] if no non-blank entry remains.
    pub fn parse_list(list: &str) -> Result<Self, ValidationError> {
        let names = list
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(LightName::new)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(names)
    }

    /// Whether `name` belongs to this group.
    #[must_use]
    pub fn contains(&self, name: &LightName) -> bool {
        self.names.contains(name)
    }

    /// Iterate over the member names.
    pub fn iter(&self) -> impl Iterator<Item = &LightName> {
        self.names.iter()
    }

    /// Number of member names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always `false`; a group is non-empty by construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl fmt::Display for LightGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for name in &self.names {
            if !first {
                f.write_str(", ")?;
            }
            f.write_str(name.as_str())?;
            first = false;
        }
        Ok(())
    }
}
