use serde::{Deserialize, Serialize};

use crate::PartId;

/// Version number of a stored part, used for optimistic concurrency control.
///
/// A part is inserted at version 0 and every successful update increments
/// the version by 1.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Version(i64);

impl Version {
    /// Creates a new version from a raw value.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the version (0) assigned to a freshly inserted part.
    pub fn initial() -> Self {
        Self(0)
    }

    /// Returns the next version.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Returns the raw version value.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Version {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Version> for i64 {
    fn from(version: Version) -> Self {
        version.0
    }
}

/// A part held in the warehouse, together with its current quantity.
///
/// The version is internal bookkeeping and is never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub id: PartId,
    pub quantity: i64,
    #[serde(skip)]
    pub version: Version,
}

impl Part {
    /// Creates a new, not yet stored part with zero quantity.
    pub fn new(id: PartId) -> Self {
        Self {
            id,
            quantity: 0,
            version: Version::initial(),
        }
    }

    /// Returns a copy of this part carrying a different quantity.
    pub fn with_quantity(&self, quantity: i64) -> Self {
        Self {
            id: self.id.clone(),
            quantity,
            version: self.version,
        }
    }
}
