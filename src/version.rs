//! Subject version identifiers

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Largest version number the registry accepts (2^31 - 1)
pub const MAX_VERSION: u32 = i32::MAX as u32;

/// Literal used on the wire for the newest version of a subject
pub const LATEST: &str = "latest";

/// A concrete version of a subject, in `1..=2^31-1`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct VersionNumber(u32);

impl VersionNumber {
    /// Create a version number, rejecting anything outside `1..=2^31-1`
    pub fn new(version: i64) -> Result<Self, ValidationError> {
        if version < 1 || version > i64::from(MAX_VERSION) {
            return Err(ValidationError::InvalidVersion(version.to_string()));
        }
        Ok(Self(version as u32))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for VersionNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = i64::deserialize(deserializer)?;
        VersionNumber::new(raw).map_err(serde::de::Error::custom)
    }
}

/// A version selector: either a concrete version or the moving `latest` pointer
///
/// Only [`VersionNumber`] addresses a cache entry, so `Latest` can never be cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionId {
    Latest,
    Number(VersionNumber),
}

impl VersionId {
    /// Parse `"latest"` or a decimal version number
    pub fn parse(version: &str) -> Result<Self, ValidationError> {
        let version = version.trim();
        if version == LATEST {
            return Ok(VersionId::Latest);
        }
        let number: i64 = version
            .parse()
            .map_err(|_| ValidationError::InvalidVersion(version.to_string()))?;
        Ok(VersionId::Number(VersionNumber::new(number)?))
    }

    /// Create a concrete version selector
    pub fn number(version: i64) -> Result<Self, ValidationError> {
        VersionNumber::new(version).map(VersionId::Number)
    }

    /// The concrete version, or `None` for `latest`
    pub fn as_number(self) -> Option<VersionNumber> {
        match self {
            VersionId::Latest => None,
            VersionId::Number(n) => Some(n),
        }
    }

    pub fn is_latest(self) -> bool {
        matches!(self, VersionId::Latest)
    }
}

impl From<VersionNumber> for VersionId {
    fn from(number: VersionNumber) -> Self {
        VersionId::Number(number)
    }
}

impl FromStr for VersionId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VersionId::parse(s)
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionId::Latest => f.write_str(LATEST),
            VersionId::Number(n) => write!(f, "{}", n),
        }
    }
}

impl Serialize for VersionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            VersionId::Latest => serializer.serialize_str(LATEST),
            VersionId::Number(n) => n.serialize(serializer),
        }
    }
}
