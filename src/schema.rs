//! Schema value types
//!
//! Every type here is built through a validating constructor and never mutated
//! afterwards, so holding one is proof that the input was well formed.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::version::VersionNumber;

/// Globally unique id the registry assigns to a schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SchemaId(u32);

impl SchemaId {
    /// Create a schema id, rejecting anything outside `1..=2^31-1`
    pub fn new(id: i64) -> Result<Self, ValidationError> {
        if id < 1 || id > i64::from(i32::MAX) {
            return Err(ValidationError::InvalidSchemaId(id));
        }
        Ok(Self(id as u32))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for SchemaId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = i64::deserialize(deserializer)?;
        SchemaId::new(raw).map_err(serde::de::Error::custom)
    }
}

/// Schema definition text; always syntactically valid JSON
///
/// The original text is kept verbatim. [`RawSchema::canonical`] gives the
/// whitespace- and key-order-independent form used for content hashing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RawSchema(String);

impl RawSchema {
    /// Validate that `text` is JSON and wrap it
    pub fn parse(text: impl Into<String>) -> Result<Self, ValidationError> {
        let text = text.into();
        serde_json::from_str::<serde_json::Value>(&text)
            .map_err(|e| ValidationError::InvalidSchemaJson(e.to_string()))?;
        Ok(Self(text))
    }

    /// The schema text exactly as supplied
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compact JSON with object keys sorted
    pub fn canonical(&self) -> String {
        // parse() already proved the text is JSON
        match serde_json::from_str::<serde_json::Value>(&self.0) {
            Ok(value) => sorted(value).to_string(),
            Err(_) => self.0.clone(),
        }
    }
}

fn sorted(value: serde_json::Value) -> serde_json::Value {
    use serde_json::Value;
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(entries.into_iter().map(|(k, v)| (k, sorted(v))).collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sorted).collect()),
        other => other,
    }
}

impl fmt::Display for RawSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RawSchema {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RawSchema::parse(s)
    }
}

impl<'de> Deserialize<'de> for RawSchema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        RawSchema::parse(text).map_err(serde::de::Error::custom)
    }
}

/// Name of a subject: a versioned lineage of schemas
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SubjectName(String);

impl SubjectName {
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::BlankSubject);
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SubjectName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SubjectName::new(s)
    }
}

impl<'de> Deserialize<'de> for SubjectName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        SubjectName::new(name).map_err(serde::de::Error::custom)
    }
}

/// Rule governing which schema evolutions the registry accepts for a subject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompatibilityLevel {
    None,
    Backward,
    BackwardTransitive,
    Forward,
    ForwardTransitive,
    Full,
    FullTransitive,
}

impl CompatibilityLevel {
    pub const ALL: [CompatibilityLevel; 7] = [
        CompatibilityLevel::None,
        CompatibilityLevel::Backward,
        CompatibilityLevel::BackwardTransitive,
        CompatibilityLevel::Forward,
        CompatibilityLevel::ForwardTransitive,
        CompatibilityLevel::Full,
        CompatibilityLevel::FullTransitive,
    ];

    /// The token used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            CompatibilityLevel::None => "NONE",
            CompatibilityLevel::Backward => "BACKWARD",
            CompatibilityLevel::BackwardTransitive => "BACKWARD_TRANSITIVE",
            CompatibilityLevel::Forward => "FORWARD",
            CompatibilityLevel::ForwardTransitive => "FORWARD_TRANSITIVE",
            CompatibilityLevel::Full => "FULL",
            CompatibilityLevel::FullTransitive => "FULL_TRANSITIVE",
        }
    }
}

impl fmt::Display for CompatibilityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompatibilityLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_uppercase();
        CompatibilityLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == token)
            .ok_or_else(|| ValidationError::UnknownCompatibilityLevel(s.to_string()))
    }
}

/// A registered schema: its global id and definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub id: SchemaId,
    #[serde(rename = "schema")]
    pub raw: RawSchema,
}

impl Schema {
    pub fn new(id: SchemaId, raw: RawSchema) -> Self {
        Self { id, raw }
    }
}

/// A schema resolved through a subject and a concrete version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedSchema {
    pub subject: SubjectName,
    pub version: VersionNumber,
    pub schema: Schema,
}

impl VersionedSchema {
    pub fn id(&self) -> SchemaId {
        self.schema.id
    }

    pub fn raw(&self) -> &RawSchema {
        &self.schema.raw
    }
}

/// Reference from one schema to a type defined by another registered schema
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaReference {
    /// Fully qualified name the referencing schema uses
    pub name: String,
    pub subject: SubjectName,
    pub version: VersionNumber,
}

impl SchemaReference {
    pub fn new(
        name: impl Into<String>,
        subject: SubjectName,
        version: VersionNumber,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::InvalidReference(
                "name must not be blank".to_string(),
            ));
        }
        Ok(Self {
            name,
            subject,
            version,
        })
    }
}
