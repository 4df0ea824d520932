//! Content hashes that key the schema-id cache

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha512};
use std::fmt;
use std::sync::Arc;

use crate::schema::RawSchema;

/// Hex digest of a schema's canonical text
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Checksum(String);

impl Checksum {
    /// SHA-256 of raw bytes
    pub fn from_bytes(data: &[u8]) -> Self {
        Self(format!("{:x}", Sha256::digest(data)))
    }

    /// Default schema hash: SHA-256 of [`RawSchema::canonical`]
    pub fn of_schema(schema: &RawSchema) -> Self {
        Self::from_bytes(schema.canonical().as_bytes())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Checksum {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Checksum {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Pluggable hash function applied to a schema before looking up its id
pub type SchemaHasher = Arc<dyn Fn(&RawSchema) -> Checksum + Send + Sync>;

/// Digest algorithms selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Sha256,
    Sha512,
}

impl HashAlgorithm {
    pub fn hasher(self) -> SchemaHasher {
        match self {
            HashAlgorithm::Sha256 => Arc::new(Checksum::of_schema) as SchemaHasher,
            HashAlgorithm::Sha512 => Arc::new(sha512_of_schema),
        }
    }
}

fn sha512_of_schema(schema: &RawSchema) -> Checksum {
    Checksum(format!("{:x}", Sha512::digest(schema.canonical().as_bytes())))
}

/// The hasher used when none is configured
pub fn default_hasher() -> SchemaHasher {
    HashAlgorithm::default().hasher()
}
