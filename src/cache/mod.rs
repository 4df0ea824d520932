//! Pluggable stores for schema facts
//!
//! Three namespaces: schema by id, schema by subject + concrete version, and
//! schema id by content hash. Every entry is an immutable fact once written,
//! so there is no invalidation; backends may still evict for capacity.
//!
//! A miss is `Ok(None)`. `Err` means the backend itself failed.

use crate::checksum::Checksum;
use crate::error::CacheError;
use crate::schema::{Schema, SchemaId, SubjectName};
use crate::version::VersionNumber;

pub mod bounded;
pub mod file;
pub mod memory;
pub mod store;

pub use bounded::LruStore;
pub use file::FileStore;
pub use memory::MemoryCacheAdapter;
pub use store::{KeyValueStore, StoreCacheAdapter};

/// Joins subject and version in composite cache keys
pub const SUBJECT_VERSION_SEPARATOR: char = '_';

/// Composite key for the subject + version namespace
///
/// Versions are numeric, so splitting on the last separator is unambiguous
/// even when the subject itself contains one.
pub fn subject_version_key(subject: &SubjectName, version: VersionNumber) -> String {
    format!("{}{}{}", subject, SUBJECT_VERSION_SEPARATOR, version)
}

pub trait CacheAdapter: Send + Sync {
    /// Record `schema` under its id
    fn cache_schema_with_id(&self, schema: &Schema) -> Result<(), CacheError>;

    fn cache_schema_with_subject_and_version(
        &self,
        subject: &SubjectName,
        version: VersionNumber,
        schema: &Schema,
    ) -> Result<(), CacheError>;

    fn cache_schema_id_by_hash(&self, hash: &Checksum, id: SchemaId) -> Result<(), CacheError>;

    fn cached_schema_with_id(&self, id: SchemaId) -> Result<Option<Schema>, CacheError>;

    fn cached_schema_with_subject_and_version(
        &self,
        subject: &SubjectName,
        version: VersionNumber,
    ) -> Result<Option<Schema>, CacheError>;

    fn cached_schema_id_by_hash(&self, hash: &Checksum) -> Result<Option<SchemaId>, CacheError>;

    fn has_schema_for_id(&self, id: SchemaId) -> Result<bool, CacheError> {
        Ok(self.cached_schema_with_id(id)?.is_some())
    }

    fn has_schema_for_subject_and_version(
        &self,
        subject: &SubjectName,
        version: VersionNumber,
    ) -> Result<bool, CacheError> {
        Ok(self
            .cached_schema_with_subject_and_version(subject, version)?
            .is_some())
    }

    fn has_schema_id_for_hash(&self, hash: &Checksum) -> Result<bool, CacheError> {
        Ok(self.cached_schema_id_by_hash(hash)?.is_some())
    }
}
