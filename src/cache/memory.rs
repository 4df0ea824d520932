//! In-process, map-backed cache

use parking_lot::RwLock;
use std::collections::HashMap;

use super::{subject_version_key, CacheAdapter};
use crate::checksum::Checksum;
use crate::error::CacheError;
use crate::schema::{Schema, SchemaId, SubjectName};
use crate::version::VersionNumber;

/// Unbounded cache held in process memory; never fails
#[derive(Debug, Default)]
pub struct MemoryCacheAdapter {
    by_id: RwLock<HashMap<SchemaId, Schema>>,
    by_subject_version: RwLock<HashMap<String, Schema>>,
    id_by_hash: RwLock<HashMap<Checksum, SchemaId>>,
}

impl MemoryCacheAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries across all namespaces
    pub fn len(&self) -> usize {
        self.by_id.read().len()
            + self.by_subject_version.read().len()
            + self.id_by_hash.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheAdapter for MemoryCacheAdapter {
    fn cache_schema_with_id(&self, schema: &Schema) -> Result<(), CacheError> {
        self.by_id.write().insert(schema.id, schema.clone());
        Ok(())
    }

    fn cache_schema_with_subject_and_version(
        &self,
        subject: &SubjectName,
        version: VersionNumber,
        schema: &Schema,
    ) -> Result<(), CacheError> {
        self.by_subject_version
            .write()
            .insert(subject_version_key(subject, version), schema.clone());
        Ok(())
    }

    fn cache_schema_id_by_hash(&self, hash: &Checksum, id: SchemaId) -> Result<(), CacheError> {
        self.id_by_hash.write().insert(hash.clone(), id);
        Ok(())
    }

    fn cached_schema_with_id(&self, id: SchemaId) -> Result<Option<Schema>, CacheError> {
        Ok(self.by_id.read().get(&id).cloned())
    }

    fn cached_schema_with_subject_and_version(
        &self,
        subject: &SubjectName,
        version: VersionNumber,
    ) -> Result<Option<Schema>, CacheError> {
        Ok(self
            .by_subject_version
            .read()
            .get(&subject_version_key(subject, version))
            .cloned())
    }

    fn cached_schema_id_by_hash(&self, hash: &Checksum) -> Result<Option<SchemaId>, CacheError> {
        Ok(self.id_by_hash.read().get(hash).copied())
    }

    fn has_schema_for_id(&self, id: SchemaId) -> Result<bool, CacheError> {
        Ok(self.by_id.read().contains_key(&id))
    }

    fn has_schema_for_subject_and_version(
        &self,
        subject: &SubjectName,
        version: VersionNumber,
    ) -> Result<bool, CacheError> {
        Ok(self
            .by_subject_version
            .read()
            .contains_key(&subject_version_key(subject, version)))
    }

    fn has_schema_id_for_hash(&self, hash: &Checksum) -> Result<bool, CacheError> {
        Ok(self.id_by_hash.read().contains_key(hash))
    }
}
