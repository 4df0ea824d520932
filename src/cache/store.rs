//! Cache adapter over any string key/value store
//!
//! [`KeyValueStore`] is the seam for external stores. Keys are namespaced so
//! one store can hold all three kinds of fact; values are JSON.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::{subject_version_key, CacheAdapter};
use crate::checksum::Checksum;
use crate::error::CacheError;
use crate::schema::{Schema, SchemaId, SubjectName};
use crate::version::VersionNumber;

/// Minimal contract of an external key/value store
///
/// A single `get` or `set` only needs to be atomic on its own; the facts
/// stored are idempotent, so racing writers are harmless.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    fn set(&self, key: &str, value: String) -> Result<(), CacheError>;

    fn contains(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.get(key)?.is_some())
    }
}

const ID_PREFIX: &str = "schema:id:";
const SUBJECT_VERSION_PREFIX: &str = "schema:subject-version:";
const HASH_PREFIX: &str = "id:hash:";

/// Adapts a [`KeyValueStore`] into a [`CacheAdapter`]
#[derive(Debug)]
pub struct StoreCacheAdapter<S> {
    store: S,
}

impl<S: KeyValueStore> StoreCacheAdapter<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn put<V: Serialize>(&self, key: String, value: &V) -> Result<(), CacheError> {
        self.store.set(&key, serde_json::to_string(value)?)
    }

    fn fetch<V: DeserializeOwned>(&self, key: String) -> Result<Option<V>, CacheError> {
        match self.store.get(&key)? {
            Some(raw) => {
                let value = serde_json::from_str(&raw).map_err(|e| {
                    debug!(%key, error = %e, "undecodable cache entry");
                    CacheError::Corrupt(format!("{}: {}", key, e))
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn id_key(id: SchemaId) -> String {
        format!("{}{}", ID_PREFIX, id)
    }

    fn subject_version_key(subject: &SubjectName, version: VersionNumber) -> String {
        format!("{}{}", SUBJECT_VERSION_PREFIX, subject_version_key(subject, version))
    }

    fn hash_key(hash: &Checksum) -> String {
        format!("{}{}", HASH_PREFIX, hash)
    }
}

impl<S: KeyValueStore> CacheAdapter for StoreCacheAdapter<S> {
    fn cache_schema_with_id(&self, schema: &Schema) -> Result<(), CacheError> {
        self.put(Self::id_key(schema.id), schema)
    }

    fn cache_schema_with_subject_and_version(
        &self,
        subject: &SubjectName,
        version: VersionNumber,
        schema: &Schema,
    ) -> Result<(), CacheError> {
        self.put(Self::subject_version_key(subject, version), schema)
    }

    fn cache_schema_id_by_hash(&self, hash: &Checksum, id: SchemaId) -> Result<(), CacheError> {
        self.put(Self::hash_key(hash), &id)
    }

    fn cached_schema_with_id(&self, id: SchemaId) -> Result<Option<Schema>, CacheError> {
        self.fetch(Self::id_key(id))
    }

    fn cached_schema_with_subject_and_version(
        &self,
        subject: &SubjectName,
        version: VersionNumber,
    ) -> Result<Option<Schema>, CacheError> {
        self.fetch(Self::subject_version_key(subject, version))
    }

    fn cached_schema_id_by_hash(&self, hash: &Checksum) -> Result<Option<SchemaId>, CacheError> {
        self.fetch(Self::hash_key(hash))
    }

    fn has_schema_for_id(&self, id: SchemaId) -> Result<bool, CacheError> {
        self.store.contains(&Self::id_key(id))
    }

    fn has_schema_for_subject_and_version(
        &self,
        subject: &SubjectName,
        version: VersionNumber,
    ) -> Result<bool, CacheError> {
        self.store
            .contains(&Self::subject_version_key(subject, version))
    }

    fn has_schema_id_for_hash(&self, hash: &Checksum) -> Result<bool, CacheError> {
        self.store.contains(&Self::hash_key(hash))
    }
}
