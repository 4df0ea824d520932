//! Cache-first decorator for any registry
//!
//! | operation                        | read from cache          | written on success        |
//! |----------------------------------|--------------------------|---------------------------|
//! | `schema_for_id`                  | id                       | id                        |
//! | `schema_for_subject_and_version` | subject+version          | subject+version, id       |
//! | `latest_version`                 | never                    | nothing                   |
//! | `register`                       | hash                     | id, hash                  |
//! | `schema_id`                      | hash                     | hash                      |
//! | `schema_version`                 | never                    | subject+version, id, hash |
//!
//! `schema_for_subject_and_version` with `latest` behaves like `latest_version`.
//!
//! Everything else passes straight through. Concurrent misses on the same key
//! each go to the registry; the cache converges once they complete.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use super::{BlockingRegistry, Registry};
use crate::cache::{CacheAdapter, SUBJECT_VERSION_SEPARATOR};
use crate::checksum::{default_hasher, Checksum, SchemaHasher};
use crate::error::{CacheError, Result};
use crate::schema::{
    CompatibilityLevel, RawSchema, Schema, SchemaId, SchemaReference, SubjectName, VersionedSchema,
};
use crate::version::{VersionId, VersionNumber};

/// Wraps a [`Registry`] or [`BlockingRegistry`] with a [`CacheAdapter`]
///
/// Backend failures never fail an operation: a failed read is treated as a
/// miss and a failed write is logged and dropped.
pub struct CachingRegistry<R> {
    inner: R,
    cache: Arc<dyn CacheAdapter>,
    hasher: SchemaHasher,
}

impl<R> CachingRegistry<R> {
    pub fn new(inner: R, cache: Arc<dyn CacheAdapter>) -> Self {
        Self {
            inner,
            cache,
            hasher: default_hasher(),
        }
    }

    /// Replace the content hash used for the hash -> id namespace
    pub fn with_hasher(mut self, hasher: SchemaHasher) -> Self {
        self.hasher = hasher;
        self
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn cache(&self) -> &Arc<dyn CacheAdapter> {
        &self.cache
    }

    /// Hash key for `schema` with `references` as registered under `subject`
    ///
    /// The registry identifies a schema by its text and its references, and
    /// the same schema under another subject is a separate registration. All
    /// three go into the key. Lookups by text alone use an empty reference set.
    fn hash_key(
        &self,
        subject: &SubjectName,
        schema: &RawSchema,
        references: &[SchemaReference],
    ) -> Checksum {
        let hash = (self.hasher)(schema);
        if references.is_empty() {
            return Checksum::from(format!("{}{}{}", subject, SUBJECT_VERSION_SEPARATOR, hash));
        }

        let mut entries: Vec<String> = references
            .iter()
            .map(|r| format!("{}={}:{}", r.name, r.subject, r.version))
            .collect();
        entries.sort();
        let references = Checksum::from_bytes(entries.join("\n").as_bytes());
        Checksum::from(format!(
            "{}{sep}{}{sep}{}",
            subject,
            hash,
            references,
            sep = SUBJECT_VERSION_SEPARATOR
        ))
    }

    fn read<T>(&self, what: &str, result: std::result::Result<Option<T>, CacheError>) -> Option<T> {
        match result {
            Ok(Some(value)) => {
                debug!(what, "schema cache hit");
                Some(value)
            }
            Ok(None) => {
                debug!(what, "schema cache miss");
                None
            }
            Err(e) => {
                warn!(what, error = %e, "schema cache read failed; treating as miss");
                None
            }
        }
    }

    fn write(&self, what: &str, result: std::result::Result<(), CacheError>) {
        if let Err(e) = result {
            warn!(what, error = %e, "schema cache write failed");
        }
    }

    fn cached_schema(&self, id: SchemaId) -> Option<Schema> {
        self.read("schema by id", self.cache.cached_schema_with_id(id))
    }

    fn cached_versioned(
        &self,
        subject: &SubjectName,
        version: VersionNumber,
    ) -> Option<VersionedSchema> {
        self.read(
            "schema by subject and version",
            self.cache
                .cached_schema_with_subject_and_version(subject, version),
        )
        .map(|schema| VersionedSchema {
            subject: subject.clone(),
            version,
            schema,
        })
    }

    fn cached_id(&self, hash: &Checksum) -> Option<SchemaId> {
        self.read("id by hash", self.cache.cached_schema_id_by_hash(hash))
    }

    fn remember_schema(&self, schema: &Schema) {
        self.write("schema by id", self.cache.cache_schema_with_id(schema));
    }

    fn remember_id(&self, hash: &Checksum, id: SchemaId) {
        self.write("id by hash", self.cache.cache_schema_id_by_hash(hash, id));
    }

    fn remember_versioned(&self, versioned: &VersionedSchema) {
        self.write(
            "schema by subject and version",
            self.cache.cache_schema_with_subject_and_version(
                &versioned.subject,
                versioned.version,
                &versioned.schema,
            ),
        );
        self.remember_schema(&versioned.schema);
    }

    fn after_register(&self, hash: &Checksum, schema: &RawSchema, result: &Result<SchemaId>) {
        if let Ok(id) = result {
            self.remember_schema(&Schema::new(*id, schema.clone()));
            self.remember_id(hash, *id);
        }
    }

    fn after_schema_version(&self, hash: &Checksum, result: &Result<VersionedSchema>) {
        if let Ok(versioned) = result {
            self.remember_versioned(versioned);
            self.remember_id(hash, versioned.id());
        }
    }

    fn after_schema_id(&self, hash: &Checksum, result: &Result<SchemaId>) {
        if let Ok(id) = result {
            self.remember_id(hash, *id);
        }
    }

    fn after_schema_for_id(&self, result: &Result<Schema>) {
        if let Ok(schema) = result {
            self.remember_schema(schema);
        }
    }

    fn after_subject_version(&self, result: &Result<VersionedSchema>) {
        if let Ok(versioned) = result {
            self.remember_versioned(versioned);
        }
    }
}

#[async_trait]
impl<R: Registry> Registry for CachingRegistry<R> {
    async fn register(
        &self,
        subject: &SubjectName,
        schema: &RawSchema,
        references: &[SchemaReference],
    ) -> Result<SchemaId> {
        let hash = self.hash_key(subject, schema, references);
        if let Some(id) = self.cached_id(&hash) {
            return Ok(id);
        }
        let result = self.inner.register(subject, schema, references).await;
        self.after_register(&hash, schema, &result);
        result
    }

    async fn schema_version(
        &self,
        subject: &SubjectName,
        schema: &RawSchema,
    ) -> Result<VersionedSchema> {
        let hash = self.hash_key(subject, schema, &[]);
        let result = self.inner.schema_version(subject, schema).await;
        self.after_schema_version(&hash, &result);
        result
    }

    async fn schema_id(&self, subject: &SubjectName, schema: &RawSchema) -> Result<SchemaId> {
        let hash = self.hash_key(subject, schema, &[]);
        if let Some(id) = self.cached_id(&hash) {
            return Ok(id);
        }
        let result = self.inner.schema_id(subject, schema).await;
        self.after_schema_id(&hash, &result);
        result
    }

    async fn schema_for_id(&self, id: SchemaId) -> Result<Schema> {
        if let Some(schema) = self.cached_schema(id) {
            return Ok(schema);
        }
        let result = self.inner.schema_for_id(id).await;
        self.after_schema_for_id(&result);
        result
    }

    async fn schema_for_subject_and_version(
        &self,
        subject: &SubjectName,
        version: VersionId,
    ) -> Result<VersionedSchema> {
        let Some(number) = version.as_number() else {
            return self.inner.latest_version(subject).await;
        };
        if let Some(versioned) = self.cached_versioned(subject, number) {
            return Ok(versioned);
        }
        let result = self
            .inner
            .schema_for_subject_and_version(subject, version)
            .await;
        self.after_subject_version(&result);
        result
    }

    async fn latest_version(&self, subject: &SubjectName) -> Result<VersionedSchema> {
        self.inner.latest_version(subject).await
    }

    async fn default_compatibility(&self) -> Result<CompatibilityLevel> {
        self.inner.default_compatibility().await
    }

    async fn set_default_compatibility(
        &self,
        level: CompatibilityLevel,
    ) -> Result<CompatibilityLevel> {
        self.inner.set_default_compatibility(level).await
    }

    async fn subject_compatibility(&self, subject: &SubjectName) -> Result<CompatibilityLevel> {
        self.inner.subject_compatibility(subject).await
    }

    async fn set_subject_compatibility(
        &self,
        subject: &SubjectName,
        level: CompatibilityLevel,
    ) -> Result<CompatibilityLevel> {
        self.inner.set_subject_compatibility(subject, level).await
    }

    async fn subjects(&self) -> Result<Vec<SubjectName>> {
        self.inner.subjects().await
    }

    async fn subject_versions(&self, subject: &SubjectName) -> Result<Vec<VersionNumber>> {
        self.inner.subject_versions(subject).await
    }

    async fn check_compatibility(
        &self,
        subject: &SubjectName,
        version: VersionId,
        schema: &RawSchema,
    ) -> Result<bool> {
        self.inner
            .check_compatibility(subject, version, schema)
            .await
    }

    async fn delete_subject(
        &self,
        subject: &SubjectName,
        permanent: bool,
    ) -> Result<Vec<VersionNumber>> {
        self.inner.delete_subject(subject, permanent).await
    }

    async fn delete_subject_version(
        &self,
        subject: &SubjectName,
        version: VersionId,
        permanent: bool,
    ) -> Result<VersionNumber> {
        self.inner
            .delete_subject_version(subject, version, permanent)
            .await
    }
}

impl<R: BlockingRegistry> BlockingRegistry for CachingRegistry<R> {
    fn register(
        &self,
        subject: &SubjectName,
        schema: &RawSchema,
        references: &[SchemaReference],
    ) -> Result<SchemaId> {
        let hash = self.hash_key(subject, schema, references);
        if let Some(id) = self.cached_id(&hash) {
            return Ok(id);
        }
        let result = self.inner.register(subject, schema, references);
        self.after_register(&hash, schema, &result);
        result
    }

    fn schema_version(
        &self,
        subject: &SubjectName,
        schema: &RawSchema,
    ) -> Result<VersionedSchema> {
        let hash = self.hash_key(subject, schema, &[]);
        let result = self.inner.schema_version(subject, schema);
        self.after_schema_version(&hash, &result);
        result
    }

    fn schema_id(&self, subject: &SubjectName, schema: &RawSchema) -> Result<SchemaId> {
        let hash = self.hash_key(subject, schema, &[]);
        if let Some(id) = self.cached_id(&hash) {
            return Ok(id);
        }
        let result = self.inner.schema_id(subject, schema);
        self.after_schema_id(&hash, &result);
        result
    }

    fn schema_for_id(&self, id: SchemaId) -> Result<Schema> {
        if let Some(schema) = self.cached_schema(id) {
            return Ok(schema);
        }
        let result = self.inner.schema_for_id(id);
        self.after_schema_for_id(&result);
        result
    }

    fn schema_for_subject_and_version(
        &self,
        subject: &SubjectName,
        version: VersionId,
    ) -> Result<VersionedSchema> {
        let Some(number) = version.as_number() else {
            return self.inner.latest_version(subject);
        };
        if let Some(versioned) = self.cached_versioned(subject, number) {
            return Ok(versioned);
        }
        let result = self.inner.schema_for_subject_and_version(subject, version);
        self.after_subject_version(&result);
        result
    }

    fn latest_version(&self, subject: &SubjectName) -> Result<VersionedSchema> {
        self.inner.latest_version(subject)
    }

    fn default_compatibility(&self) -> Result<CompatibilityLevel> {
        self.inner.default_compatibility()
    }

    fn set_default_compatibility(&self, level: CompatibilityLevel) -> Result<CompatibilityLevel> {
        self.inner.set_default_compatibility(level)
    }

    fn subject_compatibility(&self, subject: &SubjectName) -> Result<CompatibilityLevel> {
        self.inner.subject_compatibility(subject)
    }

    fn set_subject_compatibility(
        &self,
        subject: &SubjectName,
        level: CompatibilityLevel,
    ) -> Result<CompatibilityLevel> {
        self.inner.set_subject_compatibility(subject, level)
    }

    fn subjects(&self) -> Result<Vec<SubjectName>> {
        self.inner.subjects()
    }

    fn subject_versions(&self, subject: &SubjectName) -> Result<Vec<VersionNumber>> {
        self.inner.subject_versions(subject)
    }

    fn check_compatibility(
        &self,
        subject: &SubjectName,
        version: VersionId,
        schema: &RawSchema,
    ) -> Result<bool> {
        self.inner.check_compatibility(subject, version, schema)
    }

    fn delete_subject(&self, subject: &SubjectName, permanent: bool) -> Result<Vec<VersionNumber>> {
        self.inner.delete_subject(subject, permanent)
    }

    fn delete_subject_version(
        &self,
        subject: &SubjectName,
        version: VersionId,
        permanent: bool,
    ) -> Result<VersionNumber> {
        self.inner
            .delete_subject_version(subject, version, permanent)
    }
}
