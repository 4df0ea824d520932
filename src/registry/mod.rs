//! Registry operation contract, in blocking and async form
//!
//! ```text
//!  caller ──> CachingRegistry ──hit──> CacheAdapter
//!                   │ miss
//!                   v
//!        HttpRegistry / BlockingHttpRegistry ──> Transport
//!                   │ failure
//!                   v
//!              ErrorMapper
//! ```
//!
//! Both traits carry the same operations with the same meaning. Results are
//! always `Result<T, RegistryError>`: success and failure never share a slot.
//! Input validation happens when the value types are constructed, so it is
//! synchronous in both forms.

use async_trait::async_trait;

use crate::error::Result;
use crate::schema::{
    CompatibilityLevel, RawSchema, Schema, SchemaId, SchemaReference, SubjectName, VersionedSchema,
};
use crate::version::{VersionId, VersionNumber};

pub mod blocking;
pub mod bridge;
pub mod caching;
pub mod call;
pub mod http;

pub use blocking::BlockingHttpRegistry;
pub use bridge::BlockingBridge;
pub use caching::CachingRegistry;
pub use http::HttpRegistry;

/// Async registry: every operation returns a future resolved by the transport
#[async_trait]
pub trait Registry: Send + Sync {
    /// Register `schema` under `subject`; returns its global id
    ///
    /// Never retried automatically.
    async fn register(
        &self,
        subject: &SubjectName,
        schema: &RawSchema,
        references: &[SchemaReference],
    ) -> Result<SchemaId>;

    /// The version (with id) under which `schema` is registered in `subject`
    async fn schema_version(
        &self,
        subject: &SubjectName,
        schema: &RawSchema,
    ) -> Result<VersionedSchema>;

    /// The id of `schema` as registered under `subject`
    async fn schema_id(&self, subject: &SubjectName, schema: &RawSchema) -> Result<SchemaId>;

    async fn schema_for_id(&self, id: SchemaId) -> Result<Schema>;

    async fn schema_for_subject_and_version(
        &self,
        subject: &SubjectName,
        version: VersionId,
    ) -> Result<VersionedSchema>;

    async fn latest_version(&self, subject: &SubjectName) -> Result<VersionedSchema>;

    async fn default_compatibility(&self) -> Result<CompatibilityLevel>;

    async fn set_default_compatibility(
        &self,
        level: CompatibilityLevel,
    ) -> Result<CompatibilityLevel>;

    async fn subject_compatibility(&self, subject: &SubjectName) -> Result<CompatibilityLevel>;

    async fn set_subject_compatibility(
        &self,
        subject: &SubjectName,
        level: CompatibilityLevel,
    ) -> Result<CompatibilityLevel>;

    async fn subjects(&self) -> Result<Vec<SubjectName>>;

    async fn subject_versions(&self, subject: &SubjectName) -> Result<Vec<VersionNumber>>;

    /// Ask the server whether `schema` could be registered against `version`
    async fn check_compatibility(
        &self,
        subject: &SubjectName,
        version: VersionId,
        schema: &RawSchema,
    ) -> Result<bool>;

    /// Delete every version of `subject`; returns the deleted versions
    async fn delete_subject(
        &self,
        subject: &SubjectName,
        permanent: bool,
    ) -> Result<Vec<VersionNumber>>;

    async fn delete_subject_version(
        &self,
        subject: &SubjectName,
        version: VersionId,
        permanent: bool,
    ) -> Result<VersionNumber>;
}

/// Blocking registry: every operation suspends the caller until the transport completes
pub trait BlockingRegistry: Send + Sync {
    /// Register `schema` under `subject`; returns its global id
    ///
    /// Never retried automatically.
    fn register(
        &self,
        subject: &SubjectName,
        schema: &RawSchema,
        references: &[SchemaReference],
    ) -> Result<SchemaId>;

    /// The version (with id) under which `schema` is registered in `subject`
    fn schema_version(&self, subject: &SubjectName, schema: &RawSchema)
        -> Result<VersionedSchema>;

    /// The id of `schema` as registered under `subject`
    fn schema_id(&self, subject: &SubjectName, schema: &RawSchema) -> Result<SchemaId>;

    fn schema_for_id(&self, id: SchemaId) -> Result<Schema>;

    fn schema_for_subject_and_version(
        &self,
        subject: &SubjectName,
        version: VersionId,
    ) -> Result<VersionedSchema>;

    fn latest_version(&self, subject: &SubjectName) -> Result<VersionedSchema>;

    fn default_compatibility(&self) -> Result<CompatibilityLevel>;

    fn set_default_compatibility(&self, level: CompatibilityLevel) -> Result<CompatibilityLevel>;

    fn subject_compatibility(&self, subject: &SubjectName) -> Result<CompatibilityLevel>;

    fn set_subject_compatibility(
        &self,
        subject: &SubjectName,
        level: CompatibilityLevel,
    ) -> Result<CompatibilityLevel>;

    fn subjects(&self) -> Result<Vec<SubjectName>>;

    fn subject_versions(&self, subject: &SubjectName) -> Result<Vec<VersionNumber>>;

    /// Ask the server whether `schema` could be registered against `version`
    fn check_compatibility(
        &self,
        subject: &SubjectName,
        version: VersionId,
        schema: &RawSchema,
    ) -> Result<bool>;

    /// Delete every version of `subject`; returns the deleted versions
    fn delete_subject(&self, subject: &SubjectName, permanent: bool) -> Result<Vec<VersionNumber>>;

    fn delete_subject_version(
        &self,
        subject: &SubjectName,
        version: VersionId,
        permanent: bool,
    ) -> Result<VersionNumber>;
}
