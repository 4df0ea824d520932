//! Blocking view over an async [`Registry`]

use std::future::Future;

use tokio::runtime::{Builder, Runtime};

use super::{BlockingRegistry, Registry};
use crate::error::Result;
use crate::schema::{
    CompatibilityLevel, RawSchema, Schema, SchemaId, SchemaReference, SubjectName, VersionedSchema,
};
use crate::version::{VersionId, VersionNumber};

/// Runs each async operation to completion on a private single-threaded runtime
///
/// A failed future is surfaced as the same `Err` the async call resolved to.
/// Calling into a bridge from inside another tokio runtime panics.
pub struct BlockingBridge<R> {
    inner: R,
    runtime: Runtime,
}

impl<R: Registry> BlockingBridge<R> {
    pub fn new(inner: R) -> std::io::Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self::with_runtime(inner, runtime))
    }

    pub fn with_runtime(inner: R, runtime: Runtime) -> Self {
        Self { inner, runtime }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    fn wait<T>(&self, future: impl Future<Output = Result<T>>) -> Result<T> {
        self.runtime.block_on(future)
    }
}

impl<R: Registry> BlockingRegistry for BlockingBridge<R> {
    fn register(
        &self,
        subject: &SubjectName,
        schema: &RawSchema,
        references: &[SchemaReference],
    ) -> Result<SchemaId> {
        self.wait(self.inner.register(subject, schema, references))
    }

    fn schema_version(
        &self,
        subject: &SubjectName,
        schema: &RawSchema,
    ) -> Result<VersionedSchema> {
        self.wait(self.inner.schema_version(subject, schema))
    }

    fn schema_id(&self, subject: &SubjectName, schema: &RawSchema) -> Result<SchemaId> {
        self.wait(self.inner.schema_id(subject, schema))
    }

    fn schema_for_id(&self, id: SchemaId) -> Result<Schema> {
        self.wait(self.inner.schema_for_id(id))
    }

    fn schema_for_subject_and_version(
        &self,
        subject: &SubjectName,
        version: VersionId,
    ) -> Result<VersionedSchema> {
        self.wait(self.inner.schema_for_subject_and_version(subject, version))
    }

    fn latest_version(&self, subject: &SubjectName) -> Result<VersionedSchema> {
        self.wait(self.inner.latest_version(subject))
    }

    fn default_compatibility(&self) -> Result<CompatibilityLevel> {
        self.wait(self.inner.default_compatibility())
    }

    fn set_default_compatibility(&self, level: CompatibilityLevel) -> Result<CompatibilityLevel> {
        self.wait(self.inner.set_default_compatibility(level))
    }

    fn subject_compatibility(&self, subject: &SubjectName) -> Result<CompatibilityLevel> {
        self.wait(self.inner.subject_compatibility(subject))
    }

    fn set_subject_compatibility(
        &self,
        subject: &SubjectName,
        level: CompatibilityLevel,
    ) -> Result<CompatibilityLevel> {
        self.wait(self.inner.set_subject_compatibility(subject, level))
    }

    fn subjects(&self) -> Result<Vec<SubjectName>> {
        self.wait(self.inner.subjects())
    }

    fn subject_versions(&self, subject: &SubjectName) -> Result<Vec<VersionNumber>> {
        self.wait(self.inner.subject_versions(subject))
    }

    fn check_compatibility(
        &self,
        subject: &SubjectName,
        version: VersionId,
        schema: &RawSchema,
    ) -> Result<bool> {
        self.wait(self.inner.check_compatibility(subject, version, schema))
    }

    fn delete_subject(&self, subject: &SubjectName, permanent: bool) -> Result<Vec<VersionNumber>> {
        self.wait(self.inner.delete_subject(subject, permanent))
    }

    fn delete_subject_version(
        &self,
        subject: &SubjectName,
        version: VersionId,
        permanent: bool,
    ) -> Result<VersionNumber> {
        self.wait(self.inner.delete_subject_version(subject, version, permanent))
    }
}
