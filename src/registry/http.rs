//! Async registry over an [`AsyncTransport`]

use async_trait::async_trait;

use super::call::{self, Call};
use super::Registry;
use crate::error::Result;
use crate::error_mapper::ErrorMapper;
use crate::schema::{
    CompatibilityLevel, RawSchema, Schema, SchemaId, SchemaReference, SubjectName, VersionedSchema,
};
use crate::transport::AsyncTransport;
use crate::version::{VersionId, VersionNumber};

/// Talks to the registry through a non-blocking transport
///
/// Holds no state besides the transport, so concurrent operations are
/// independent of each other.
pub struct HttpRegistry<T> {
    transport: T,
    errors: ErrorMapper,
}

impl<T: AsyncTransport> HttpRegistry<T> {
    pub fn new(transport: T) -> Self {
        Self::with_error_mapper(transport, ErrorMapper::new())
    }

    pub fn with_error_mapper(transport: T, errors: ErrorMapper) -> Self {
        Self { transport, errors }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn execute<R>(&self, call: Call<R>) -> Result<R> {
        let response = self
            .transport
            .send(call.request())
            .await
            .map_err(|e| self.errors.map_transport(e))?;
        call.complete(response, &self.errors)
    }
}

#[async_trait]
impl<T: AsyncTransport> Registry for HttpRegistry<T> {
    async fn register(
        &self,
        subject: &SubjectName,
        schema: &RawSchema,
        references: &[SchemaReference],
    ) -> Result<SchemaId> {
        self.execute(call::register(subject, schema, references)).await
    }

    async fn schema_version(
        &self,
        subject: &SubjectName,
        schema: &RawSchema,
    ) -> Result<VersionedSchema> {
        self.execute(call::lookup(subject, schema)).await
    }

    async fn schema_id(&self, subject: &SubjectName, schema: &RawSchema) -> Result<SchemaId> {
        Ok(self.execute(call::lookup(subject, schema)).await?.id())
    }

    async fn schema_for_id(&self, id: SchemaId) -> Result<Schema> {
        self.execute(call::schema_for_id(id)).await
    }

    async fn schema_for_subject_and_version(
        &self,
        subject: &SubjectName,
        version: VersionId,
    ) -> Result<VersionedSchema> {
        self.execute(call::subject_version(subject, version)).await
    }

    async fn latest_version(&self, subject: &SubjectName) -> Result<VersionedSchema> {
        self.execute(call::subject_version(subject, VersionId::Latest))
            .await
    }

    async fn default_compatibility(&self) -> Result<CompatibilityLevel> {
        self.execute(call::default_compatibility()).await
    }

    async fn set_default_compatibility(
        &self,
        level: CompatibilityLevel,
    ) -> Result<CompatibilityLevel> {
        self.execute(call::set_default_compatibility(level)).await
    }

    async fn subject_compatibility(&self, subject: &SubjectName) -> Result<CompatibilityLevel> {
        self.execute(call::subject_compatibility(subject)).await
    }

    async fn set_subject_compatibility(
        &self,
        subject: &SubjectName,
        level: CompatibilityLevel,
    ) -> Result<CompatibilityLevel> {
        self.execute(call::set_subject_compatibility(subject, level))
            .await
    }

    async fn subjects(&self) -> Result<Vec<SubjectName>> {
        self.execute(call::subjects()).await
    }

    async fn subject_versions(&self, subject: &SubjectName) -> Result<Vec<VersionNumber>> {
        self.execute(call::subject_versions(subject)).await
    }

    async fn check_compatibility(
        &self,
        subject: &SubjectName,
        version: VersionId,
        schema: &RawSchema,
    ) -> Result<bool> {
        self.execute(call::check_compatibility(subject, version, schema))
            .await
    }

    async fn delete_subject(
        &self,
        subject: &SubjectName,
        permanent: bool,
    ) -> Result<Vec<VersionNumber>> {
        self.execute(call::delete_subject(subject, permanent)).await
    }

    async fn delete_subject_version(
        &self,
        subject: &SubjectName,
        version: VersionId,
        permanent: bool,
    ) -> Result<VersionNumber> {
        self.execute(call::delete_subject_version(subject, version, permanent))
            .await
    }
}
