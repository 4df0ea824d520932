//! Blocking registry over a [`Transport`]

use super::call::{self, Call};
use super::BlockingRegistry;
use crate::error::Result;
use crate::error_mapper::ErrorMapper;
use crate::schema::{
    CompatibilityLevel, RawSchema, Schema, SchemaId, SchemaReference, SubjectName, VersionedSchema,
};
use crate::transport::Transport;
use crate::version::{VersionId, VersionNumber};

/// Talks to the registry through a blocking transport
pub struct BlockingHttpRegistry<T> {
    transport: T,
    errors: ErrorMapper,
}

impl<T: Transport> BlockingHttpRegistry<T> {
    pub fn new(transport: T) -> Self {
        Self::with_error_mapper(transport, ErrorMapper::new())
    }

    pub fn with_error_mapper(transport: T, errors: ErrorMapper) -> Self {
        Self { transport, errors }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn execute<R>(&self, call: Call<R>) -> Result<R> {
        let response = self
            .transport
            .send(call.request())
            .map_err(|e| self.errors.map_transport(e))?;
        call.complete(response, &self.errors)
    }
}

impl<T: Transport> BlockingRegistry for BlockingHttpRegistry<T> {
    fn register(
        &self,
        subject: &SubjectName,
        schema: &RawSchema,
        references: &[SchemaReference],
    ) -> Result<SchemaId> {
        self.execute(call::register(subject, schema, references))
    }

    fn schema_version(
        &self,
        subject: &SubjectName,
        schema: &RawSchema,
    ) -> Result<VersionedSchema> {
        self.execute(call::lookup(subject, schema))
    }

    fn schema_id(&self, subject: &SubjectName, schema: &RawSchema) -> Result<SchemaId> {
        Ok(self.execute(call::lookup(subject, schema))?.id())
    }

    fn schema_for_id(&self, id: SchemaId) -> Result<Schema> {
        self.execute(call::schema_for_id(id))
    }

    fn schema_for_subject_and_version(
        &self,
        subject: &SubjectName,
        version: VersionId,
    ) -> Result<VersionedSchema> {
        self.execute(call::subject_version(subject, version))
    }

    fn latest_version(&self, subject: &SubjectName) -> Result<VersionedSchema> {
        self.execute(call::subject_version(subject, VersionId::Latest))
    }

    fn default_compatibility(&self) -> Result<CompatibilityLevel> {
        self.execute(call::default_compatibility())
    }

    fn set_default_compatibility(&self, level: CompatibilityLevel) -> Result<CompatibilityLevel> {
        self.execute(call::set_default_compatibility(level))
    }

    fn subject_compatibility(&self, subject: &SubjectName) -> Result<CompatibilityLevel> {
        self.execute(call::subject_compatibility(subject))
    }

    fn set_subject_compatibility(
        &self,
        subject: &SubjectName,
        level: CompatibilityLevel,
    ) -> Result<CompatibilityLevel> {
        self.execute(call::set_subject_compatibility(subject, level))
    }

    fn subjects(&self) -> Result<Vec<SubjectName>> {
        self.execute(call::subjects())
    }

    fn subject_versions(&self, subject: &SubjectName) -> Result<Vec<VersionNumber>> {
        self.execute(call::subject_versions(subject))
    }

    fn check_compatibility(
        &self,
        subject: &SubjectName,
        version: VersionId,
        schema: &RawSchema,
    ) -> Result<bool> {
        self.execute(call::check_compatibility(subject, version, schema))
    }

    fn delete_subject(&self, subject: &SubjectName, permanent: bool) -> Result<Vec<VersionNumber>> {
        self.execute(call::delete_subject(subject, permanent))
    }

    fn delete_subject_version(
        &self,
        subject: &SubjectName,
        version: VersionId,
        permanent: bool,
    ) -> Result<VersionNumber> {
        self.execute(call::delete_subject_version(subject, version, permanent))
    }
}
