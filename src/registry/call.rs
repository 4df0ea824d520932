//! One [`Call`] per registry operation: the request to send and how to read the answer
//!
//! Both the blocking and the async HTTP registry drive these, so the wire
//! contract lives in one place and only the waiting differs.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{RegistryError, Result};
use crate::error_mapper::ErrorMapper;
use crate::request::{self, Request};
use crate::schema::{
    CompatibilityLevel, RawSchema, Schema, SchemaId, SchemaReference, SubjectName, VersionedSchema,
};
use crate::transport::Response;
use crate::version::{VersionId, VersionNumber};

type Decode<T> = Box<dyn FnOnce(&Response) -> Result<T> + Send>;

/// A request paired with the decoder for its success body
pub struct Call<T> {
    request: Request,
    decode: Decode<T>,
}

impl<T> Call<T> {
    fn new(request: Request, decode: impl FnOnce(&Response) -> Result<T> + Send + 'static) -> Self {
        Self {
            request,
            decode: Box::new(decode),
        }
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Turn the transport's response into the operation's result
    pub(crate) fn complete(self, response: Response, errors: &ErrorMapper) -> Result<T> {
        if !response.is_success() {
            return Err(errors.map_response(&response));
        }
        (self.decode)(&response)
    }
}

fn body<T: DeserializeOwned>(response: &Response) -> Result<T> {
    serde_json::from_str(&response.body).map_err(|e| {
        RegistryError::MalformedResponse(format!("{} (HTTP {})", e, response.status))
    })
}

#[derive(Deserialize)]
struct SchemaBody {
    schema: RawSchema,
}

#[derive(Deserialize)]
struct IdBody {
    id: SchemaId,
}

#[derive(Deserialize)]
struct SubjectVersionBody {
    subject: SubjectName,
    version: VersionNumber,
    id: SchemaId,
    schema: RawSchema,
}

impl From<SubjectVersionBody> for VersionedSchema {
    fn from(body: SubjectVersionBody) -> Self {
        VersionedSchema {
            subject: body.subject,
            version: body.version,
            schema: Schema::new(body.id, body.schema),
        }
    }
}

#[derive(Deserialize)]
struct CompatibilityBody {
    #[serde(alias = "compatibilityLevel")]
    compatibility: CompatibilityLevel,
}

#[derive(Deserialize)]
struct CompatibilityCheckBody {
    is_compatible: bool,
}

pub fn register(
    subject: &SubjectName,
    schema: &RawSchema,
    references: &[SchemaReference],
) -> Call<SchemaId> {
    Call::new(request::register(subject, schema, references), |r| {
        Ok(body::<IdBody>(r)?.id)
    })
}

/// Resolve the subject version (and id) under which `schema` is registered
pub fn lookup(subject: &SubjectName, schema: &RawSchema) -> Call<VersionedSchema> {
    Call::new(request::check_schema_registered(subject, schema), |r| {
        Ok(body::<SubjectVersionBody>(r)?.into())
    })
}

pub fn schema_for_id(id: SchemaId) -> Call<Schema> {
    Call::new(request::schema_by_id(id), move |r| {
        Ok(Schema::new(id, body::<SchemaBody>(r)?.schema))
    })
}

pub fn subject_version(subject: &SubjectName, version: VersionId) -> Call<VersionedSchema> {
    Call::new(request::subject_version(subject, version), |r| {
        Ok(body::<SubjectVersionBody>(r)?.into())
    })
}

pub fn default_compatibility() -> Call<CompatibilityLevel> {
    Call::new(request::default_compatibility(), |r| {
        Ok(body::<CompatibilityBody>(r)?.compatibility)
    })
}

pub fn set_default_compatibility(level: CompatibilityLevel) -> Call<CompatibilityLevel> {
    Call::new(request::set_default_compatibility(level), |r| {
        Ok(body::<CompatibilityBody>(r)?.compatibility)
    })
}

pub fn subject_compatibility(subject: &SubjectName) -> Call<CompatibilityLevel> {
    Call::new(request::subject_compatibility(subject), |r| {
        Ok(body::<CompatibilityBody>(r)?.compatibility)
    })
}

pub fn set_subject_compatibility(
    subject: &SubjectName,
    level: CompatibilityLevel,
) -> Call<CompatibilityLevel> {
    Call::new(request::set_subject_compatibility(subject, level), |r| {
        Ok(body::<CompatibilityBody>(r)?.compatibility)
    })
}

pub fn subjects() -> Call<Vec<SubjectName>> {
    Call::new(request::subjects(), |r| body(r))
}

pub fn subject_versions(subject: &SubjectName) -> Call<Vec<VersionNumber>> {
    Call::new(request::subject_versions(subject), |r| body(r))
}

pub fn check_compatibility(
    subject: &SubjectName,
    version: VersionId,
    schema: &RawSchema,
) -> Call<bool> {
    Call::new(request::check_compatibility(subject, version, schema), |r| {
        Ok(body::<CompatibilityCheckBody>(r)?.is_compatible)
    })
}

pub fn delete_subject(subject: &SubjectName, permanent: bool) -> Call<Vec<VersionNumber>> {
    Call::new(request::delete_subject(subject, permanent), |r| body(r))
}

pub fn delete_subject_version(
    subject: &SubjectName,
    version: VersionId,
    permanent: bool,
) -> Call<VersionNumber> {
    Call::new(
        request::delete_subject_version(subject, version, permanent),
        |r| body(r),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(body: &str) -> Response {
        Response::new(200, body)
    }

    #[test]
    fn test_schema_body_round_trip() {
        let id = SchemaId::new(1).unwrap();
        let schema = schema_for_id(id)
            .complete(ok(r#"{"schema": "{\"type\": \"string\"}"}"#), &ErrorMapper::new())
            .unwrap();
        assert_eq!(schema.id, id);
        assert_eq!(schema.raw.as_str(), r#"{"type": "string"}"#);
    }

    #[test]
    fn test_subject_version_body() {
        let subject = SubjectName::new("orders").unwrap();
        let versioned = subject_version(&subject, VersionId::Latest)
            .complete(
                ok(r#"{"subject":"orders","version":3,"id":21,"schema":"\"string\""}"#),
                &ErrorMapper::new(),
            )
            .unwrap();
        assert_eq!(versioned.subject, subject);
        assert_eq!(versioned.version.get(), 3);
        assert_eq!(versioned.id().get(), 21);
    }

    #[test]
    fn test_config_body_accepts_both_field_names() {
        let get = default_compatibility()
            .complete(ok(r#"{"compatibilityLevel":"BACKWARD"}"#), &ErrorMapper::new())
            .unwrap();
        assert_eq!(get, CompatibilityLevel::Backward);

        let put = set_default_compatibility(CompatibilityLevel::Full)
            .complete(ok(r#"{"compatibility":"FULL"}"#), &ErrorMapper::new())
            .unwrap();
        assert_eq!(put, CompatibilityLevel::Full);
    }

    #[test]
    fn test_error_status_goes_through_mapper() {
        let err = schema_for_id(SchemaId::new(9).unwrap())
            .complete(
                Response::new(404, r#"{"error_code":40403,"message":"Schema not found"}"#),
                &ErrorMapper::new(),
            )
            .unwrap_err();
        assert!(matches!(err, RegistryError::SchemaNotFound { .. }));
    }

    #[test]
    fn test_undecodable_success_body_is_malformed() {
        let err = register(
            &SubjectName::new("s").unwrap(),
            &RawSchema::parse("{}").unwrap(),
            &[],
        )
        .complete(ok(r#"{"id": -4}"#), &ErrorMapper::new())
        .unwrap_err();
        assert!(matches!(err, RegistryError::MalformedResponse(_)));
    }

    #[test]
    fn test_list_bodies() {
        let subjects = subjects()
            .complete(ok(r#"["a","b"]"#), &ErrorMapper::new())
            .unwrap();
        assert_eq!(subjects.len(), 2);

        let deleted = delete_subject(&SubjectName::new("a").unwrap(), false)
            .complete(ok("[1,2,3]"), &ErrorMapper::new())
            .unwrap();
        assert_eq!(deleted.iter().map(|v| v.get()).collect::<Vec<_>>(), vec![1, 2, 3]);

        let compatible = check_compatibility(
            &SubjectName::new("a").unwrap(),
            VersionId::Latest,
            &RawSchema::parse("{}").unwrap(),
        )
        .complete(ok(r#"{"is_compatible":true}"#), &ErrorMapper::new())
        .unwrap();
        assert!(compatible);
    }
}
