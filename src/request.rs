//! Request construction for every registry operation
//!
//! Pure functions: each takes already-validated value types and returns a
//! transport-agnostic [`Request`]. Nothing here performs IO.

use serde::Serialize;
use serde_json::json;
use std::fmt;

use crate::schema::{CompatibilityLevel, RawSchema, SchemaId, SchemaReference, SubjectName};
use crate::version::VersionId;

/// Media type of the registry's v1 API
pub const CONTENT_TYPE: &str = "application/vnd.schemaregistry.v1+json";

/// HTTP method of a registry request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request to the registry, relative to its base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    /// Path with percent-encoded segments, always starting with `/`
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl Request {
    fn new(method: Method, path: String) -> Self {
        Self {
            method,
            path,
            query: Vec::new(),
            headers: vec![("Accept".to_string(), CONTENT_TYPE.to_string())],
            body: None,
        }
    }

    fn with_body(mut self, body: serde_json::Value) -> Self {
        self.headers
            .push(("Content-Type".to_string(), CONTENT_TYPE.to_string()));
        self.body = Some(body.to_string());
        self
    }

    fn with_permanent(mut self, permanent: bool) -> Self {
        if permanent {
            self.query.push(("permanent".to_string(), "true".to_string()));
        }
        self
    }

    /// Path plus query string
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query: Vec<String> = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect();
        format!("{}?{}", self.path, query.join("&"))
    }

    /// Value of a header, matched case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

fn subject_path(subject: &SubjectName) -> String {
    format!("/subjects/{}", urlencoding::encode(subject.as_str()))
}

#[derive(Serialize)]
struct ReferenceBody<'a> {
    name: &'a str,
    subject: &'a str,
    version: u32,
}

pub fn subjects() -> Request {
    Request::new(Method::Get, "/subjects".to_string())
}

pub fn subject_versions(subject: &SubjectName) -> Request {
    Request::new(Method::Get, format!("{}/versions", subject_path(subject)))
}

pub fn subject_version(subject: &SubjectName, version: VersionId) -> Request {
    Request::new(
        Method::Get,
        format!("{}/versions/{}", subject_path(subject), version),
    )
}

pub fn register(
    subject: &SubjectName,
    schema: &RawSchema,
    references: &[SchemaReference],
) -> Request {
    let references: Vec<ReferenceBody<'_>> = references
        .iter()
        .map(|r| ReferenceBody {
            name: &r.name,
            subject: r.subject.as_str(),
            version: r.version.get(),
        })
        .collect();
    Request::new(Method::Post, format!("{}/versions", subject_path(subject))).with_body(json!({
        "schema": schema.as_str(),
        "references": references,
    }))
}

/// Look up whether `schema` is already registered under `subject`
pub fn check_schema_registered(subject: &SubjectName, schema: &RawSchema) -> Request {
    Request::new(Method::Post, subject_path(subject))
        .with_body(json!({ "schema": schema.as_str() }))
}

pub fn check_compatibility(
    subject: &SubjectName,
    version: VersionId,
    schema: &RawSchema,
) -> Request {
    Request::new(
        Method::Post,
        format!(
            "/compatibility/subjects/{}/versions/{}",
            urlencoding::encode(subject.as_str()),
            version
        ),
    )
    .with_body(json!({ "schema": schema.as_str() }))
}

pub fn schema_by_id(id: SchemaId) -> Request {
    Request::new(Method::Get, format!("/schemas/ids/{}", id))
}

pub fn default_compatibility() -> Request {
    Request::new(Method::Get, "/config".to_string())
}

pub fn set_default_compatibility(level: CompatibilityLevel) -> Request {
    Request::new(Method::Put, "/config".to_string())
        .with_body(json!({ "compatibility": level.as_str() }))
}

pub fn subject_compatibility(subject: &SubjectName) -> Request {
    Request::new(
        Method::Get,
        format!("/config/{}", urlencoding::encode(subject.as_str())),
    )
}

pub fn set_subject_compatibility(subject: &SubjectName, level: CompatibilityLevel) -> Request {
    Request::new(
        Method::Put,
        format!("/config/{}", urlencoding::encode(subject.as_str())),
    )
    .with_body(json!({ "compatibility": level.as_str() }))
}

pub fn delete_subject(subject: &SubjectName, permanent: bool) -> Request {
    Request::new(Method::Delete, subject_path(subject)).with_permanent(permanent)
}

pub fn delete_subject_version(
    subject: &SubjectName,
    version: VersionId,
    permanent: bool,
) -> Request {
    Request::new(
        Method::Delete,
        format!("{}/versions/{}", subject_path(subject), version),
    )
    .with_permanent(permanent)
}
