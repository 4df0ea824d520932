//! Shared fixtures: a scripted transport that records every request it sees

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use schema_registry_client::request::{Method, Request};
use schema_registry_client::transport::{AsyncTransport, Response, Transport};
use schema_registry_client::{RawSchema, SchemaId, SubjectName, TransportError, VersionNumber};

/// Answers requests from a route table keyed by method and path-with-query
///
/// Unrouted requests get a 404 with an unknown error code, so a test that
/// forgets a route fails loudly instead of hanging.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<(String, String), Response>>,
    requests: Mutex<Vec<Request>>,
    failure: Mutex<Option<String>>,
    suspend: bool,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Async sends give up the task once before answering, so concurrent
    /// calls are all in flight before any of them completes
    pub fn suspending() -> Arc<Self> {
        Arc::new(Self {
            suspend: true,
            ..Self::default()
        })
    }

    pub fn route(&self, method: Method, path: &str, status: u16, body: impl Into<String>) {
        self.routes.lock().insert(
            (method.as_str().to_string(), path.to_string()),
            Response::new(status, body),
        );
    }

    /// Make every following request fail before reaching the "server"
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock() = Some(message.to_string());
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn last(&self) -> Request {
        self.requests
            .lock()
            .last()
            .cloned()
            .expect("no request was sent")
    }

    fn answer(&self, request: &Request) -> Result<Response, TransportError> {
        self.requests.lock().push(request.clone());
        if let Some(message) = self.failure.lock().clone() {
            return Err(TransportError::new(message));
        }
        let key = (request.method.as_str().to_string(), request.path_and_query());
        Ok(self.routes.lock().get(&key).cloned().unwrap_or_else(|| {
            Response::new(404, r#"{"error_code":404,"message":"HTTP 404 Not Found"}"#)
        }))
    }
}

impl Transport for MockTransport {
    fn send(&self, request: &Request) -> Result<Response, TransportError> {
        self.answer(request)
    }
}

#[async_trait]
impl AsyncTransport for MockTransport {
    async fn send(&self, request: &Request) -> Result<Response, TransportError> {
        let response = self.answer(request);
        if self.suspend {
            tokio::task::yield_now().await;
        }
        response
    }
}

pub fn subject(name: &str) -> SubjectName {
    SubjectName::new(name).unwrap()
}

pub fn schema(text: &str) -> RawSchema {
    RawSchema::parse(text).unwrap()
}

pub fn id(value: i64) -> SchemaId {
    SchemaId::new(value).unwrap()
}

pub fn version(value: i64) -> VersionNumber {
    VersionNumber::new(value).unwrap()
}

/// Body of `GET /subjects/{subject}/versions/{version}` and `POST /subjects/{subject}`
pub fn subject_version_body(subject: &str, version: u32, id: u32, schema: &str) -> String {
    serde_json::json!({
        "subject": subject,
        "version": version,
        "id": id,
        "schema": schema,
    })
    .to_string()
}

/// Body of `GET /schemas/ids/{id}`
pub fn schema_body(schema: &str) -> String {
    serde_json::json!({ "schema": schema }).to_string()
}

pub fn error_body(code: i64, message: &str) -> String {
    serde_json::json!({ "error_code": code, "message": message }).to_string()
}

pub const STRING_SCHEMA: &str = r#"{"type":"string"}"#;
pub const ORDER_SCHEMA: &str =
    r#"{"type":"record","name":"Order","fields":[{"name":"id","type":"long"}]}"#;
