//! reqwest-backed transports

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::{AsyncTransport, Response, Transport};
use crate::error::TransportError;
use crate::request::{Method, Request};

/// Credentials sent with every request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Auth {
    Basic { username: String, password: String },
    Bearer { token: String },
}

/// Connection settings shared by both transports
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub base_url: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub auth: Option<Auth>,
}

impl HttpSettings {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            auth: None,
        }
    }

    fn url(&self, request: &Request) -> String {
        format!("{}{}", self.base_url, request.path_and_query())
    }
}

fn method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn failure(request: &Request, error: reqwest::Error) -> TransportError {
    let kind = if error.is_timeout() {
        "timed out"
    } else if error.is_connect() {
        "could not connect"
    } else {
        "failed"
    };
    TransportError::with_source(format!("{} {} {}", request.method, request.path, kind), error)
}

/// Async transport over a shared [`reqwest::Client`]
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    settings: HttpSettings,
}

impl ReqwestTransport {
    pub fn new(settings: HttpSettings) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(|e| TransportError::with_source("failed to build HTTP client", e))?;
        Ok(Self { client, settings })
    }
}

#[async_trait]
impl AsyncTransport for ReqwestTransport {
    async fn send(&self, request: &Request) -> Result<Response, TransportError> {
        let mut builder = self
            .client
            .request(method(request.method), self.settings.url(request));
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match &self.settings.auth {
            Some(Auth::Basic { username, password }) => {
                builder.basic_auth(username, Some(password))
            }
            Some(Auth::Bearer { token }) => builder.bearer_auth(token),
            None => builder,
        };
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        debug!(method = %request.method, path = %request.path, "sending registry request");
        let response = builder.send().await.map_err(|e| failure(request, e))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| failure(request, e))?;
        debug!(method = %request.method, path = %request.path, status, "registry responded");
        Ok(Response { status, body })
    }
}

/// Blocking transport over [`reqwest::blocking::Client`]
///
/// Must not be constructed or used from inside an async runtime.
#[derive(Debug, Clone)]
pub struct BlockingReqwestTransport {
    client: reqwest::blocking::Client,
    settings: HttpSettings,
}

impl BlockingReqwestTransport {
    pub fn new(settings: HttpSettings) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(settings.timeout)
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(|e| TransportError::with_source("failed to build HTTP client", e))?;
        Ok(Self { client, settings })
    }
}

impl Transport for BlockingReqwestTransport {
    fn send(&self, request: &Request) -> Result<Response, TransportError> {
        let mut builder = self
            .client
            .request(method(request.method), self.settings.url(request));
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match &self.settings.auth {
            Some(Auth::Basic { username, password }) => {
                builder.basic_auth(username, Some(password))
            }
            Some(Auth::Bearer { token }) => builder.bearer_auth(token),
            None => builder,
        };
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        debug!(method = %request.method, path = %request.path, "sending registry request");
        let response = builder.send().map_err(|e| failure(request, e))?;
        let status = response.status().as_u16();
        let body = response.text().map_err(|e| failure(request, e))?;
        debug!(method = %request.method, path = %request.path, status, "registry responded");
        Ok(Response { status, body })
    }
}
