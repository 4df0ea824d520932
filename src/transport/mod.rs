//! The injected HTTP capability
//!
//! A transport turns a [`Request`] into a [`Response`]. Any HTTP status counts
//! as a response; only a failure to obtain one is a [`TransportError`].

use async_trait::async_trait;

use crate::error::TransportError;
use crate::request::Request;

pub mod http;

pub use http::{Auth, BlockingReqwestTransport, HttpSettings, ReqwestTransport};

/// Status and body of a registry response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Blocking transport: suspends the calling thread until the registry answers
pub trait Transport: Send + Sync {
    fn send(&self, request: &Request) -> Result<Response, TransportError>;
}

/// Non-blocking transport, driven by the caller's async runtime
#[async_trait]
pub trait AsyncTransport: Send + Sync {
    async fn send(&self, request: &Request) -> Result<Response, TransportError>;
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn send(&self, request: &Request) -> Result<Response, TransportError> {
        (**self).send(request)
    }
}

#[async_trait]
impl<T: AsyncTransport + ?Sized> AsyncTransport for std::sync::Arc<T> {
    async fn send(&self, request: &Request) -> Result<Response, TransportError> {
        (**self).send(request).await
    }
}
