//! Translation of failed registry responses into [`RegistryError`]s

use serde::Deserialize;
use tracing::warn;

use crate::error::{RegistryError, TransportError};
use crate::transport::Response;

/// Longest slice of an undecodable body kept in an error message
const MAX_BODY_EXCERPT: usize = 256;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error_code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
}

/// Maps non-success responses and transport failures to typed errors
///
/// Mapping never fails itself: an absent or unparsable body degrades to
/// [`RegistryError::UnmappedServer`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorMapper;

impl ErrorMapper {
    pub fn new() -> Self {
        Self
    }

    /// Map a response whose status is not 2xx
    pub fn map_response(&self, response: &Response) -> RegistryError {
        let body = match serde_json::from_str::<ErrorBody>(&response.body) {
            Ok(body) => body,
            Err(_) => {
                return RegistryError::UnmappedServer {
                    status: response.status,
                    error_code: None,
                    message: excerpt(&response.body),
                }
            }
        };

        let message = body.message.unwrap_or_default();
        match body.error_code {
            Some(code) => match Self::map_code(code, message) {
                Ok(error) => error,
                Err(message) => {
                    warn!(status = response.status, code, "unrecognized registry error code");
                    RegistryError::UnmappedServer {
                        status: response.status,
                        error_code: Some(code),
                        message,
                    }
                }
            },
            None => RegistryError::UnmappedServer {
                status: response.status,
                error_code: None,
                message,
            },
        }
    }

    /// Wrap a failure that produced no response at all
    pub fn map_transport(&self, error: TransportError) -> RegistryError {
        RegistryError::Transport(error)
    }

    /// The closed error-code table; hands the message back when the code is unknown
    fn map_code(code: i64, message: String) -> Result<RegistryError, String> {
        let error = match code {
            409 => RegistryError::IncompatibleSchema { message },
            50001 => RegistryError::BackendDatastore { message },
            50002 => RegistryError::OperationTimedOut { message },
            50003 => RegistryError::LeaderForwarding { message },
            42201 => RegistryError::InvalidSchema { message },
            42202 => RegistryError::InvalidVersion { message },
            42203 => RegistryError::InvalidCompatibilityLevel { message },
            40401 => RegistryError::SubjectNotFound { message },
            40402 => RegistryError::VersionNotFound { message },
            40403 => RegistryError::SchemaNotFound { message },
            _ => return Err(message),
        };
        Ok(error)
    }
}

fn excerpt(body: &str) -> String {
    if body.len() <= MAX_BODY_EXCERPT {
        return body.to_string();
    }
    let mut end = MAX_BODY_EXCERPT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
