//! Error types for the schema registry client

use thiserror::Error;

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Malformed input, rejected before anything reaches the network
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid schema id {0}: must be in 1..=2147483647")]
    InvalidSchemaId(i64),

    #[error("Invalid schema: not valid JSON ({0})")]
    InvalidSchemaJson(String),

    #[error("Invalid subject name: must not be blank")]
    BlankSubject,

    #[error("Invalid version {0}: must be in 1..=2147483647 or \"latest\"")]
    InvalidVersion(String),

    #[error("Unknown compatibility level: {0}")]
    UnknownCompatibilityLevel(String),

    #[error("Invalid schema reference: {0}")]
    InvalidReference(String),
}

/// No response was obtained from the registry (connect, DNS, client-side timeout)
#[derive(Error, Debug)]
#[error("{message}")]
pub struct TransportError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl TransportError {
    /// A transport failure without an underlying cause
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// A transport failure wrapping the error that caused it
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Failures raised by a cache backend
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cache entry could not be encoded or decoded: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("Cache entry is corrupt: {0}")]
    Corrupt(String),
}

/// Schema registry errors
///
/// Server errors form a closed set keyed by the `error_code` of the error body.
/// Anything the client cannot classify ends up in [`RegistryError::UnmappedServer`].
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Incompatible schema: {message}")]
    IncompatibleSchema { message: String },

    #[error("Backend datastore error: {message}")]
    BackendDatastore { message: String },

    #[error("Operation timed out on the server: {message}")]
    OperationTimedOut { message: String },

    #[error("Error while forwarding the request to the leader: {message}")]
    LeaderForwarding { message: String },

    #[error("Invalid schema: {message}")]
    InvalidSchema { message: String },

    #[error("Invalid version: {message}")]
    InvalidVersion { message: String },

    #[error("Invalid compatibility level: {message}")]
    InvalidCompatibilityLevel { message: String },

    #[error("Subject not found: {message}")]
    SubjectNotFound { message: String },

    #[error("Version not found: {message}")]
    VersionNotFound { message: String },

    #[error("Schema not found: {message}")]
    SchemaNotFound { message: String },

    #[error("Unmapped server error (HTTP {status}): {message}")]
    UnmappedServer {
        status: u16,
        error_code: Option<i64>,
        message: String,
    },

    #[error("Malformed registry response: {0}")]
    MalformedResponse(String),
}

impl RegistryError {
    /// The registry `error_code` this error was mapped from, if any
    pub fn error_code(&self) -> Option<i64> {
        match self {
            RegistryError::IncompatibleSchema { .. } => Some(409),
            RegistryError::BackendDatastore { .. } => Some(50001),
            RegistryError::OperationTimedOut { .. } => Some(50002),
            RegistryError::LeaderForwarding { .. } => Some(50003),
            RegistryError::InvalidSchema { .. } => Some(42201),
            RegistryError::InvalidVersion { .. } => Some(42202),
            RegistryError::InvalidCompatibilityLevel { .. } => Some(42203),
            RegistryError::SubjectNotFound { .. } => Some(40401),
            RegistryError::VersionNotFound { .. } => Some(40402),
            RegistryError::SchemaNotFound { .. } => Some(40403),
            RegistryError::UnmappedServer { error_code, .. } => *error_code,
            _ => None,
        }
    }

    /// Whether the server reported that the addressed subject, version or schema does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RegistryError::SubjectNotFound { .. }
                | RegistryError::VersionNotFound { .. }
                | RegistryError::SchemaNotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = TransportError::with_source("connect failed", io);
        assert_eq!(err.message(), "connect failed");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_error_codes() {
        let err = RegistryError::SchemaNotFound {
            message: "gone".into(),
        };
        assert_eq!(err.error_code(), Some(40403));
        assert!(err.is_not_found());

        let err = RegistryError::from(ValidationError::BlankSubject);
        assert_eq!(err.error_code(), None);
        assert!(!err.is_not_found());
    }
}
