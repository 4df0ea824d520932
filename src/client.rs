//! Assemble a ready-to-use registry from a [`ClientConfig`]

use thiserror::Error;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{CacheError, TransportError};
use crate::registry::{
    BlockingHttpRegistry, BlockingRegistry, CachingRegistry, HttpRegistry, Registry,
};
use crate::transport::{BlockingReqwestTransport, ReqwestTransport};

/// Failures while building a client, before any request is sent
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Failed to build transport: {0}")]
    Transport(#[from] TransportError),

    #[error("Failed to open cache: {0}")]
    Cache(#[from] CacheError),
}

/// Async registry over reqwest, wrapped in the configured cache
pub fn connect(config: &ClientConfig) -> Result<Box<dyn Registry>, SetupError> {
    let registry = HttpRegistry::new(ReqwestTransport::new(config.http_settings())?);
    debug!(url = %config.registry.url, backend = ?config.cache.backend, "connecting");

    Ok(match config.build_cache()? {
        Some(cache) => Box::new(
            CachingRegistry::new(registry, cache).with_hasher(config.cache.hash.hasher()),
        ),
        None => Box::new(registry),
    })
}

/// Blocking registry over reqwest's blocking client, wrapped in the configured cache
///
/// Must not be called from inside an async runtime; reqwest's blocking client
/// refuses to run there.
pub fn connect_blocking(config: &ClientConfig) -> Result<Box<dyn BlockingRegistry>, SetupError> {
    let registry =
        BlockingHttpRegistry::new(BlockingReqwestTransport::new(config.http_settings())?);
    debug!(url = %config.registry.url, backend = ?config.cache.backend, "connecting (blocking)");

    Ok(match config.build_cache()? {
        Some(cache) => Box::new(
            CachingRegistry::new(registry, cache).with_hasher(config.cache.hash.hasher()),
        ),
        None => Box::new(registry),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheBackend;
    use crate::error::RegistryError;
    use crate::schema::SchemaId;

    #[tokio::test]
    async fn test_connect_reports_transport_failure_on_use() {
        let mut config = ClientConfig::default();
        config.registry.url = "http://127.0.0.1:1".into();
        config.registry.connect_timeout_secs = 1;
        config.cache.backend = CacheBackend::Memory;

        let registry = connect(&config).unwrap();
        let err = registry
            .schema_for_id(SchemaId::new(1).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::Transport(_)));
    }

    #[test]
    fn test_connect_blocking_with_file_cache() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ClientConfig::default();
        config.cache.backend = CacheBackend::File;
        config.cache.directory = Some(dir.path().to_path_buf());

        assert!(connect_blocking(&config).is_ok());
    }
}
