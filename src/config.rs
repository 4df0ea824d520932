//! Configuration management for the registry client
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (schema-registry.toml)
//! - Environment variables (SCHEMA_REGISTRY__*)
//!
//! ## Example config file (schema-registry.toml):
//! ```toml
//! [registry]
//! url = "http://localhost:8081"
//! timeout_secs = 30
//! connect_timeout_secs = 10
//!
//! [registry.auth]
//! type = "basic"
//! username = "svc-orders"
//! password = "secret"
//!
//! [cache]
//! backend = "file"
//! directory = "/var/cache/schema-registry"
//! hash = "sha256"
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheAdapter, FileStore, LruStore, MemoryCacheAdapter, StoreCacheAdapter};
use crate::checksum::HashAlgorithm;
use crate::error::CacheError;
use crate::transport::{Auth, HttpSettings};

/// Main configuration for the registry client
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ClientConfig {
    /// Registry connection settings
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Schema cache settings
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Registry connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Base URL of the registry
    #[serde(default = "default_url")]
    pub url: String,

    /// Whole-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Credentials, if the registry requires them
    #[serde(default)]
    pub auth: Option<Auth>,
}

/// Which cache backend the client uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// No caching; every call reaches the registry
    None,
    #[default]
    Memory,
    /// In-process, bounded by `capacity`
    Lru,
    /// Persistent, one file per entry under `directory`
    File,
}

/// Schema cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub backend: CacheBackend,

    /// Entry limit for the lru backend
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Directory for the file backend (defaults to the user cache dir)
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// Digest used for the hash -> id namespace
    #[serde(default)]
    pub hash: HashAlgorithm,
}

// Default value functions
fn default_url() -> String {
    "http://localhost:8081".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_capacity() -> usize {
    10_000
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            auth: None,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::default(),
            capacity: default_capacity(),
            directory: None,
            hash: HashAlgorithm::default(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from a specific file
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        // Load from default locations
        let config_locations = [
            "schema-registry.toml",
            ".schema-registry.toml",
            "config/schema-registry.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // Load from XDG config directory
        if let Some(dirs) = project_dirs() {
            let xdg_config = dirs.config_dir().join("schema-registry.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        // Load from specified path
        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Load from environment variables (SCHEMA_REGISTRY__*)
        builder = builder.add_source(
            Environment::with_prefix("SCHEMA_REGISTRY")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Transport settings derived from the `[registry]` section
    pub fn http_settings(&self) -> HttpSettings {
        let mut settings = HttpSettings::new(&self.registry.url);
        settings.timeout = Duration::from_secs(self.registry.timeout_secs);
        settings.connect_timeout = Duration::from_secs(self.registry.connect_timeout_secs);
        settings.auth = self.registry.auth.clone();
        settings
    }

    /// Directory the file backend writes to
    pub fn cache_directory(&self) -> PathBuf {
        match &self.cache.directory {
            Some(dir) => dir.clone(),
            None => project_dirs()
                .map(|dirs| dirs.cache_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".schema-registry-cache")),
        }
    }

    /// Build the configured cache backend, or `None` when caching is off
    pub fn build_cache(&self) -> Result<Option<Arc<dyn CacheAdapter>>, CacheError> {
        let cache: Arc<dyn CacheAdapter> = match self.cache.backend {
            CacheBackend::None => return Ok(None),
            CacheBackend::Memory => Arc::new(MemoryCacheAdapter::new()),
            CacheBackend::Lru => {
                Arc::new(StoreCacheAdapter::new(LruStore::new(self.cache.capacity)))
            }
            CacheBackend::File => {
                Arc::new(StoreCacheAdapter::new(FileStore::open(self.cache_directory())?))
            }
        };
        Ok(Some(cache))
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", "schema-registry")
}
