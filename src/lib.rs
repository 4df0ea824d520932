//! Schema Registry Client
//!
//! A client for Confluent-compatible schema registries: register schemas,
//! resolve ids and versions, and manage compatibility levels. Every operation
//! is available both as an async call and as a blocking call, and either form
//! can be wrapped in a cache that remembers immutable facts.
//!
//! ## Features
//!
//! - **Validated Inputs**: ids, versions, subjects and schema text are checked before any I/O
//! - **Typed Errors**: registry `error_code`s map onto [`RegistryError`] variants
//! - **Two Execution Models**: [`Registry`] (async) and [`BlockingRegistry`] (blocking)
//! - **Pluggable Caching**: in-memory, LRU or on-disk backends behind [`CacheAdapter`]
//!
//! ## Architecture
//!
//! ```text
//! request      ──► pure request descriptions
//! transport    ──► Transport / AsyncTransport (reqwest)
//! error_mapper ──► registry error bodies -> RegistryError
//! registry     ──► HttpRegistry, BlockingHttpRegistry, BlockingBridge, CachingRegistry
//! cache        ──► CacheAdapter backends
//! ```

pub mod cache;
pub mod checksum;
pub mod client;
pub mod config;
pub mod error;
pub mod error_mapper;
pub mod registry;
pub mod request;
pub mod schema;
pub mod transport;
pub mod version;

pub use cache::CacheAdapter;
pub use checksum::{Checksum, HashAlgorithm, SchemaHasher};
pub use client::{connect, connect_blocking, SetupError};
pub use config::ClientConfig;
pub use error::{CacheError, RegistryError, Result, TransportError, ValidationError};
pub use error_mapper::ErrorMapper;
pub use registry::{
    BlockingBridge, BlockingHttpRegistry, BlockingRegistry, CachingRegistry, HttpRegistry,
    Registry,
};
pub use schema::{
    CompatibilityLevel, RawSchema, Schema, SchemaId, SchemaReference, SubjectName, VersionedSchema,
};
pub use version::{VersionId, VersionNumber};
