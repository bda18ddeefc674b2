//! # tessera-cache
//!
//! TTL key-value store used by Tessera as the source of truth for token
//! validity.
//!
//! - [`Cache`] - the async store contract (`set` / `get` / `delete`)
//! - [`LocalCache`] - in-process `DashMap` backend
//! - [`RedisCache`] - shared Redis backend via `deadpool-redis`
//! - [`create_cache`] - builds the configured backend

pub mod config;
pub mod error;
pub mod local;
pub mod redis;
pub mod traits;

pub use config::{CacheBackendKind, CacheConfig, create_cache};
pub use error::CacheError;
pub use local::{CachedEntry, DEFAULT_SWEEP_THRESHOLD, LocalCache};
pub use redis::RedisCache;
pub use traits::{Cache, KEY_SEPARATOR, generate_key};

/// Type alias for cache results.
pub type CacheResult<T> = Result<T, CacheError>;
