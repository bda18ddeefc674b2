//! Cache backend configuration and construction.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::CacheResult;
use crate::local::{DEFAULT_SWEEP_THRESHOLD, LocalCache};
use crate::redis::RedisCache;
use crate::traits::Cache;

/// Which cache backend stores token entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackendKind {
    /// In-process map; tokens do not survive restarts or cross instances.
    #[default]
    Local,
    /// Shared Redis instance.
    Redis,
}

impl std::fmt::Display for CacheBackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Redis => write!(f, "redis"),
        }
    }
}

/// Cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Backend selection.
    #[serde(default)]
    pub backend: CacheBackendKind,

    /// Redis connection URL (e.g., "redis://localhost:6379")
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Connection pool size
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,

    /// Connection timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Local backend: map size at which writes start sweeping expired entries
    #[serde(default = "default_sweep_threshold")]
    pub sweep_threshold: usize,
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_pool_size() -> usize {
    10
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_sweep_threshold() -> usize {
    DEFAULT_SWEEP_THRESHOLD
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackendKind::default(),
            redis_url: default_redis_url(),
            pool_size: default_pool_size(),
            timeout_ms: default_timeout_ms(),
            sweep_threshold: default_sweep_threshold(),
        }
    }
}

impl CacheConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.backend == CacheBackendKind::Local && self.sweep_threshold == 0 {
            return Err("cache.sweep_threshold must be > 0".into());
        }
        if self.backend == CacheBackendKind::Redis {
            if self.redis_url.trim().is_empty() {
                return Err("cache.redis_url must be set when cache.backend = \"redis\"".into());
            }
            if self.pool_size == 0 {
                return Err("cache.pool_size must be > 0".into());
            }
            if self.timeout_ms == 0 {
                return Err("cache.timeout_ms must be > 0".into());
            }
        }
        Ok(())
    }
}

/// Create a cache backend based on configuration.
///
/// A Redis backend is checked with a `PING` before it is returned. There is no
/// fallback to the local map when Redis is unreachable: another instance could
/// still accept a token revoked here.
///
/// # Errors
///
/// Returns an error if the Redis pool cannot be created or the server does not
/// answer.
pub async fn create_cache(config: &CacheConfig) -> CacheResult<Arc<dyn Cache>> {
    match config.backend {
        CacheBackendKind::Local => {
            tracing::info!(sweep_threshold = config.sweep_threshold, "using local token cache");
            Ok(Arc::new(LocalCache::with_sweep_threshold(config.sweep_threshold)))
        }
        CacheBackendKind::Redis => {
            tracing::info!(pool_size = config.pool_size, "connecting to Redis");
            let cache = RedisCache::from_config(config)?;
            cache.ping().await?;
            tracing::info!("connected to Redis");
            Ok(Arc::new(cache))
        }
    }
}
