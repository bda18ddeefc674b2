//! Redis cache backend for multi-instance deployments.
//!
//! Every command is awaited and its failure returned to the caller. Token
//! validity is decided by this store, so writes and deletes are never
//! fire-and-forget and there is no per-instance L1 layer that could serve a
//! revoked entry.

use std::time::Duration;

use async_trait::async_trait;
use deadpool_redis::redis::{self, AsyncCommands};
use deadpool_redis::{Config as PoolConfig, Pool, Runtime};

use crate::CacheResult;
use crate::config::CacheConfig;
use crate::error::CacheError;
use crate::traits::Cache;

/// Cache backed by a shared Redis instance.
#[derive(Clone)]
pub struct RedisCache {
    pool: Pool,
}

impl RedisCache {
    /// Wraps an existing connection pool.
    #[must_use]
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Builds a connection pool from configuration.
    ///
    /// No connection is attempted; see [`RedisCache::ping`].
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Connection`] if the pool cannot be created.
    pub fn from_config(config: &CacheConfig) -> CacheResult<Self> {
        let timeout = Duration::from_millis(config.timeout_ms);
        let mut redis_config = PoolConfig::from_url(&config.redis_url);
        let mut pool_config = redis_config.get_pool_config();
        pool_config.max_size = config.pool_size;
        pool_config.timeouts.wait = Some(timeout);
        pool_config.timeouts.create = Some(timeout);
        pool_config.timeouts.recycle = Some(timeout);
        redis_config.pool = Some(pool_config);

        let pool = redis_config
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| CacheError::connection(format!("failed to create Redis pool: {e}")))?;

        Ok(Self::new(pool))
    }

    /// Checks that a connection can be obtained and the server answers.
    ///
    /// # Errors
    ///
    /// Returns an error if Redis is unreachable.
    pub async fn ping(&self) -> CacheResult<()> {
        let mut conn = self.connection().await?;
        let _: String = redis::cmd("PING")
            .query_async(&mut *conn)
            .await
            .map_err(|e| CacheError::backend(e.to_string()))?;
        Ok(())
    }

    async fn connection(&self) -> CacheResult<deadpool_redis::Connection> {
        self.pool.get().await.map_err(|e| {
            tracing::warn!(error = %e, "failed to get Redis connection");
            CacheError::connection(e.to_string())
        })
    }
}

/// Redis rejects a zero expiry; sub-millisecond TTLs round up to one.
fn ttl_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1)
}

#[async_trait]
impl Cache for RedisCache {
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> CacheResult<()> {
        let mut conn = self.connection().await?;
        conn.pset_ex::<_, _, ()>(key, value, ttl_millis(ttl))
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Redis PSETEX error");
                CacheError::backend(e.to_string())
            })
    }

    async fn get(&self, key: &str) -> CacheResult<Vec<u8>> {
        let mut conn = self.connection().await?;
        match conn.get::<_, Option<Vec<u8>>>(key).await {
            Ok(Some(data)) => Ok(data),
            Ok(None) => Err(CacheError::not_found(key)),
            Err(e) => {
                tracing::warn!(error = %e, "Redis GET error");
                Err(CacheError::backend(e.to_string()))
            }
        }
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        let mut conn = self.connection().await?;
        conn.del::<_, ()>(key).await.map_err(|e| {
            tracing::warn!(error = %e, "Redis DEL error");
            CacheError::backend(e.to_string())
        })
    }
}
