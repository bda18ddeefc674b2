//! In-process cache backend built on `DashMap`.
//!
//! Suitable for single-instance deployments and tests. Expired entries are
//! treated as absent on read and removed lazily. Once the map reaches its
//! sweep threshold, the next write runs [`LocalCache::cleanup_expired`] over
//! the whole map.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::CacheResult;
use crate::error::CacheError;
use crate::traits::Cache;

/// A cached entry with TTL support.
#[derive(Clone, Debug)]
pub struct CachedEntry {
    pub data: Arc<Vec<u8>>,
    pub cached_at: Instant,
    pub ttl: Duration,
}

impl CachedEntry {
    /// Create a new cached entry.
    pub fn new(data: Vec<u8>, ttl: Duration) -> Self {
        Self {
            data: Arc::new(data),
            cached_at: Instant::now(),
            ttl,
        }
    }

    /// Check if this entry has expired.
    pub fn is_expired(&self) -> bool {
        self.cached_at.elapsed() >= self.ttl
    }
}

/// Map size at which a write first triggers a sweep of expired entries.
pub const DEFAULT_SWEEP_THRESHOLD: usize = 10_000;

/// Single-instance cache backed by a concurrent map.
///
/// Cloning is cheap and clones share the same map.
#[derive(Clone, Debug)]
pub struct LocalCache {
    entries: Arc<DashMap<String, CachedEntry>>,
    sweep_threshold: usize,
    /// Map size at which the next write sweeps. Grows with the live set so a
    /// map full of unexpired entries is not rescanned on every write.
    next_sweep_at: Arc<AtomicUsize>,
}

impl Default for LocalCache {
    fn default() -> Self {
        Self::with_sweep_threshold(DEFAULT_SWEEP_THRESHOLD)
    }
}

impl LocalCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty cache that sweeps once it holds `threshold` entries.
    #[must_use]
    pub fn with_sweep_threshold(threshold: usize) -> Self {
        let threshold = threshold.max(1);
        Self {
            entries: Arc::new(DashMap::new()),
            sweep_threshold: threshold,
            next_sweep_at: Arc::new(AtomicUsize::new(threshold)),
        }
    }

    /// Number of entries currently held, including expired ones not yet swept.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every expired entry and returns how many were dropped.
    pub fn cleanup_expired(&self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            tracing::debug!(removed, "swept expired cache entries");
        }
        removed
    }

    fn sweep_if_full(&self) {
        if self.entries.len() < self.next_sweep_at.load(Ordering::Relaxed) {
            return;
        }
        self.cleanup_expired();
        let next = self.sweep_threshold.max(self.entries.len().saturating_mul(2));
        self.next_sweep_at.store(next, Ordering::Relaxed);
    }
}

#[async_trait]
impl Cache for LocalCache {
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> CacheResult<()> {
        self.sweep_if_full();
        self.entries
            .insert(key.to_string(), CachedEntry::new(value, ttl));
        Ok(())
    }

    async fn get(&self, key: &str) -> CacheResult<Vec<u8>> {
        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired() {
                return Ok(entry.data.as_ref().clone());
            }
            drop(entry);
            // Only drop the entry if it is still the expired one; a concurrent
            // set may have replaced it in between.
            self.entries.remove_if(key, |_, entry| entry.is_expired());
        }
        Err(CacheError::not_found(key))
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}
