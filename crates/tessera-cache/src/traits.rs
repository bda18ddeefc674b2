//! The TTL key-value store contract consumed by the token service.

use std::time::Duration;

use async_trait::async_trait;

use crate::CacheResult;

/// Separator between a key prefix and the identity it namespaces.
pub const KEY_SEPARATOR: char = ':';

/// Builds a namespaced cache key.
///
/// Under one prefix, distinct identities always map to distinct keys, and
/// distinct prefixes keep textually equal identities apart. Keys can still
/// coincide across prefixes when one prefix plus `:` starts the other and the
/// identity contains `:` (`"spt"` + `"reset:u"` and `"spt:reset"` + `"u"`).
///
/// ```
/// assert_eq!(tessera_cache::generate_key("oat:access", "abc"), "oat:access:abc");
/// ```
#[must_use]
pub fn generate_key(prefix: &str, identity: &str) -> String {
    let mut key = String::with_capacity(prefix.len() + identity.len() + 1);
    key.push_str(prefix);
    key.push(KEY_SEPARATOR);
    key.push_str(identity);
    key
}

/// A shared key-value store whose entries expire after a time-to-live.
///
/// Implementations must be safe for concurrent use and provide at least
/// read-your-writes consistency per key.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Stores `value` under `key`, replacing any previous entry and its TTL.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be reached or rejects the write.
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> CacheResult<()>;

    /// Returns the live value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::NotFound`](crate::CacheError::NotFound) if the key
    /// has no live entry, or another variant if the backend fails.
    async fn get(&self, key: &str) -> CacheResult<Vec<u8>>;

    /// Removes the entry under `key`.
    ///
    /// Deleting an absent or expired key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error only if the backend fails.
    async fn delete(&self, key: &str) -> CacheResult<()>;
}
