//! Cache error types.
//!
//! Absence of a key is a tagged variant rather than a shared sentinel value, so
//! every backend reports it the same way and callers match on the kind.

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The key has no live entry (never set, expired, or deleted).
    #[error("Key not found: {key}")]
    NotFound {
        /// The key that was looked up.
        key: String,
    },

    /// Failed to obtain a connection to the cache backend.
    #[error("Connection error: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
    },

    /// The backend accepted the connection but the command failed.
    #[error("Backend error: {message}")]
    Backend {
        /// Description of the backend error.
        message: String,
    },
}

impl CacheError {
    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Creates a new `Connection` error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a new `Backend` error.
    #[must_use]
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    /// Returns `true` if the key simply has no live entry.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if the backend itself is unhealthy.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Connection { .. } | Self::Backend { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CacheError::not_found("oat:access:abc");
        assert_eq!(err.to_string(), "Key not found: oat:access:abc");

        let err = CacheError::connection("pool timed out");
        assert_eq!(err.to_string(), "Connection error: pool timed out");
    }

    #[test]
    fn test_error_predicates() {
        assert!(CacheError::not_found("k").is_not_found());
        assert!(!CacheError::not_found("k").is_unavailable());
        assert!(CacheError::backend("WRONGTYPE").is_unavailable());
        assert!(!CacheError::connection("refused").is_not_found());
    }
}
