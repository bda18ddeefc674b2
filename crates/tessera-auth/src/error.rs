//! Token error types.
//!
//! Every verification failure surfaces as [`TokenError::InvalidToken`],
//! whichever check rejected the token. Store and random-source failures are
//! reported separately and never as `InvalidToken`.

use std::fmt;

use tessera_cache::CacheError;

/// Errors that can occur while issuing, verifying, or revoking tokens.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// The presented token must not be trusted: malformed, tampered, expired,
    /// revoked, or never issued.
    #[error("invalid or expired token")]
    InvalidToken,

    /// The caller passed an argument that can never produce a valid token.
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Description of the rejected input.
        message: String,
    },

    /// The token store failed.
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// The secure random source failed.
    #[error("Random source error: {message}")]
    Random {
        /// Description of the random source error.
        message: String,
    },

    /// An unexpected internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl TokenError {
    /// Creates a new `InvalidInput` error.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates a new `Random` error.
    #[must_use]
    pub fn random(message: impl Into<String>) -> Self {
        Self::Random {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if the token was rejected.
    #[must_use]
    pub fn is_invalid_token(&self) -> bool {
        matches!(self, Self::InvalidToken)
    }

    /// Returns `true` if this is a client error (4xx category).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidToken | Self::InvalidInput { .. })
    }

    /// Returns `true` if this is a server error (5xx category).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        !self.is_client_error()
    }

    /// Returns the error category for logging/monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidToken => ErrorCategory::Token,
            Self::InvalidInput { .. } => ErrorCategory::Validation,
            Self::Cache(_) | Self::Random { .. } => ErrorCategory::Infrastructure,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Returns the HTTP status code a handler should answer with.
    #[must_use]
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidToken => 401,
            Self::InvalidInput { .. } => 400,
            Self::Cache(_) => 503,
            Self::Random { .. } | Self::Internal { .. } => 500,
        }
    }
}

/// Categories of token errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The presented token was rejected.
    Token,
    /// Request validation errors.
    Validation,
    /// Infrastructure/storage errors.
    Infrastructure,
    /// Internal server errors.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token => write!(f, "token"),
            Self::Validation => write!(f, "validation"),
            Self::Infrastructure => write!(f, "infrastructure"),
            Self::Internal => write!(f, "internal"),
        }
    }
}
