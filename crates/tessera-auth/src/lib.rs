//! # tessera-auth
//!
//! Stateless-credential tokens backed by a shared TTL store.
//!
//! This crate provides:
//! - Opaque access tokens: random identity, payload held in the store
//! - Single-purpose tokens: payload as identity, explicitly revocable
//! - HMAC-SHA256 signing with constant-time verification
//! - URL-safe transport encoding
//!
//! ## Overview
//!
//! A token is `base64url("<identity>.<signature>")`. The signature proves the
//! identity was issued with our secret; the store decides whether it is still
//! live. Signature validity alone never makes a token valid.
//!
//! ## Modules
//!
//! - [`config`] - signing secrets and default lifetimes
//! - [`error`] - token error taxonomy
//! - [`keys`] - typed cache key prefixes per token class
//! - [`security`] - signing, random, and encoding primitives
//! - [`token`] - the token service and wire format

pub mod config;
pub mod error;
pub mod keys;
pub mod security;
pub mod token;

pub use config::{SecurityConfig, TokenSecrets};
pub use error::{ErrorCategory, TokenError};
pub use keys::{OatPrefix, SptPrefix};
pub use token::{SignedIdentity, TokenClass, TokenService};

/// Type alias for token results.
pub type TokenResult<T> = Result<T, TokenError>;
