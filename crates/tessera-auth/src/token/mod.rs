//! Token issuance, verification, and revocation.
//!
//! - [`service`] - the token service over a TTL store
//! - [`wire`] - `<identity>.<signature>` encoding shared by both token classes

pub mod service;
pub mod wire;

pub use service::{OAT_IDENTITY_LENGTH, TokenClass, TokenService};
pub use wire::{SEPARATOR, SignedIdentity};
