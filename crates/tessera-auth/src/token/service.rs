//! Token service for issuing, verifying, and revoking store-backed tokens.
//!
//! Two token classes share one wire format:
//!
//! - **Opaque access tokens (OAT)**: a fresh random identity keys the stored
//!   payload.
//! - **Single-purpose tokens (SPT)**: the payload is the identity; the store
//!   entry only marks it live and can be deleted to revoke it.
//!
//! A token verifies only while its signature matches *and* its store entry is
//! live. Every rejection is reported as [`TokenError::InvalidToken`]; store
//! outages surface as [`TokenError::Cache`].
//!
//! # Usage
//!
//! ```ignore
//! use tessera_auth::{OatPrefix, TokenSecrets, TokenService};
//!
//! let service = TokenService::new(TokenSecrets::new("oat-key", "spt-key"), cache);
//!
//! let token = service
//!     .generate_oat(&OatPrefix::ACCESS_TOKEN, "session:7", Duration::from_secs(3600))
//!     .await?;
//! let payload = service.verify_oat(&OatPrefix::ACCESS_TOKEN, &token).await?;
//! ```

use std::sync::Arc;
use std::time::Duration;

use tessera_cache::{Cache, CacheError, generate_key};

use crate::TokenResult;
use crate::config::TokenSecrets;
use crate::error::TokenError;
use crate::keys::{OatPrefix, SptPrefix};
use crate::security::{generate_random_string, sign_string, verify_signature};
use crate::token::wire::{SignedIdentity, validate_identity};

/// Length of the random identity of an opaque access token.
pub const OAT_IDENTITY_LENGTH: usize = 32;

/// Token class, selecting the signing secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    /// Opaque access token.
    Oat,
    /// Single-purpose token.
    Spt,
}

impl TokenClass {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Oat => "oat",
            Self::Spt => "spt",
        }
    }
}

impl std::fmt::Display for TokenClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Issues and validates tokens against a shared TTL store.
///
/// Holds only immutable secrets and a store handle, so one instance can be
/// shared behind an `Arc` by any number of concurrent callers.
#[derive(Clone)]
pub struct TokenService {
    /// Signing keys per token class.
    secrets: TokenSecrets,

    /// Source of truth for token liveness.
    cache: Arc<dyn Cache>,
}

impl TokenService {
    /// Creates a new token service.
    #[must_use]
    pub fn new(secrets: TokenSecrets, cache: Arc<dyn Cache>) -> Self {
        Self { secrets, cache }
    }

    /// Issues an opaque access token carrying `payload`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidInput`] for a zero TTL, or a backend error
    /// if the random source or the store fails.
    pub async fn generate_oat(
        &self,
        prefix: &OatPrefix,
        payload: &str,
        ttl: Duration,
    ) -> TokenResult<String> {
        check_ttl(ttl)?;
        let identity = generate_random_string(OAT_IDENTITY_LENGTH)?;
        self.issue(TokenClass::Oat, &prefix.key_for(&identity), &identity, payload, ttl)
            .await
    }

    /// Returns the payload of a live opaque access token.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidToken`] if the token is malformed, its
    /// signature does not match, or it is expired or unknown. Store failures
    /// are returned as [`TokenError::Cache`].
    pub async fn verify_oat(&self, prefix: &OatPrefix, encoded: &str) -> TokenResult<String> {
        self.verify(TokenClass::Oat, prefix.as_str(), encoded).await
    }

    /// Issues a single-purpose token whose identity is `payload`.
    ///
    /// Only one live token exists per prefix and payload: issuing again
    /// replaces the store entry, so earlier tokens for the same payload now
    /// share the new TTL.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidInput`] if `payload` is empty or contains
    /// `.`, or for a zero TTL. Store failures are returned as
    /// [`TokenError::Cache`].
    pub async fn generate_spt(
        &self,
        prefix: &SptPrefix,
        payload: &str,
        ttl: Duration,
    ) -> TokenResult<String> {
        check_ttl(ttl)?;
        validate_identity(payload)?;
        self.issue(TokenClass::Spt, &prefix.key_for(payload), payload, payload, ttl)
            .await
    }

    /// Returns the payload of a live single-purpose token.
    ///
    /// # Errors
    ///
    /// Same classification as [`TokenService::verify_oat`].
    pub async fn verify_spt(&self, prefix: &SptPrefix, encoded: &str) -> TokenResult<String> {
        self.verify(TokenClass::Spt, prefix.as_str(), encoded).await
    }

    /// Revokes every single-purpose token issued for `payload`.
    ///
    /// Takes the plaintext payload, not an encoded token. Revoking a payload
    /// that has no live token succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Cache`] if the store fails.
    pub async fn revoke_spt(&self, prefix: &SptPrefix, payload: &str) -> TokenResult<()> {
        self.cache.delete(&prefix.key_for(payload)).await?;
        tracing::debug!(prefix = %prefix, "single-purpose token revoked");
        Ok(())
    }

    fn secret(&self, class: TokenClass) -> &[u8] {
        match class {
            TokenClass::Oat => self.secrets.oat(),
            TokenClass::Spt => self.secrets.spt(),
        }
    }

    async fn issue(
        &self,
        class: TokenClass,
        key: &str,
        identity: &str,
        value: &str,
        ttl: Duration,
    ) -> TokenResult<String> {
        self.cache.set(key, value.as_bytes().to_vec(), ttl).await?;

        let token = SignedIdentity {
            identity: identity.to_string(),
            signature: sign_string(identity, self.secret(class)),
        };

        tracing::debug!(class = %class, ttl_secs = ttl.as_secs(), "token issued");
        Ok(token.encode())
    }

    async fn verify(
        &self,
        class: TokenClass,
        prefix: &str,
        encoded: &str,
    ) -> TokenResult<String> {
        let token = SignedIdentity::decode(encoded).inspect_err(|_| {
            tracing::debug!(class = %class, prefix, reason = "malformed", "token rejected");
        })?;

        if !verify_signature(&token.identity, &token.signature, self.secret(class)) {
            tracing::debug!(class = %class, prefix, reason = "bad_signature", "token rejected");
            return Err(TokenError::InvalidToken);
        }

        let data = match self.cache.get(&generate_key(prefix, &token.identity)).await {
            Ok(data) => data,
            Err(CacheError::NotFound { .. }) => {
                tracing::debug!(class = %class, prefix, reason = "not_live", "token rejected");
                return Err(TokenError::InvalidToken);
            }
            Err(e) => return Err(e.into()),
        };

        String::from_utf8(data)
            .map_err(|_| TokenError::internal("stored token payload is not valid UTF-8"))
    }
}

fn check_ttl(ttl: Duration) -> TokenResult<()> {
    if ttl.is_zero() {
        return Err(TokenError::invalid_input("token ttl must be positive"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::encode_token_url_safe;
    use tessera_cache::LocalCache;

    const MINUTE: Duration = Duration::from_secs(60);

    fn service_with(cache: LocalCache) -> TokenService {
        TokenService::new(TokenSecrets::new("oat-secret", "spt-secret"), Arc::new(cache))
    }

    #[tokio::test]
    async fn test_oat_round_trip() {
        let service = service_with(LocalCache::new());
        let prefix = OatPrefix::ACCESS_TOKEN;

        let token = service.generate_oat(&prefix, "session:7", MINUTE).await.unwrap();
        assert_eq!(service.verify_oat(&prefix, &token).await.unwrap(), "session:7");
    }

    #[tokio::test]
    async fn test_oat_stores_payload_under_random_identity() {
        let cache = LocalCache::new();
        let service = service_with(cache.clone());
        let prefix = OatPrefix::new("session");

        let token = service.generate_oat(&prefix, "payload", MINUTE).await.unwrap();
        let decoded = SignedIdentity::decode(&token).unwrap();

        assert_eq!(decoded.identity.len(), OAT_IDENTITY_LENGTH);
        assert_ne!(decoded.identity, "payload");
        assert_eq!(
            cache.get(&prefix.key_for(&decoded.identity)).await.unwrap(),
            b"payload".to_vec()
        );
    }

    #[tokio::test]
    async fn test_oat_identities_are_unique() {
        let service = service_with(LocalCache::new());
        let prefix = OatPrefix::ACCESS_TOKEN;

        let a = service.generate_oat(&prefix, "same", MINUTE).await.unwrap();
        let b = service.generate_oat(&prefix, "same", MINUTE).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_spt_round_trip_and_store_entry() {
        let cache = LocalCache::new();
        let service = service_with(cache.clone());
        let prefix = SptPrefix::EMAIL_VERIFICATION;

        let token = service.generate_spt(&prefix, "user-42", MINUTE).await.unwrap();
        assert_eq!(service.verify_spt(&prefix, &token).await.unwrap(), "user-42");
        assert_eq!(
            cache.get(&prefix.key_for("user-42")).await.unwrap(),
            b"user-42".to_vec()
        );
        assert_eq!(SignedIdentity::decode(&token).unwrap().identity, "user-42");
    }

    #[tokio::test]
    async fn test_zero_ttl_rejected_before_store_write() {
        let cache = LocalCache::new();
        let service = service_with(cache.clone());

        let err = service
            .generate_oat(&OatPrefix::ACCESS_TOKEN, "p", Duration::ZERO)
            .await
            .unwrap_err();
        assert!(matches!(err, TokenError::InvalidInput { .. }));

        let err = service
            .generate_spt(&SptPrefix::PASSWORD_RESET, "u", Duration::ZERO)
            .await
            .unwrap_err();
        assert!(matches!(err, TokenError::InvalidInput { .. }));
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_spt_rejects_unrepresentable_payload() {
        let cache = LocalCache::new();
        let service = service_with(cache.clone());

        for payload in ["", "jane.doe"] {
            let err = service
                .generate_spt(&SptPrefix::PASSWORD_RESET, payload, MINUTE)
                .await
                .unwrap_err();
            assert!(matches!(err, TokenError::InvalidInput { .. }));
        }
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_oat_and_spt_secrets_are_not_interchangeable() {
        let service = service_with(LocalCache::new());

        let spt = service
            .generate_spt(&SptPrefix::new("shared"), "user-1", MINUTE)
            .await
            .unwrap();
        let err = service
            .verify_oat(&OatPrefix::new("shared"), &spt)
            .await
            .unwrap_err();
        assert!(err.is_invalid_token());
    }

    #[tokio::test]
    async fn test_forged_signature_with_wrong_secret() {
        let service = service_with(LocalCache::new());
        let prefix = SptPrefix::PASSWORD_RESET;
        service.generate_spt(&prefix, "user-42", MINUTE).await.unwrap();

        let forged = encode_token_url_safe(&format!(
            "user-42.{}",
            sign_string("user-42", b"attacker-secret")
        ));
        let err = service.verify_spt(&prefix, &forged).await.unwrap_err();
        assert!(err.is_invalid_token());
    }

    #[test]
    fn test_token_class_display() {
        assert_eq!(TokenClass::Oat.to_string(), "oat");
        assert_eq!(TokenClass::Spt.to_string(), "spt");
    }
}
