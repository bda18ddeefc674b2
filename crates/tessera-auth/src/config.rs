//! Token signing secrets and default lifetimes.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Security configuration for token issuance.
///
/// # Example (TOML)
///
/// ```toml
/// [security]
/// oat_secret = "change-me-oat"
/// spt_secret = "change-me-spt"
/// oat_ttl = "24h"
/// spt_ttl = "15m"
/// ```
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// HMAC key for opaque access tokens.
    pub oat_secret: String,

    /// HMAC key for single-purpose tokens.
    pub spt_secret: String,

    /// Lifetime used when an opaque access token is issued without an explicit TTL.
    #[serde(with = "humantime_serde")]
    pub oat_ttl: Duration,

    /// Lifetime used when a single-purpose token is issued without an explicit TTL.
    #[serde(with = "humantime_serde")]
    pub spt_ttl: Duration,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            oat_secret: String::new(),
            spt_secret: String::new(),
            oat_ttl: Duration::from_secs(24 * 3600), // 24 hours
            spt_ttl: Duration::from_secs(15 * 60),   // 15 minutes
        }
    }
}

impl fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("oat_secret", &"[redacted]")
            .field("spt_secret", &"[redacted]")
            .field("oat_ttl", &self.oat_ttl)
            .field("spt_ttl", &self.spt_ttl)
            .finish()
    }
}

impl SecurityConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.oat_secret.is_empty() {
            return Err("security.oat_secret must be set".into());
        }
        if self.spt_secret.is_empty() {
            return Err("security.spt_secret must be set".into());
        }
        if self.oat_secret == self.spt_secret {
            return Err("security.oat_secret and security.spt_secret must differ".into());
        }
        if self.oat_ttl.is_zero() || self.spt_ttl.is_zero() {
            return Err("security token TTLs must be > 0".into());
        }
        Ok(())
    }

    /// Extracts the signing secrets for [`TokenService`](crate::TokenService).
    #[must_use]
    pub fn secrets(&self) -> TokenSecrets {
        TokenSecrets::new(self.oat_secret.as_bytes(), self.spt_secret.as_bytes())
    }
}

/// Signing keys for both token classes, fixed at construction.
#[derive(Clone)]
pub struct TokenSecrets {
    oat: Vec<u8>,
    spt: Vec<u8>,
}

impl TokenSecrets {
    #[must_use]
    pub fn new(oat: impl Into<Vec<u8>>, spt: impl Into<Vec<u8>>) -> Self {
        Self {
            oat: oat.into(),
            spt: spt.into(),
        }
    }

    pub(crate) fn oat(&self) -> &[u8] {
        &self.oat
    }

    pub(crate) fn spt(&self) -> &[u8] {
        &self.spt
    }
}

impl fmt::Debug for TokenSecrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSecrets").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> SecurityConfig {
        SecurityConfig {
            oat_secret: "oat-secret".into(),
            spt_secret: "spt-secret".into(),
            ..SecurityConfig::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = SecurityConfig::default();
        assert_eq!(config.oat_ttl, Duration::from_secs(86400));
        assert_eq!(config.spt_ttl, Duration::from_secs(900));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate() {
        assert!(valid().validate().is_ok());

        let mut config = valid();
        config.spt_secret = config.oat_secret.clone();
        assert!(config.validate().is_err());

        let mut config = valid();
        config.oat_ttl = Duration::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let rendered = format!("{:?}", valid());
        assert!(!rendered.contains("oat-secret"));
        assert!(rendered.contains("[redacted]"));

        let rendered = format!("{:?}", valid().secrets());
        assert!(!rendered.contains("spt-secret"));
    }

    #[test]
    fn test_deserialize_humantime() {
        let json = r#"{"oat_secret": "a", "spt_secret": "b", "oat_ttl": "1h", "spt_ttl": "30m"}"#;
        let config: SecurityConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.oat_ttl, Duration::from_secs(3600));
        assert_eq!(config.spt_ttl, Duration::from_secs(1800));

        let config: SecurityConfig = serde_json::from_str(r#"{"oat_secret": "a"}"#).unwrap();
        assert_eq!(config.spt_ttl, Duration::from_secs(900));
    }
}
