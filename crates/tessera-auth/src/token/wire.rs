//! Wire format shared by both token classes.
//!
//! Logical form is `<identity>.<signature>`; the transport form is that
//! string in unpadded base64url.

use crate::error::TokenError;
use crate::security::{decode_token_url_safe, encode_token_url_safe};

/// Separator between identity and signature.
pub const SEPARATOR: char = '.';

/// A decoded token split into its two parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedIdentity {
    pub identity: String,
    pub signature: String,
}

impl SignedIdentity {
    /// Joins and encodes the token for transport.
    #[must_use]
    pub fn encode(&self) -> String {
        encode_token_url_safe(&format!("{}{SEPARATOR}{}", self.identity, self.signature))
    }

    /// Decodes a transport token and splits it.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidToken`] unless the input decodes to exactly
    /// two non-empty parts around a single separator.
    pub fn decode(encoded: &str) -> Result<Self, TokenError> {
        let decoded = decode_token_url_safe(encoded)?;
        let (identity, signature) = decoded
            .split_once(SEPARATOR)
            .ok_or(TokenError::InvalidToken)?;

        if identity.is_empty() || signature.is_empty() || signature.contains(SEPARATOR) {
            return Err(TokenError::InvalidToken);
        }

        Ok(Self {
            identity: identity.to_string(),
            signature: signature.to_string(),
        })
    }
}

/// Checks that `identity` can be carried in the wire format.
pub(crate) fn validate_identity(identity: &str) -> Result<(), TokenError> {
    if identity.is_empty() {
        return Err(TokenError::invalid_input("token identity must not be empty"));
    }
    if identity.contains(SEPARATOR) {
        return Err(TokenError::invalid_input(format!(
            "token identity must not contain '{SEPARATOR}'"
        )));
    }
    Ok(())
}
