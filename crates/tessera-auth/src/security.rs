//! Signing, random identity, and transport encoding primitives.
//!
//! # Security
//!
//! - Signatures are HMAC-SHA256, hex encoded
//! - Verification goes through [`Mac::verify_slice`], which compares in
//!   constant time
//! - Random identities come from the operating system RNG (`OsRng`)
//! - Transport encoding is unpadded base64url, safe in path segments, query
//!   parameters, and headers

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::Sha256;

use crate::error::TokenError;

type HmacSha256 = Hmac<Sha256>;

/// Symbols used for random identities. 64 entries, so a byte masked to six
/// bits indexes it without bias. Contains no token separator.
const RANDOM_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

fn mac_for(secret: &[u8]) -> HmacSha256 {
    HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size")
}

/// Signs `message` with `secret`, returning the lowercase hex HMAC-SHA256.
///
/// The same message and secret always produce the same signature.
///
/// ```
/// use tessera_auth::security::sign_string;
///
/// let a = sign_string("user-42", b"secret");
/// assert_eq!(a, sign_string("user-42", b"secret"));
/// assert_eq!(a.len(), 64);
/// ```
#[must_use]
pub fn sign_string(message: &str, secret: &[u8]) -> String {
    let mut mac = mac_for(secret);
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Checks that `signature` is the signature of `message` under `secret`.
///
/// Only the exact lowercase hex form produced by [`sign_string`] is accepted.
/// The comparison itself runs in constant time.
#[must_use]
pub fn verify_signature(message: &str, signature: &str, secret: &[u8]) -> bool {
    if !is_lowercase_hex(signature) {
        return false;
    }
    let Ok(expected) = hex::decode(signature) else {
        return false;
    };
    let mut mac = mac_for(secret);
    mac.update(message.as_bytes());
    mac.verify_slice(&expected).is_ok()
}

// hex::decode accepts both cases; a re-cased signature is a different token.
fn is_lowercase_hex(signature: &str) -> bool {
    signature
        .bytes()
        .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// Generates a random string of `length` characters from a URL-safe alphabet.
///
/// Each character carries six bits of entropy.
///
/// # Errors
///
/// Returns [`TokenError::Random`] if the operating system RNG fails.
pub fn generate_random_string(length: usize) -> Result<String, TokenError> {
    let mut bytes = vec![0u8; length];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| TokenError::random(e.to_string()))?;

    Ok(bytes
        .into_iter()
        .map(|b| char::from(RANDOM_ALPHABET[usize::from(b & 0x3f)]))
        .collect())
}

/// Encodes a token for transport.
#[must_use]
pub fn encode_token_url_safe(token: &str) -> String {
    URL_SAFE_NO_PAD.encode(token.as_bytes())
}

/// Reverses [`encode_token_url_safe`].
///
/// # Errors
///
/// Returns [`TokenError::InvalidToken`] if the input is not unpadded base64url
/// or does not decode to UTF-8.
pub fn decode_token_url_safe(encoded: &str) -> Result<String, TokenError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(encoded)
        .map_err(|_| TokenError::InvalidToken)?;
    String::from_utf8(bytes).map_err(|_| TokenError::InvalidToken)
}
