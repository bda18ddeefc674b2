//! Cache key prefixes for each token class.
//!
//! A prefix names a token *purpose* ("password reset", "session") and
//! namespaces its store entries. Opaque and single-purpose prefixes are
//! distinct types so one cannot be passed where the other is expected.

use std::borrow::Cow;
use std::fmt;

macro_rules! token_prefix {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(Cow<'static, str>);

        impl $name {
            /// Creates a prefix from a static string.
            #[must_use]
            pub const fn from_static(prefix: &'static str) -> Self {
                Self(Cow::Borrowed(prefix))
            }

            /// Creates a prefix from any string.
            #[must_use]
            pub fn new(prefix: impl Into<String>) -> Self {
                Self(Cow::Owned(prefix.into()))
            }

            /// Returns the prefix text.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Builds the store key for `identity` under this prefix.
            #[must_use]
            pub fn key_for(&self, identity: &str) -> String {
                tessera_cache::generate_key(&self.0, identity)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&'static str> for $name {
            fn from(prefix: &'static str) -> Self {
                Self::from_static(prefix)
            }
        }
    };
}

token_prefix!(
    /// Prefix for opaque access tokens.
    OatPrefix
);

token_prefix!(
    /// Prefix for single-purpose tokens.
    SptPrefix
);

impl OatPrefix {
    /// Long-lived API access tokens.
    pub const ACCESS_TOKEN: Self = Self::from_static("oat:access");
}

impl SptPrefix {
    /// Email address verification links.
    pub const EMAIL_VERIFICATION: Self = Self::from_static("spt:verify-email");

    /// Password reset links.
    pub const PASSWORD_RESET: Self = Self::from_static("spt:reset-password");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_for() {
        assert_eq!(
            SptPrefix::PASSWORD_RESET.key_for("user-42"),
            "spt:reset-password:user-42"
        );
        assert_eq!(OatPrefix::new("session").key_for("abc"), "session:abc");
    }

    #[test]
    fn test_prefixes_are_distinct() {
        assert_ne!(
            SptPrefix::PASSWORD_RESET.key_for("u"),
            SptPrefix::EMAIL_VERIFICATION.key_for("u")
        );
    }

    #[test]
    fn test_static_and_owned_compare_equal() {
        assert_eq!(OatPrefix::from("oat:access"), OatPrefix::ACCESS_TOKEN);
        assert_eq!(OatPrefix::new("oat:access"), OatPrefix::ACCESS_TOKEN);
        assert_eq!(SptPrefix::PASSWORD_RESET.to_string(), "spt:reset-password");
    }
}
