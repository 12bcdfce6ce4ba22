//! Credential handling for API requests.
//!
//! The session token travels in a [`SecureString`] so it never ends up
//! in logs or panic messages.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Wrapper for sensitive strings that prevents accidental logging.
///
/// The inner value is never exposed via Debug or Display traits.
/// Use `expose()` to access the actual value when needed for API calls.
#[derive(Clone, PartialEq, Eq)]
pub struct SecureString(String);

impl SecureString {
    /// Create a new secure string.
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// Expose the inner value.
    ///
    /// Use sparingly and only when actually sending to APIs or persisting.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Debug for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecureString(••••••••)")
    }
}

impl std::fmt::Display for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "••••••••")
    }
}

impl Serialize for SecureString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SecureString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(SecureString)
    }
}

/// Bearer credential attached to every admin API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential(SecureString);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecureString::new(token.into()))
    }

    pub fn token(&self) -> &SecureString {
        &self.0
    }

    /// Value for the `Authorization` header.
    ///
    /// Tokens issued with a scheme already attached are sent unchanged.
    pub fn header_value(&self) -> String {
        let token = self.0.expose().trim();
        if token.starts_with("Bearer ") || token.starts_with("bearer ") {
            token.to_string()
        } else {
            format!("Bearer {}", token)
        }
    }
}
