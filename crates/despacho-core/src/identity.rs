//! User identity types for the sign-in flow

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sign-in credentials entered by the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    /// Create credentials, trimming surrounding whitespace
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_string(),
            password: password.into().trim().to_string(),
        }
    }

    /// Check that both fields are present
    ///
    /// Blank credentials never reach the identity service.
    pub fn validate(&self) -> crate::Result<()> {
        if self.email.is_empty() || self.password.is_empty() {
            return Err(crate::DespachoError::MissingCredentials);
        }
        Ok(())
    }
}

impl fmt::Display for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print the password
        write!(f, "{}", self.email)
    }
}

/// Stable identifier for an authenticated user
///
/// Opaque string assigned by the identity service. Keys the remote
/// store write (`users/<uid>/location`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    /// Get the user id as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get a short form of the user id (first 8 characters)
    pub fn short(&self) -> &str {
        &self.0[..8.min(self.0.len())]
    }

    /// Remote store key for this user's location
    pub fn location_key(&self) -> String {
        format!("users/{}/location", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}
