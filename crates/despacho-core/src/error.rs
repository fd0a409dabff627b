//! Error types for the dispatch application core

use thiserror::Error;

/// Errors that can occur during a dispatch request cycle
///
/// Every failure is terminal for the current cycle; the only recovery
/// path is a new user-initiated action.
#[derive(Error, Debug)]
pub enum DespachoError {
    /// Location capability precondition not met
    #[error("Location permission denied")]
    PermissionDenied,

    /// No provider delivered a fix within the configured timeout
    #[error("No position fix available after {waited_ms}ms")]
    FixUnavailable { waited_ms: u64 },

    /// Identity service rejected the credentials
    #[error("Sign-in failed: {0}")]
    AuthFailed(String),

    /// Email or password was blank
    #[error("Email and password are required")]
    MissingCredentials,

    /// Remote store write failed
    #[error("Location upload failed: {0}")]
    UploadFailed(String),

    /// A location provider failed
    #[error("Provider {provider} failed: {reason}")]
    Provider { provider: String, reason: String },

    /// Coordinate outside the valid latitude/longitude ranges
    #[error("Invalid coordinate: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DespachoError {
    /// Whether this error is surfaced to the user
    ///
    /// Upload and provider failures are best-effort telemetry: logged,
    /// never shown, never retried.
    pub fn is_user_visible(&self) -> bool {
        matches!(
            self,
            DespachoError::PermissionDenied
                | DespachoError::FixUnavailable { .. }
                | DespachoError::AuthFailed(_)
                | DespachoError::MissingCredentials
        )
    }

    /// Get an error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            DespachoError::PermissionDenied => "PERMISSION_DENIED",
            DespachoError::FixUnavailable { .. } => "FIX_UNAVAILABLE",
            DespachoError::AuthFailed(_) => "AUTH_FAILED",
            DespachoError::MissingCredentials => "MISSING_CREDENTIALS",
            DespachoError::UploadFailed(_) => "UPLOAD_FAILED",
            DespachoError::Provider { .. } => "PROVIDER_ERROR",
            DespachoError::InvalidCoordinate { .. } => "INVALID_COORDINATE",
            DespachoError::InvalidConfig(_) => "INVALID_CONFIG",
            DespachoError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Result type alias for dispatch operations
pub type Result<T> = std::result::Result<T, DespachoError>;
