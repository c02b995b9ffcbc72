//! Unified error handling for the console.

use hostdeck_core::Violations;
use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;

/// Application-level error type for console operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// No valid session. The session has already been cleared.
    #[error("Not authenticated: log in again")]
    Unauthenticated,

    /// The payload does not conform to its category. Nothing was sent.
    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] Violations),

    /// The backend could not be reached or answered with an error.
    #[error("{}", network_message(*status, message))]
    NetworkOrServer { status: Option<u16>, message: String },

    /// The backend refused the credentials.
    #[error("Login failed: {0}")]
    LoginRejected(String),

    /// An ID cannot be addressed as a single path segment. Nothing was sent.
    #[error("Invalid ID: {0:?}")]
    InvalidId(String),

    /// The console is misconfigured.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

fn network_message(status: Option<u16>, message: &str) -> String {
    status.map_or_else(
        || format!("Network error: {message}"),
        |status| format!("Server error ({status}): {message}"),
    )
}

impl From<ApiError> for AdminError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Unauthorized(_) => Self::Unauthenticated,
            ApiError::Status { status, message } => Self::NetworkOrServer {
                status: Some(status),
                message,
            },
            ApiError::Http(e) => Self::NetworkOrServer {
                status: e.status().map(|s| s.as_u16()),
                message: e.to_string(),
            },
            ApiError::Parse(message) => Self::NetworkOrServer {
                status: None,
                message,
            },
        }
    }
}
