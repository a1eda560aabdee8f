//! Domain errors for the group synchronization system.

use thiserror::Error;

/// Domain-level errors that can occur while reconciling groups.
///
/// Only errors that abort a reconciliation run travel through this type.
/// Expected per-user and per-group failures (an unknown account, a failed
/// directory fetch) are reported in-band by the port return values.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Platform request failed: {0}")]
    PlatformRequest(String),

    #[error("Platform returned {status} for {operation}: {body}")]
    PlatformResponse {
        operation: String,
        status: u16,
        body: String,
    },

    #[error("Directory request failed: {0}")]
    DirectoryRequest(String),

    #[error("Directory authentication failed: {0}")]
    DirectoryAuth(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}
