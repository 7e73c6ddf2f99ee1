// Error types for the tracking layer

use thiserror::Error;
use uuid::Uuid;

/// Result type alias for tracking operations
pub type Result<T> = std::result::Result<T, TrackingError>;

/// Errors that can occur while talking to the events backend
///
/// These never reach UI callers: the tracker and retriever types convert
/// every failure into a safe default and log it. The variants exist so that
/// backend implementations can report what went wrong with some structure.
#[derive(Debug, Error)]
pub enum TrackingError {
    /// Backend call failed (network, SQL, serialization inside the driver)
    #[error("Backend error: {0}")]
    Backend(String),

    /// A row came back in a shape we could not decode
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// Session not found
    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),
}

impl TrackingError {
    /// Create a backend error
    pub fn backend(msg: impl Into<String>) -> Self {
        TrackingError::Backend(msg.into())
    }

    /// Create an invalid-record error
    pub fn invalid_record(msg: impl Into<String>) -> Self {
        TrackingError::InvalidRecord(msg.into())
    }

    /// Create a session-not-found error
    pub fn session_not_found(session_id: Uuid) -> Self {
        TrackingError::SessionNotFound(session_id)
    }
}
