//! Vitrine error types

use std::time::Duration;

/// Vitrine error types
///
/// The stats entry points never surface these; they are used inside the
/// fetch pipeline to classify candidate failures, and by construction and
/// configuration code.
#[derive(Debug, thiserror::Error)]
pub enum VitrineError {
    // Transport errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    // Payload errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    // Input errors
    #[error("invalid subject: {0:?}")]
    InvalidSubject(String),

    // Storage errors
    #[error("storage error: {0}")]
    Storage(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("no candidate endpoint configured")]
    NoCandidate,
}

impl VitrineError {
    /// Whether the failure came from the network layer (connect, status, timeout)
    /// rather than from the payload.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            VitrineError::Http(_) | VitrineError::Api { .. } | VitrineError::Timeout(_)
        )
    }

    /// Short label used for the `status` metric dimension.
    pub fn kind(&self) -> &'static str {
        match self {
            VitrineError::Http(_) => "http",
            VitrineError::Api { .. } => "status",
            VitrineError::Timeout(_) => "timeout",
            VitrineError::Json(_) | VitrineError::MalformedPayload(_) => "malformed",
            VitrineError::InvalidSubject(_) => "invalid_subject",
            VitrineError::Storage(_) => "storage",
            VitrineError::Configuration(_) => "configuration",
            VitrineError::NoCandidate => "no_candidate",
        }
    }
}

/// Result type alias for Vitrine operations
pub type Result<T> = std::result::Result<T, VitrineError>;
