//! Shared error type across webprom crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Negative, non-finite or non-numeric measurement.
    InvalidObservation,
    /// Malformed record or config.
    BadRequest,
    /// Record names a collector type nobody registered.
    UnknownType,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidObservation => "INVALID_OBSERVATION",
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::UnknownType => "UNKNOWN_TYPE",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, WebPromError>;

/// Unified error type used by core and exporter.
#[derive(Debug, Error)]
pub enum WebPromError {
    #[error("invalid observation: {0}")]
    InvalidObservation(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unknown collector type: {0}")]
    UnknownType(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl WebPromError {
    /// Map internal error to a stable client-facing code.
    pub fn code(&self) -> ErrorCode {
        match self {
            WebPromError::InvalidObservation(_) => ErrorCode::InvalidObservation,
            WebPromError::BadRequest(_) => ErrorCode::BadRequest,
            WebPromError::UnknownType(_) => ErrorCode::UnknownType,
            WebPromError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            WebPromError::Internal(_) => ErrorCode::Internal,
        }
    }
}
