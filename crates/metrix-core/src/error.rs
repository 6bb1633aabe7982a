//! Shared error type across metrix crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Caller error: bad labels, bad value, malformed definition or payload.
    BadRequest,
    /// Metric redefined with an incompatible shape.
    Conflict,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::Conflict => "CONFLICT",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, MetrixError>;

/// Unified error type used by core and gateway.
///
/// None of these are retryable: the same call fails the same way until the
/// call site changes.
#[derive(Debug, Error)]
pub enum MetrixError {
    #[error("config conflict: {0}")]
    ConfigConflict(String),
    #[error("label mismatch: {0}")]
    LabelMismatch(String),
    #[error("invalid value: {0}")]
    InvalidValue(String),
    #[error("invalid definition: {0}")]
    InvalidDefinition(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl MetrixError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            MetrixError::ConfigConflict(_) => ClientCode::Conflict,
            MetrixError::LabelMismatch(_)
            | MetrixError::InvalidValue(_)
            | MetrixError::InvalidDefinition(_)
            | MetrixError::BadRequest(_) => ClientCode::BadRequest,
            MetrixError::Internal(_) => ClientCode::Internal,
        }
    }
}

impl From<std::fmt::Error> for MetrixError {
    fn from(e: std::fmt::Error) -> Self {
        MetrixError::Internal(format!("format failed: {e}"))
    }
}
