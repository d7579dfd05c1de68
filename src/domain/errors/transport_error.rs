//! Transport-level failures.

use thiserror::Error;

use super::ErrorType;

/// Failure to obtain any HTTP response at all.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum TransportError {
    #[error("failed to connect: {message}")]
    Connect { message: String },

    #[error("request timed out")]
    Timeout,

    #[error("request cancelled")]
    Cancelled,

    #[error("invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("transport error: {message}")]
    Other { message: String },
}

impl TransportError {
    /// Creates connect error.
    #[must_use]
    pub fn connect(message: impl Into<String>) -> Self {
        Self::Connect {
            message: message.into(),
        }
    }

    /// Creates invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Creates catch-all error.
    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Classifies the failure.
    #[must_use]
    pub const fn error_type(&self) -> ErrorType {
        match self {
            Self::Connect { .. } | Self::Other { .. } => ErrorType::Network,
            Self::Timeout => ErrorType::Timeout,
            Self::Cancelled => ErrorType::Cancelled,
            Self::InvalidRequest { .. } => ErrorType::Validation,
        }
    }
}
