//! Terminal failure of an API call.

use std::fmt;

use reqwest::StatusCode;

use super::{ErrorType, TransportError};

/// Outcome of every public client operation.
pub type ApiResult<T> = Result<T, ApiError>;

/// Failure surfaced to callers.
///
/// `status` is 0 when no HTTP response was received. The status predicates
/// are derived from it; `error_type` is fixed at construction so transport
/// failures without a status still classify.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    message: String,
    status: u16,
    error_type: ErrorType,
}

impl ApiError {
    /// Creates an error from an HTTP status and body text.
    #[must_use]
    pub fn from_status(status: StatusCode, message: impl Into<String>) -> Self {
        let message = message.into();
        let error_type = ErrorType::from_status(status);
        Self {
            message: if message.trim().is_empty() {
                error_type.user_message().to_string()
            } else {
                message
            },
            status: status.as_u16(),
            error_type,
        }
    }

    /// Creates an error with an explicit classification and no status.
    #[must_use]
    pub fn new(error_type: ErrorType, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: 0,
            error_type,
        }
    }

    /// Session could not be renewed.
    #[must_use]
    pub fn session_expired() -> Self {
        Self {
            message: "Session expired. Please login again.".to_string(),
            status: StatusCode::UNAUTHORIZED.as_u16(),
            error_type: ErrorType::Auth,
        }
    }

    /// Creates network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorType::Network, message)
    }

    /// Creates timeout error.
    #[must_use]
    pub fn timeout() -> Self {
        Self::new(ErrorType::Timeout, "Request timeout")
    }

    /// Creates cancellation error.
    #[must_use]
    pub fn cancelled() -> Self {
        Self::new(ErrorType::Cancelled, ErrorType::Cancelled.user_message())
    }

    /// Creates validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorType::Validation, message)
    }

    /// Creates error for a 2xx body that could not be decoded.
    #[must_use]
    pub fn malformed_response(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: status.as_u16(),
            error_type: ErrorType::Unknown,
        }
    }

    /// Returns the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the HTTP status, or 0 when none was received.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.status
    }

    /// Returns the classification.
    #[must_use]
    pub const fn error_type(&self) -> ErrorType {
        self.error_type
    }

    /// Whether the status is 401.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// Whether the status is 404.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        self.status == 404
    }

    /// Whether the status is 5xx or above.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status >= 500
    }

    /// Whether the caller cancelled the call.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self.error_type, ErrorType::Cancelled)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.status == 0 {
            write!(f, "{} error: {}", self.error_type, self.message)
        } else {
            write!(
                f,
                "{} error (HTTP {}): {}",
                self.error_type, self.status, self.message
            )
        }
    }
}

impl std::error::Error for ApiError {}

impl From<TransportError> for ApiError {
    fn from(error: TransportError) -> Self {
        match error {
            TransportError::Timeout => Self::timeout(),
            TransportError::Cancelled => Self::cancelled(),
            TransportError::Connect { ref message } | TransportError::Other { ref message } => {
                Self::network(format!("Network error: {message}"))
            }
            TransportError::InvalidRequest { message } => Self::validation(message),
        }
    }
}
