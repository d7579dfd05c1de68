//! Token refresh failures.

use thiserror::Error;

use super::TransportError;

/// Reason a refresh call produced no new access token.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum RefreshFailure {
    #[error("refresh request failed: {0}")]
    Transport(#[from] TransportError),

    #[error("refresh rejected with HTTP {status}")]
    Rejected { status: u16 },

    #[error("malformed refresh response: {message}")]
    MalformedResponse { message: String },

    #[error("refresh cancelled")]
    Cancelled,
}

impl RefreshFailure {
    /// Creates malformed response error.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Whether the session is unrecoverable.
    ///
    /// Cancellation says nothing about the refresh token, so the session
    /// survives it.
    #[must_use]
    pub const fn is_irrecoverable(&self) -> bool {
        !matches!(
            self,
            Self::Cancelled | Self::Transport(TransportError::Cancelled)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancellation_is_not_irrecoverable() {
        assert!(!RefreshFailure::Cancelled.is_irrecoverable());
        assert!(!RefreshFailure::Transport(TransportError::Cancelled).is_irrecoverable());
    }

    #[test]
    fn test_rejections_and_transport_errors_are_irrecoverable() {
        assert!(RefreshFailure::Rejected { status: 400 }.is_irrecoverable());
        assert!(RefreshFailure::malformed("missing accessToken").is_irrecoverable());
        assert!(RefreshFailure::from(TransportError::Timeout).is_irrecoverable());
    }
}
