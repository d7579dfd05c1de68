//! Failure classification shared by every layer of the client.

use reqwest::StatusCode;

/// Classification of a call outcome.
///
/// Callers branch on this instead of on transport-specific error types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// No error.
    #[default]
    None,
    /// The request was rejected as malformed; do not retry unchanged.
    Validation,
    /// The server could not be reached.
    Network,
    /// The request deadline elapsed.
    Timeout,
    /// Credentials are missing, expired, or insufficient.
    Auth,
    /// The resource does not exist.
    NotFound,
    /// The request conflicts with server state.
    Conflict,
    /// The server failed to handle the request.
    ServerError,
    /// The caller cancelled the operation.
    Cancelled,
    /// Anything else.
    Unknown,
}

impl ErrorType {
    /// Classifies a non-success HTTP status.
    ///
    /// 401 and 403 are `Auth`, 400 is `Validation`, 404 is `NotFound`, 409 is
    /// `Conflict`, 5xx is `ServerError`; remaining codes are `Unknown`.
    #[must_use]
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            s if s.is_success() => Self::None,
            StatusCode::BAD_REQUEST => Self::Validation,
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::Auth,
            StatusCode::NOT_FOUND => Self::NotFound,
            StatusCode::CONFLICT => Self::Conflict,
            s if s.is_server_error() => Self::ServerError,
            _ => Self::Unknown,
        }
    }

    /// Classifies a raw numeric status; out-of-range codes are `Unknown`.
    #[must_use]
    pub fn from_status_code(code: u16) -> Self {
        StatusCode::from_u16(code).map_or(Self::Unknown, Self::from_status)
    }

    /// Whether the failure is worth retrying later by the caller.
    #[must_use]
    pub const fn is_transient(self) -> bool {
        matches!(self, Self::Network | Self::Timeout)
    }

    /// Human-readable fallback message for the class.
    #[must_use]
    pub const fn user_message(self) -> &'static str {
        match self {
            Self::None => "The operation completed successfully.",
            Self::Validation => "The request was invalid. Check the input and try again.",
            Self::Network => "Could not reach the server. Check the network connection.",
            Self::Timeout => "The server took too long to respond.",
            Self::Auth => "Your session has expired. Please log in again.",
            Self::NotFound => "The requested item could not be found.",
            Self::Conflict => "The data was changed by someone else.",
            Self::ServerError => "The server encountered an error.",
            Self::Cancelled => "The operation was cancelled.",
            Self::Unknown => "An unknown error occurred.",
        }
    }
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Validation => "validation",
            Self::Network => "network",
            Self::Timeout => "timeout",
            Self::Auth => "auth",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::ServerError => "server_error",
            Self::Cancelled => "cancelled",
            Self::Unknown => "unknown",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(200, ErrorType::None ; "ok")]
    #[test_case(204, ErrorType::None ; "no_content")]
    #[test_case(400, ErrorType::Validation ; "bad_request")]
    #[test_case(401, ErrorType::Auth ; "unauthorized")]
    #[test_case(403, ErrorType::Auth ; "forbidden")]
    #[test_case(404, ErrorType::NotFound ; "not_found")]
    #[test_case(409, ErrorType::Conflict ; "conflict")]
    #[test_case(408, ErrorType::Unknown ; "request_timeout")]
    #[test_case(500, ErrorType::ServerError ; "internal_error")]
    #[test_case(503, ErrorType::ServerError ; "unavailable")]
    #[test_case(504, ErrorType::ServerError ; "gateway_timeout")]
    #[test_case(418, ErrorType::Unknown ; "teapot")]
    #[test_case(302, ErrorType::Unknown ; "redirect")]
    fn test_status_classification(code: u16, expected: ErrorType) {
        assert_eq!(ErrorType::from_status_code(code), expected);
    }

    #[test]
    fn test_invalid_status_code_is_unknown() {
        assert_eq!(ErrorType::from_status_code(0), ErrorType::Unknown);
        assert_eq!(ErrorType::from_status_code(1000), ErrorType::Unknown);
    }

    #[test]
    fn test_only_network_and_timeout_are_transient() {
        assert!(ErrorType::Network.is_transient());
        assert!(ErrorType::Timeout.is_transient());
        assert!(!ErrorType::Auth.is_transient());
        assert!(!ErrorType::ServerError.is_transient());
        assert!(!ErrorType::Cancelled.is_transient());
    }

    #[test]
    fn test_display_names() {
        assert_eq!(ErrorType::ServerError.to_string(), "server_error");
        assert_eq!(ErrorType::NotFound.to_string(), "not_found");
    }
}
