//! Domain layer with value types, error taxonomy, and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;

pub use entities::{AuthMode, AuthTokens, HttpRequest, HttpResponse};
pub use errors::{ApiError, ApiResult, ErrorType, RefreshFailure, TransportError};
pub use ports::{
    HttpTransport, RefreshedTokens, SessionEndReason, SessionObserver, TokenRefresher, TokenStore,
};
