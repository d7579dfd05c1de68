//! Domain error types.

mod api_error;
mod error_type;
mod refresh_failure;
mod transport_error;

pub use api_error::{ApiError, ApiResult};
pub use error_type::ErrorType;
pub use refresh_failure::RefreshFailure;
pub use transport_error::TransportError;
