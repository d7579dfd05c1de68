//! Domain entity definitions.

mod auth_tokens;
mod http_request;

pub use auth_tokens::AuthTokens;
pub use http_request::{AuthMode, HttpRequest, HttpResponse};
