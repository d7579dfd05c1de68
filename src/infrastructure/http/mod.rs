//! HTTP request execution.

mod api_client;
mod factory;
pub mod middleware;
mod reqwest_transport;

pub use api_client::ApiClient;
pub use factory::ApiClientFactory;
pub use middleware::{AuthHeaderMiddleware, Middleware, MiddlewareChain, Next, RefreshRetryMiddleware};
pub use reqwest_transport::ReqwestTransport;
