//! Infrastructure layer with external service adapters.

/// Token refresh adapters.
pub mod auth;
/// Application configuration.
pub mod config;
/// HTTP transport, middleware and API client.
pub mod http;
/// Session lifecycle notifications.
pub mod session;
/// Token storage adapters.
pub mod storage;

pub use auth::{HttpTokenRefresher, RefreshCoordinator, RefreshOutcome};
pub use config::{ApiConfig, AppConfig, CliArgs, Command, EndpointsConfig, LogLevel, StorageManager};
pub use http::{ApiClient, ApiClientFactory, ReqwestTransport};
pub use session::{ChannelSessionObserver, SessionEvent};
pub use storage::InMemoryTokenStore;
