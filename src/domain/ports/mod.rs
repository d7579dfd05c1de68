mod http_transport_port;
mod session_observer_port;
mod token_refresher_port;
mod token_store_port;

pub use http_transport_port::HttpTransport;
pub use session_observer_port::{SessionEndReason, SessionObserver};
pub use token_refresher_port::{RefreshedTokens, TokenRefresher};
pub use token_store_port::TokenStore;

#[cfg(test)]
pub mod mocks {
    pub use super::http_transport_port::mock::{MockTransport, Reply};
    pub use super::session_observer_port::mock::MockSessionObserver;
    pub use super::token_refresher_port::MockTokenRefresher;
    pub use super::token_refresher_port::mock::CountingRefresher;
    pub use super::token_store_port::mock::MockTokenStore;
}
