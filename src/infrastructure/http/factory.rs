//! Builds configured API clients.

use std::sync::Arc;

use tracing::info;

use super::api_client::ApiClient;
use super::middleware::{AuthHeaderMiddleware, MiddlewareChain, RefreshRetryMiddleware};
use super::reqwest_transport::ReqwestTransport;
use crate::domain::errors::TransportError;
use crate::domain::ports::{HttpTransport, SessionObserver, TokenStore};
use crate::infrastructure::auth::{HttpTokenRefresher, RefreshCoordinator};
use crate::infrastructure::config::ApiConfig;

/// Wires transport, refresher, coordinator and middleware for one API.
#[derive(Debug, Clone)]
pub struct ApiClientFactory {
    config: ApiConfig,
}

impl ApiClientFactory {
    /// Creates a factory for `config`.
    #[must_use]
    pub const fn new(config: ApiConfig) -> Self {
        Self { config }
    }

    /// Builds a client over a `reqwest` transport bound to the configured
    /// base URL and timeout.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn build(
        &self,
        store: Arc<dyn TokenStore>,
        observer: Arc<dyn SessionObserver>,
    ) -> Result<ApiClient, TransportError> {
        let transport = ReqwestTransport::new(self.config.base_url.clone(), self.config.timeout())?;
        info!(
            base_url = %transport.base_url(),
            timeout_secs = self.config.timeout_secs,
            "API client configured"
        );
        Ok(self.build_with_transport(Arc::new(transport), store, observer))
    }

    /// Builds a client over an arbitrary transport.
    #[must_use]
    pub fn build_with_transport(
        &self,
        transport: Arc<dyn HttpTransport>,
        store: Arc<dyn TokenStore>,
        observer: Arc<dyn SessionObserver>,
    ) -> ApiClient {
        let refresher = Arc::new(HttpTokenRefresher::new(
            Arc::clone(&transport),
            self.config.endpoints.refresh.clone(),
        ));
        let coordinator = Arc::new(RefreshCoordinator::new(
            Arc::clone(&store),
            refresher,
            observer,
        ));
        let chain = MiddlewareChain::new(transport)
            .with(AuthHeaderMiddleware::new(Arc::clone(&store)))
            .with(RefreshRetryMiddleware::new(Arc::clone(&coordinator)));

        ApiClient::new(chain, store, coordinator)
    }
}
