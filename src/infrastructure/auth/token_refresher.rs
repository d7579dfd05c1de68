//! HTTP token refresher.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::application::dto::{RefreshTokenRequest, RefreshTokenResponse};
use crate::domain::entities::{HttpRequest, HttpResponse};
use crate::domain::errors::{RefreshFailure, TransportError};
use crate::domain::ports::{HttpTransport, RefreshedTokens, TokenRefresher};

/// Calls the refresh endpoint directly on the transport, outside the
/// middleware chain, so it never carries a bearer token and never recurses.
pub struct HttpTokenRefresher {
    transport: Arc<dyn HttpTransport>,
    endpoint: String,
}

impl HttpTokenRefresher {
    /// Creates a refresher for `endpoint`.
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>, endpoint: impl Into<String>) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
        }
    }

    fn build_request(&self, refresh_token: &str) -> Result<HttpRequest, RefreshFailure> {
        let body = serde_json::to_vec(&RefreshTokenRequest::new(refresh_token))
            .map_err(|e| TransportError::invalid_request(e.to_string()))?;
        Ok(HttpRequest::post(self.endpoint.as_str())
            .anonymous()
            .with_json_body(body))
    }

    async fn exchange(
        &self,
        refresh_token: &str,
        cancel: &CancellationToken,
    ) -> Result<RefreshedTokens, RefreshFailure> {
        let request = self.build_request(refresh_token)?;

        let response = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(RefreshFailure::Cancelled),
            result = self.transport.send(request) => result?,
        };

        parse_response(&response)
    }
}

fn parse_response(response: &HttpResponse) -> Result<RefreshedTokens, RefreshFailure> {
    if !response.is_success() {
        return Err(RefreshFailure::Rejected {
            status: response.status().as_u16(),
        });
    }

    let parsed: RefreshTokenResponse = serde_json::from_slice(response.body())
        .map_err(|e| RefreshFailure::malformed(e.to_string()))?;
    if parsed.access_token.is_empty() {
        return Err(RefreshFailure::malformed("empty accessToken"));
    }

    Ok(parsed.into())
}

#[async_trait]
impl TokenRefresher for HttpTokenRefresher {
    async fn refresh(
        &self,
        refresh_token: &str,
        cancel: &CancellationToken,
    ) -> Result<RefreshedTokens, RefreshFailure> {
        debug!(endpoint = %self.endpoint, "Refreshing access token");

        let result = self.exchange(refresh_token, cancel).await;
        match &result {
            Ok(tokens) => debug!(rotated = tokens.refresh_token.is_some(), "Refresh succeeded"),
            Err(failure) => debug!(error = %failure, "Refresh failed"),
        }
        result
    }
}
