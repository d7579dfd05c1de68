//! Login use case implementation.

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::application::dto::{LoginRequest, LoginResponse};
use crate::domain::errors::{ApiError, ApiResult, ErrorType};
use crate::infrastructure::http::ApiClient;

/// Exchanges credentials for a token pair and installs it.
#[derive(Clone)]
pub struct LoginUseCase {
    client: ApiClient,
    endpoint: String,
}

impl LoginUseCase {
    /// Creates new login use case.
    #[must_use]
    pub fn new(client: ApiClient, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Executes login with provided request.
    ///
    /// The request goes out without credentials, so a stale session cannot
    /// leak into it, and a 401 here means bad credentials rather than an
    /// expired token.
    ///
    /// # Errors
    /// Returns validation error for blank credentials, otherwise the
    /// classified failure of the login call.
    pub async fn execute(
        &self,
        request: LoginRequest,
        cancel: &CancellationToken,
    ) -> ApiResult<LoginResponse> {
        if request.username.trim().is_empty() || request.password.is_empty() {
            return Err(ApiError::validation("Username and password are required"));
        }

        debug!(username = %request.username, "Attempting login");

        let mut response: LoginResponse = self
            .client
            .post_anonymous(&self.endpoint, &request, cancel)
            .await
            .inspect_err(|e| warn!(error = %e, "Login failed"))?;

        if response.access_token.is_empty() {
            warn!("Login response carried no access token");
            return Err(ApiError::new(
                ErrorType::Unknown,
                "Login response missing accessToken",
            ));
        }

        self.client.token_store().save(response.tokens());
        let username = response.username.get_or_insert(request.username);

        info!(username = %username, "Successfully authenticated");
        Ok(response)
    }
}
