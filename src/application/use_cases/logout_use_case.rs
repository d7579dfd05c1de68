//! Logout use case implementation.

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::infrastructure::http::ApiClient;

/// Ends the session locally, telling the server when it is reachable.
#[derive(Clone)]
pub struct LogoutUseCase {
    client: ApiClient,
    endpoint: Option<String>,
}

impl LogoutUseCase {
    /// Creates new logout use case. `None` skips the remote call.
    #[must_use]
    pub const fn new(client: ApiClient, endpoint: Option<String>) -> Self {
        Self { client, endpoint }
    }

    /// Executes logout. Local tokens are cleared whatever the server says.
    pub async fn execute(&self, cancel: &CancellationToken) {
        if let Some(endpoint) = &self.endpoint
            && self.client.token_store().get().is_valid()
        {
            debug!(endpoint = %endpoint, "Notifying server of logout");
            if let Err(e) = self
                .client
                .post_no_content(endpoint, &serde_json::json!({}), cancel)
                .await
            {
                warn!(error = %e, "Remote logout failed, clearing local session anyway");
            }
        }

        self.client.end_session().await;
        info!("Logged out");
    }
}
