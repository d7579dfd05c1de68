//! Token refresher port definition.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::domain::errors::RefreshFailure;

/// Credentials returned by a successful refresh.
#[derive(Clone, PartialEq, Eq)]
pub struct RefreshedTokens {
    /// New access token.
    pub access_token: String,
    /// Rotated refresh token, when the server issued one.
    pub refresh_token: Option<String>,
}

impl RefreshedTokens {
    /// Creates refreshed tokens without rotation.
    #[must_use]
    pub fn access_only(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
        }
    }

    /// Creates refreshed tokens with a rotated refresh token.
    #[must_use]
    pub fn rotated(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: Some(refresh_token.into()),
        }
    }
}

impl std::fmt::Debug for RefreshedTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshedTokens")
            .field("rotated", &self.refresh_token.is_some())
            .finish_non_exhaustive()
    }
}

/// Port exchanging a refresh token for a new access token.
///
/// Implementations make at most one network call per invocation and never
/// retry; retry policy belongs to the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    /// Exchanges `refresh_token` for new credentials.
    async fn refresh(
        &self,
        refresh_token: &str,
        cancel: &CancellationToken,
    ) -> Result<RefreshedTokens, RefreshFailure>;
}
