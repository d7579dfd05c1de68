//! In-memory token store.

use parking_lot::RwLock;
use tracing::debug;

use crate::domain::entities::AuthTokens;
use crate::domain::ports::TokenStore;

/// Process-local token store; tokens are gone when the process exits.
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    tokens: RwLock<AuthTokens>,
}

impl InMemoryTokenStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `tokens`.
    #[must_use]
    pub fn with_tokens(tokens: AuthTokens) -> Self {
        Self {
            tokens: RwLock::new(tokens),
        }
    }
}

impl TokenStore for InMemoryTokenStore {
    fn get(&self) -> AuthTokens {
        self.tokens.read().clone()
    }

    fn save(&self, tokens: AuthTokens) {
        debug!(can_refresh = tokens.can_refresh(), "Saving token pair");
        *self.tokens.write() = tokens;
    }

    fn clear(&self) {
        debug!("Clearing token pair");
        *self.tokens.write() = AuthTokens::empty();
    }

    fn update_access_token(&self, access_token: &str) {
        debug!("Updating access token");
        let mut tokens = self.tokens.write();
        *tokens = tokens.with_access_token(access_token);
    }
}
