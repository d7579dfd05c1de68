//! Session restore use case.

use std::sync::Arc;

use tracing::{debug, info};

use crate::application::dto::{SessionSeed, TokenSource};
use crate::domain::ports::TokenStore;

/// Installs a token pair persisted outside this process.
pub struct RestoreSessionUseCase {
    store: Arc<dyn TokenStore>,
}

impl RestoreSessionUseCase {
    /// Creates new use case.
    #[must_use]
    pub const fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    /// Installs the first seed that carries an access token.
    ///
    /// Seeds are tried in order, so callers list them by priority. A seed
    /// with only a refresh token is skipped: the session would start
    /// without credentials and could not tell a 401 from a missing login.
    ///
    /// Returns the source of the installed seed.
    pub fn execute(&self, seeds: impl IntoIterator<Item = SessionSeed>) -> Option<TokenSource> {
        for seed in seeds {
            if !seed.tokens.is_valid() {
                debug!(source = %seed.source, "Skipping seed without access token");
                continue;
            }

            info!(
                source = %seed.source,
                can_refresh = seed.tokens.can_refresh(),
                "Restoring session"
            );
            self.store.save(seed.tokens);
            return Some(seed.source);
        }

        debug!("No session to restore");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::AuthTokens;
    use crate::domain::ports::mocks::MockTokenStore;

    #[test]
    fn test_first_valid_seed_wins() {
        let store = Arc::new(MockTokenStore::new());
        let use_case = RestoreSessionUseCase::new(store.clone());

        let source = use_case.execute([
            SessionSeed::new("", "r0", TokenSource::Caller),
            SessionSeed::new("a1", "r1", TokenSource::CommandLine),
            SessionSeed::new("a2", "r2", TokenSource::Environment),
        ]);

        assert_eq!(source, Some(TokenSource::CommandLine));
        assert_eq!(store.get(), AuthTokens::new("a1", "r1"));
    }

    #[test]
    fn test_access_only_seed_is_accepted() {
        let store = Arc::new(MockTokenStore::new());
        let use_case = RestoreSessionUseCase::new(store.clone());

        let source = use_case.execute([SessionSeed::new("a1", "", TokenSource::Caller)]);

        assert_eq!(source, Some(TokenSource::Caller));
        assert!(!store.get().can_refresh());
    }

    #[test]
    fn test_no_valid_seed_leaves_store_untouched() {
        let store = Arc::new(MockTokenStore::with_tokens("a0", "r0"));
        let use_case = RestoreSessionUseCase::new(store.clone());

        let source = use_case.execute([SessionSeed::new("", "r1", TokenSource::Environment)]);

        assert_eq!(source, None);
        assert_eq!(store.get(), AuthTokens::new("a0", "r0"));
    }
}
