//! Token store port definition.

use crate::domain::entities::AuthTokens;

/// Holder of the current session's token pair.
///
/// Every operation is atomic with respect to the others and never waits on
/// I/O; readers always see a whole pair, never half of an update.
pub trait TokenStore: Send + Sync {
    /// Returns a snapshot of the current pair.
    fn get(&self) -> AuthTokens;

    /// Replaces both tokens.
    fn save(&self, tokens: AuthTokens);

    /// Resets to the logged-out pair.
    fn clear(&self);

    /// Replaces the access token, keeping the refresh token.
    fn update_access_token(&self, access_token: &str);
}
