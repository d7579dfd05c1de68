//! Access/refresh token pair value object.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Opaque access/refresh token pair.
///
/// The empty pair represents a logged-out session. Instances are immutable;
/// a token store swaps whole values instead of mutating one in place.
#[derive(Clone, Default, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct AuthTokens {
    access_token: String,
    refresh_token: String,
}

impl AuthTokens {
    /// Creates a token pair.
    #[must_use]
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }

    /// Returns the logged-out pair.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the access token.
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Returns the refresh token.
    #[must_use]
    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }

    /// Whether an access token is present.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.access_token.is_empty()
    }

    /// Whether a refresh token is present.
    #[must_use]
    pub fn can_refresh(&self) -> bool {
        !self.refresh_token.is_empty()
    }

    /// Returns a copy with the access token replaced and the refresh token kept.
    #[must_use]
    pub fn with_access_token(&self, access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: self.refresh_token.clone(),
        }
    }
}

fn mask(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    if value.len() <= 10 || !value.is_char_boundary(4) || !value.is_char_boundary(value.len() - 4) {
        return "*".repeat(value.chars().count());
    }

    let visible_prefix = &value[..4];
    let visible_suffix = &value[value.len() - 4..];
    format!("{visible_prefix}...{visible_suffix}")
}

impl fmt::Debug for AuthTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthTokens")
            .field("access_token", &mask(&self.access_token))
            .field("refresh_token", &mask(&self.refresh_token))
            .finish()
    }
}
