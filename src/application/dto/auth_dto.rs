//! Authentication DTOs.

use serde::{Deserialize, Serialize};

use crate::domain::entities::AuthTokens;
use crate::domain::ports::RefreshedTokens;

/// Where a pre-existing token pair came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    /// Token from environment variable.
    Environment,
    /// Token passed on the command line.
    CommandLine,
    /// Token handed over by the embedding application.
    Caller,
}

impl TokenSource {
    /// Returns human-readable description.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Environment => "environment variable",
            Self::CommandLine => "command line",
            Self::Caller => "caller",
        }
    }
}

impl std::fmt::Display for TokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Body of `POST /auth/login`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Account name.
    pub username: String,
    /// Account password.
    pub password: String,
}

impl LoginRequest {
    /// Creates new login request.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Body returned by `POST /auth/login`.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Issued access token.
    #[serde(default)]
    pub access_token: String,
    /// Issued refresh token.
    #[serde(default)]
    pub refresh_token: String,
    /// Display name; some servers omit it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl std::fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginResponse")
            .field("tokens", &self.tokens())
            .field("username", &self.username)
            .finish()
    }
}

impl LoginResponse {
    /// Token pair carried by this response.
    #[must_use]
    pub fn tokens(&self) -> AuthTokens {
        AuthTokens::new(self.access_token.clone(), self.refresh_token.clone())
    }
}

/// Body of `POST /auth/refresh`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    /// Refresh token being exchanged.
    pub refresh_token: String,
}

impl RefreshTokenRequest {
    /// Creates new refresh request.
    #[must_use]
    pub fn new(refresh_token: impl Into<String>) -> Self {
        Self {
            refresh_token: refresh_token.into(),
        }
    }
}

impl std::fmt::Debug for RefreshTokenRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshTokenRequest").finish_non_exhaustive()
    }
}

/// Body returned by `POST /auth/refresh`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenResponse {
    /// New access token.
    pub access_token: String,
    /// Rotated refresh token, if the server rotates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl std::fmt::Debug for RefreshTokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshTokenResponse")
            .field("rotated", &self.refresh_token.is_some())
            .finish_non_exhaustive()
    }
}

impl From<RefreshTokenResponse> for RefreshedTokens {
    fn from(response: RefreshTokenResponse) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token.filter(|token| !token.is_empty()),
        }
    }
}

/// A token pair persisted elsewhere, handed in to resume a session.
#[derive(Debug, Clone)]
pub struct SessionSeed {
    /// Tokens to install.
    pub tokens: AuthTokens,
    /// Where the tokens came from.
    pub source: TokenSource,
}

impl SessionSeed {
    /// Creates new seed.
    #[must_use]
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        source: TokenSource,
    ) -> Self {
        Self {
            tokens: AuthTokens::new(access_token, refresh_token),
            source,
        }
    }
}
