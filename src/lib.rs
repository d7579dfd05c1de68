//! Jino client - authenticated API access with transparent token refresh.
//!
//! Requests carry a bearer token from a shared token store. When the server
//! answers 401 the client renews the session once, no matter how many
//! requests noticed the expiry at the same time, and replays each failed
//! request exactly once with the new token.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing use cases and DTOs.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "jino-client";
