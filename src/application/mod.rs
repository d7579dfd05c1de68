//! Application layer with use cases and DTOs.

/// Data transfer objects.
pub mod dto;
/// Use case implementations.
pub mod use_cases;

pub use dto::{
    LoginRequest, LoginResponse, RefreshTokenRequest, RefreshTokenResponse, SessionSeed,
    TokenSource,
};
pub use use_cases::{LoginUseCase, LogoutUseCase, RestoreSessionUseCase};
