//! Token refresh adapters.

mod refresh_coordinator;
mod token_refresher;

pub use refresh_coordinator::{RefreshCoordinator, RefreshOutcome};
pub use token_refresher::HttpTokenRefresher;
