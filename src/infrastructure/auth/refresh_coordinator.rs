//! Single-flight token refresh.
//!
//! One async mutex covers the whole refresh operation. Every caller re-reads
//! the store after acquiring it, so callers that queued behind a refresh pick
//! up its result instead of refreshing again.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::domain::entities::AuthTokens;
use crate::domain::errors::RefreshFailure;
use crate::domain::ports::{SessionEndReason, SessionObserver, TokenRefresher, TokenStore};

/// Result of a coordinated refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Store now holds these tokens.
    Refreshed(AuthTokens),
    /// Session is over; store has been cleared.
    Failed,
    /// Caller gave up; store untouched.
    Cancelled,
}

impl RefreshOutcome {
    /// Whether a usable access token is available.
    #[must_use]
    pub const fn is_refreshed(&self) -> bool {
        matches!(self, Self::Refreshed(_))
    }
}

/// Serializes refresh attempts against one token store.
pub struct RefreshCoordinator {
    store: Arc<dyn TokenStore>,
    refresher: Arc<dyn TokenRefresher>,
    observer: Arc<dyn SessionObserver>,
    lock: Mutex<()>,
}

impl RefreshCoordinator {
    /// Creates a coordinator.
    #[must_use]
    pub fn new(
        store: Arc<dyn TokenStore>,
        refresher: Arc<dyn TokenRefresher>,
        observer: Arc<dyn SessionObserver>,
    ) -> Self {
        Self {
            store,
            refresher,
            observer,
            lock: Mutex::new(()),
        }
    }

    /// Renews the session after `stale_access_token` was rejected.
    ///
    /// If the store already holds a different token, someone else refreshed
    /// (or failed to) while this caller waited, and their result is reused.
    pub async fn refresh(&self, stale_access_token: &str, cancel: &CancellationToken) -> RefreshOutcome {
        let _guard = tokio::select! {
            biased;
            () = cancel.cancelled() => return RefreshOutcome::Cancelled,
            guard = self.lock.lock() => guard,
        };

        let current = self.store.get();
        if current.access_token() != stale_access_token {
            if current.is_valid() {
                debug!("Token already refreshed by a concurrent request");
                return RefreshOutcome::Refreshed(current);
            }
            debug!("Session already ended by a concurrent request");
            return RefreshOutcome::Failed;
        }

        self.refresh_locked(current, cancel).await
    }

    /// Renews the session unconditionally, for callers that refresh ahead of expiry.
    pub async fn refresh_now(&self, cancel: &CancellationToken) -> RefreshOutcome {
        let _guard = tokio::select! {
            biased;
            () = cancel.cancelled() => return RefreshOutcome::Cancelled,
            guard = self.lock.lock() => guard,
        };

        let current = self.store.get();
        self.refresh_locked(current, cancel).await
    }

    /// Clears the session once no refresh is in flight, so a refresh that
    /// completes during logout cannot write its tokens back.
    pub async fn end_session(&self) {
        let _guard = self.lock.lock().await;
        self.store.clear();
    }

    async fn refresh_locked(&self, current: AuthTokens, cancel: &CancellationToken) -> RefreshOutcome {
        if !current.can_refresh() {
            if current.is_valid() {
                warn!("Access token rejected and no refresh token available");
                self.expire(&SessionEndReason::NoRefreshToken);
            }
            return RefreshOutcome::Failed;
        }

        let result = match self.refresher.refresh(current.refresh_token(), cancel).await {
            Ok(refreshed) => Ok(refreshed),
            Err(failure) => match end_reason(&failure) {
                Some(reason) => Err((failure, reason)),
                None => {
                    debug!("Token refresh cancelled");
                    return RefreshOutcome::Cancelled;
                }
            },
        };

        // The store may have been cleared or replaced outside the lock while
        // the network call was pending; that newer state wins.
        let latest = self.store.get();
        if latest != current {
            debug!("Session changed during refresh, discarding refresh result");
            return if latest.is_valid() {
                RefreshOutcome::Refreshed(latest)
            } else {
                RefreshOutcome::Failed
            };
        }

        match result {
            Ok(refreshed) => {
                let tokens = match refreshed.refresh_token {
                    Some(rotated) => {
                        let tokens = AuthTokens::new(refreshed.access_token, rotated);
                        self.store.save(tokens.clone());
                        tokens
                    }
                    None => {
                        self.store.update_access_token(&refreshed.access_token);
                        current.with_access_token(refreshed.access_token)
                    }
                };
                info!(rotated = tokens.refresh_token() != current.refresh_token(), "Token refreshed");
                RefreshOutcome::Refreshed(tokens)
            }
            Err((failure, reason)) => {
                warn!(error = %failure, "Token refresh failed, clearing session");
                self.expire(&reason);
                RefreshOutcome::Failed
            }
        }
    }

    /// Clears the store, then notifies.
    fn expire(&self, reason: &SessionEndReason) {
        self.store.clear();
        self.observer.session_expired(reason);
    }
}

fn end_reason(failure: &RefreshFailure) -> Option<SessionEndReason> {
    if !failure.is_irrecoverable() {
        return None;
    }
    match failure {
        RefreshFailure::Rejected { status } => {
            Some(SessionEndReason::RefreshRejected { status: *status })
        }
        RefreshFailure::Transport(e) => Some(SessionEndReason::RefreshTransport {
            message: e.to_string(),
        }),
        RefreshFailure::MalformedResponse { .. } => Some(SessionEndReason::MalformedRefreshResponse),
        RefreshFailure::Cancelled => None,
    }
}
