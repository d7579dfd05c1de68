//! Request middleware chain.
//!
//! Each middleware sees the request, may rewrite it, and decides whether and
//! how often to call the rest of the chain. The chain is composed once when
//! the client is built; the last link is the transport.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::domain::entities::{HttpRequest, HttpResponse};
use crate::domain::errors::{ApiError, ApiResult};
use crate::domain::ports::{HttpTransport, TokenStore};
use crate::infrastructure::auth::{RefreshCoordinator, RefreshOutcome};

/// A single step of request processing.
#[async_trait]
pub trait Middleware: Send + Sync {
    /// Handles `request`, delegating to `next` for the remainder of the chain.
    async fn handle(
        &self,
        request: HttpRequest,
        cancel: &CancellationToken,
        next: Next<'_>,
    ) -> ApiResult<HttpResponse>;
}

/// The remainder of a chain. `Copy`, so a middleware may run it more than once.
#[derive(Clone, Copy)]
pub struct Next<'a> {
    transport: &'a dyn HttpTransport,
    middleware: &'a [Arc<dyn Middleware>],
}

impl Next<'_> {
    /// Runs the remaining middleware, then the transport.
    ///
    /// # Errors
    /// Returns the first error produced along the chain; transport failures
    /// are classified on the way out.
    pub async fn run(self, request: HttpRequest, cancel: &CancellationToken) -> ApiResult<HttpResponse> {
        if let Some((current, rest)) = self.middleware.split_first() {
            let next = Next {
                transport: self.transport,
                middleware: rest,
            };
            return current.handle(request, cancel, next).await;
        }

        if cancel.is_cancelled() {
            return Err(ApiError::cancelled());
        }
        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(ApiError::cancelled()),
            result = self.transport.send(request) => result.map_err(ApiError::from),
        }
    }
}

/// Ordered middleware in front of a transport.
#[derive(Clone)]
pub struct MiddlewareChain {
    transport: Arc<dyn HttpTransport>,
    middleware: Vec<Arc<dyn Middleware>>,
}

impl MiddlewareChain {
    /// Creates a chain with no middleware.
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            middleware: Vec::new(),
        }
    }

    /// Appends a middleware; earlier middleware run first.
    #[must_use]
    pub fn with(mut self, middleware: impl Middleware + 'static) -> Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    /// Sends `request` through the chain.
    ///
    /// # Errors
    /// See [`Next::run`].
    pub async fn execute(
        &self,
        request: HttpRequest,
        cancel: &CancellationToken,
    ) -> ApiResult<HttpResponse> {
        let next = Next {
            transport: self.transport.as_ref(),
            middleware: &self.middleware,
        };
        next.run(request, cancel).await
    }
}

/// Attaches the current bearer token to authenticated requests and strips
/// credentials from anonymous ones.
pub struct AuthHeaderMiddleware {
    store: Arc<dyn TokenStore>,
}

impl AuthHeaderMiddleware {
    /// Creates the middleware.
    #[must_use]
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Middleware for AuthHeaderMiddleware {
    async fn handle(
        &self,
        mut request: HttpRequest,
        cancel: &CancellationToken,
        next: Next<'_>,
    ) -> ApiResult<HttpResponse> {
        if request.is_authenticated() {
            let tokens = self.store.get();
            if tokens.is_valid() {
                request.set_bearer(tokens.access_token());
            } else {
                request.strip_authorization();
            }
        } else {
            request.strip_authorization();
        }
        next.run(request, cancel).await
    }
}

/// On 401, renews the session through the coordinator and replays the request
/// exactly once with the new token.
pub struct RefreshRetryMiddleware {
    coordinator: Arc<RefreshCoordinator>,
}

impl RefreshRetryMiddleware {
    /// Creates the middleware.
    #[must_use]
    pub fn new(coordinator: Arc<RefreshCoordinator>) -> Self {
        Self { coordinator }
    }
}

fn sent_access_token(request: &HttpRequest) -> String {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .unwrap_or_default()
        .to_string()
}

#[async_trait]
impl Middleware for RefreshRetryMiddleware {
    async fn handle(
        &self,
        request: HttpRequest,
        cancel: &CancellationToken,
        next: Next<'_>,
    ) -> ApiResult<HttpResponse> {
        if !request.is_authenticated() {
            return next.run(request, cancel).await;
        }

        let stale_token = sent_access_token(&request);
        let mut replay = request.replay_template();

        let response = next.run(request, cancel).await?;
        if !response.is_unauthorized() {
            return Ok(response);
        }

        debug!(path = %replay.path(), "Received 401, attempting token refresh");
        match self.coordinator.refresh(&stale_token, cancel).await {
            RefreshOutcome::Refreshed(tokens) => {
                if cancel.is_cancelled() {
                    debug!(path = %replay.path(), "Cancelled before replay");
                    return Err(ApiError::cancelled());
                }
                replay.set_bearer(tokens.access_token());
                debug!(path = %replay.path(), "Replaying request with refreshed token");
                next.run(replay, cancel).await
            }
            RefreshOutcome::Failed => Err(ApiError::session_expired()),
            RefreshOutcome::Cancelled => Err(ApiError::cancelled()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::AuthTokens;
    use crate::domain::errors::{ErrorType, RefreshFailure};
    use crate::domain::ports::mocks::{CountingRefresher, MockSessionObserver, MockTransport};
    use crate::infrastructure::storage::InMemoryTokenStore;
    use reqwest::StatusCode;
    use std::time::Duration;

    struct Fixture {
        transport: Arc<MockTransport>,
        store: Arc<InMemoryTokenStore>,
        refresher: Arc<CountingRefresher>,
        chain: MiddlewareChain,
    }

    fn fixture(transport: MockTransport, refresher: CountingRefresher, tokens: AuthTokens) -> Fixture {
        let transport = Arc::new(transport);
        let store = Arc::new(InMemoryTokenStore::with_tokens(tokens));
        let refresher = Arc::new(refresher);
        let coordinator = Arc::new(RefreshCoordinator::new(
            store.clone(),
            refresher.clone(),
            Arc::new(MockSessionObserver::new()),
        ));
        let chain = MiddlewareChain::new(transport.clone())
            .with(AuthHeaderMiddleware::new(store.clone()))
            .with(RefreshRetryMiddleware::new(coordinator));
        Fixture {
            transport,
            store,
            refresher,
            chain,
        }
    }

    #[tokio::test]
    async fn test_attaches_bearer_and_sends_once_on_success() {
        let f = fixture(
            MockTransport::always(StatusCode::OK, "{}"),
            CountingRefresher::succeeding("a2", Duration::ZERO),
            AuthTokens::new("a1", "r1"),
        );

        let response = f
            .chain
            .execute(HttpRequest::get("/me"), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(f.transport.authorizations(), vec![Some("Bearer a1".to_string())]);
        assert_eq!(f.refresher.calls(), 0);
    }

    #[tokio::test]
    async fn test_replays_once_with_new_token_after_401() {
        let f = fixture(
            MockTransport::always(StatusCode::OK, "{}").queue(StatusCode::UNAUTHORIZED, ""),
            CountingRefresher::succeeding("a2", Duration::ZERO),
            AuthTokens::new("a1", "r1"),
        );

        let response = f
            .chain
            .execute(HttpRequest::get("/orders"), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            f.transport.authorizations(),
            vec![Some("Bearer a1".to_string()), Some("Bearer a2".to_string())]
        );
        assert_eq!(f.store.get(), AuthTokens::new("a2", "r1"));
    }

    #[tokio::test]
    async fn test_second_401_is_returned_without_another_refresh() {
        let f = fixture(
            MockTransport::always(StatusCode::UNAUTHORIZED, "still no"),
            CountingRefresher::succeeding("a2", Duration::ZERO),
            AuthTokens::new("a1", "r1"),
        );

        let response = f
            .chain
            .execute(HttpRequest::get("/orders"), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(f.transport.call_count(), 2);
        assert_eq!(f.refresher.calls(), 1);
    }

    #[tokio::test]
    async fn test_failed_refresh_is_session_expired() {
        let f = fixture(
            MockTransport::always(StatusCode::UNAUTHORIZED, ""),
            CountingRefresher::failing(RefreshFailure::Rejected { status: 400 }, Duration::ZERO),
            AuthTokens::new("a1", "r1"),
        );

        let error = f
            .chain
            .execute(HttpRequest::get("/orders"), &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(error.error_type(), ErrorType::Auth);
        assert!(error.is_unauthorized());
        assert_eq!(f.transport.call_count(), 1);
        assert_eq!(f.store.get(), AuthTokens::empty());
    }

    #[tokio::test]
    async fn test_anonymous_requests_never_carry_credentials_or_refresh() {
        let f = fixture(
            MockTransport::always(StatusCode::UNAUTHORIZED, "bad credentials"),
            CountingRefresher::succeeding("a2", Duration::ZERO),
            AuthTokens::new("stale", "r1"),
        );
        let mut request = HttpRequest::post("/auth/login").anonymous();
        request.set_bearer("smuggled");

        let response = f
            .chain
            .execute(request, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(f.transport.authorizations(), vec![None]);
        assert_eq!(f.refresher.calls(), 0);
        assert_eq!(f.store.get(), AuthTokens::new("stale", "r1"));
    }

    #[tokio::test]
    async fn test_logged_out_requests_go_without_credentials() {
        let f = fixture(
            MockTransport::always(StatusCode::OK, ""),
            CountingRefresher::succeeding("a2", Duration::ZERO),
            AuthTokens::empty(),
        );

        f.chain
            .execute(HttpRequest::get("/public"), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(f.transport.authorizations(), vec![None]);
    }

    #[tokio::test]
    async fn test_cancelled_before_dispatch_sends_nothing() {
        let f = fixture(
            MockTransport::always(StatusCode::OK, ""),
            CountingRefresher::succeeding("a2", Duration::ZERO),
            AuthTokens::new("a1", "r1"),
        );
        let cancel = CancellationToken::new();
        cancel.cancel();

        let error = f
            .chain
            .execute(HttpRequest::get("/orders"), &cancel)
            .await
            .unwrap_err();

        assert!(error.is_cancelled());
        assert_eq!(f.transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_cancel_during_refresh_skips_replay_and_keeps_tokens() {
        let f = fixture(
            MockTransport::always(StatusCode::UNAUTHORIZED, ""),
            CountingRefresher::succeeding("a2", Duration::from_secs(5)),
            AuthTokens::new("a1", "r1"),
        );
        let cancel = CancellationToken::new();
        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let error = f
            .chain
            .execute(HttpRequest::get("/orders"), &cancel)
            .await
            .unwrap_err();

        assert_eq!(error.error_type(), ErrorType::Cancelled);
        assert_eq!(f.transport.call_count(), 1);
        assert_eq!(f.store.get(), AuthTokens::new("a1", "r1"));
    }

    #[test]
    fn test_sent_access_token_extraction() {
        let mut request = HttpRequest::get("/x");
        assert_eq!(sent_access_token(&request), "");

        request.set_bearer("a1");
        assert_eq!(sent_access_token(&request), "a1");
    }
}
