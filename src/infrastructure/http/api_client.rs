//! Authenticated API client.

use std::sync::Arc;

use reqwest::header::{HeaderName, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};
use uuid::Uuid;

use super::middleware::MiddlewareChain;
use crate::domain::entities::{HttpRequest, HttpResponse};
use crate::domain::errors::{ApiError, ApiResult, ErrorType};
use crate::domain::ports::TokenStore;
use crate::infrastructure::auth::{RefreshCoordinator, RefreshOutcome};

const REQUEST_ID: &str = "x-request-id";

/// Sends requests through the auth middleware and decodes the outcome.
///
/// A single logical call makes at most two physical requests: the original
/// and, after a successful refresh, one replay.
#[derive(Clone)]
pub struct ApiClient {
    chain: MiddlewareChain,
    store: Arc<dyn TokenStore>,
    coordinator: Arc<RefreshCoordinator>,
}

impl ApiClient {
    /// Creates a client over a composed middleware chain.
    #[must_use]
    pub fn new(
        chain: MiddlewareChain,
        store: Arc<dyn TokenStore>,
        coordinator: Arc<RefreshCoordinator>,
    ) -> Self {
        Self {
            chain,
            store,
            coordinator,
        }
    }

    /// Token store the client reads from.
    #[must_use]
    pub fn token_store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    /// Renews the session now, through the same single-flight lock as 401 handling.
    pub async fn refresh_now(&self, cancel: &CancellationToken) -> RefreshOutcome {
        self.coordinator.refresh_now(cancel).await
    }

    /// Clears the session after any in-flight refresh has settled.
    pub async fn end_session(&self) {
        self.coordinator.end_session().await;
    }

    /// `GET path`.
    ///
    /// # Errors
    /// Returns the classified failure of the call.
    pub async fn get<T>(&self, path: &str, cancel: &CancellationToken) -> ApiResult<T>
    where
        T: DeserializeOwned + Default,
    {
        self.execute(HttpRequest::get(path), cancel).await
    }

    /// `POST path` with a JSON body.
    ///
    /// # Errors
    /// Returns the classified failure of the call.
    pub async fn post<B, T>(&self, path: &str, body: &B, cancel: &CancellationToken) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Default,
    {
        let request = with_json(HttpRequest::post(path), body)?;
        self.execute(request, cancel).await
    }

    /// `POST path` with a JSON body, ignoring any response body.
    ///
    /// # Errors
    /// Returns the classified failure of the call.
    pub async fn post_no_content<B>(&self, path: &str, body: &B, cancel: &CancellationToken) -> ApiResult<()>
    where
        B: Serialize + ?Sized,
    {
        let request = with_json(HttpRequest::post(path), body)?;
        self.execute_no_content(request, cancel).await
    }

    /// `PUT path` with a JSON body.
    ///
    /// # Errors
    /// Returns the classified failure of the call.
    pub async fn put<B, T>(&self, path: &str, body: &B, cancel: &CancellationToken) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Default,
    {
        let request = with_json(HttpRequest::put(path), body)?;
        self.execute(request, cancel).await
    }

    /// `DELETE path`.
    ///
    /// # Errors
    /// Returns the classified failure of the call.
    pub async fn delete(&self, path: &str, cancel: &CancellationToken) -> ApiResult<()> {
        self.execute_no_content(HttpRequest::delete(path), cancel).await
    }

    /// `POST path` without credentials, for login-style endpoints.
    ///
    /// Never attaches `Authorization` and never triggers a refresh, even when
    /// the server answers 401.
    ///
    /// # Errors
    /// Returns the classified failure of the call.
    pub async fn post_anonymous<B, T>(&self, path: &str, body: &B, cancel: &CancellationToken) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Default,
    {
        let request = with_json(HttpRequest::post(path).anonymous(), body)?;
        self.execute(request, cancel).await
    }

    /// Sends `request` and decodes a 2xx body into `T`.
    ///
    /// An empty 2xx body yields `T::default()`.
    ///
    /// # Errors
    /// Non-2xx responses fail with the response text and status; an
    /// undecodable 2xx body fails as [`ErrorType::Unknown`].
    pub async fn execute<T>(&self, request: HttpRequest, cancel: &CancellationToken) -> ApiResult<T>
    where
        T: DeserializeOwned + Default,
    {
        let method = request.method().clone();
        let path = request.path().to_string();

        let result = self.send(request, cancel).await.and_then(|response| {
            let response = ensure_success(response)?;
            decode(&response)
        });
        if let Err(e) = &result {
            log_failure(method.as_str(), &path, e);
        }
        result
    }

    async fn execute_no_content(&self, request: HttpRequest, cancel: &CancellationToken) -> ApiResult<()> {
        let method = request.method().clone();
        let path = request.path().to_string();

        let result = self
            .send(request, cancel)
            .await
            .and_then(ensure_success)
            .map(|_| ());
        if let Err(e) = &result {
            log_failure(method.as_str(), &path, e);
        }
        result
    }

    /// Sends `request` through the middleware and returns the final response
    /// whatever its status.
    ///
    /// # Errors
    /// Fails only when no response was obtained: transport errors,
    /// cancellation, or a session that could not be renewed.
    pub async fn send(&self, mut request: HttpRequest, cancel: &CancellationToken) -> ApiResult<HttpResponse> {
        if !request.headers().contains_key(REQUEST_ID) {
            if let Ok(value) = HeaderValue::from_str(&Uuid::new_v4().to_string()) {
                request = request.with_header(HeaderName::from_static(REQUEST_ID), value);
            }
        }
        self.chain.execute(request, cancel).await
    }
}

fn with_json<B>(request: HttpRequest, body: &B) -> ApiResult<HttpRequest>
where
    B: Serialize + ?Sized,
{
    let bytes = serde_json::to_vec(body)
        .map_err(|e| ApiError::validation(format!("Failed to serialize request body: {e}")))?;
    Ok(request.with_json_body(bytes))
}

fn ensure_success(response: HttpResponse) -> ApiResult<HttpResponse> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(ApiError::from_status(response.status(), response.text()))
    }
}

fn decode<T>(response: &HttpResponse) -> ApiResult<T>
where
    T: DeserializeOwned + Default,
{
    if response.body().iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(response.body()).map_err(|e| {
        warn!(error = %e, status = response.status().as_u16(), "Failed to parse response body");
        ApiError::malformed_response(response.status(), format!("Failed to parse response: {e}"))
    })
}

fn log_failure(method: &str, path: &str, e: &ApiError) {
    match e.error_type() {
        ErrorType::Cancelled => debug!(method, path, "Request cancelled"),
        ErrorType::Unknown => error!(
            method,
            path,
            status = e.status_code(),
            error = %e,
            "Request failed"
        ),
        _ => warn!(method, path, status = e.status_code(), error = %e, "Request failed"),
    }
}
