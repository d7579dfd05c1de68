//! Replayable request intent and the response it produced.

use bytes::Bytes;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};

/// Whether a request carries the session's bearer token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthMode {
    /// Attach `Authorization: Bearer <access token>` and refresh on 401.
    #[default]
    Bearer,
    /// Never attach credentials (login, refresh).
    Anonymous,
}

/// An HTTP call as the caller intended it.
///
/// Cloning yields an identical request, which is what lets the executor
/// replay a call after renewing credentials without re-running caller code.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    method: Method,
    path: String,
    headers: HeaderMap,
    body: Option<Bytes>,
    auth: AuthMode,
}

impl HttpRequest {
    /// Creates an authenticated request without a body.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: None,
            auth: AuthMode::Bearer,
        }
    }

    /// Creates an authenticated `GET`.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Creates an authenticated `POST`.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Creates an authenticated `PUT`.
    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// Creates an authenticated `DELETE`.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Marks the request as unauthenticated.
    #[must_use]
    pub fn anonymous(mut self) -> Self {
        self.auth = AuthMode::Anonymous;
        self
    }

    /// Sets a JSON body and the matching content type.
    #[must_use]
    pub fn with_json_body(mut self, body: impl Into<Bytes>) -> Self {
        self.headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        self.body = Some(body.into());
        self
    }

    /// Adds or replaces a header.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Returns the method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the path relative to the API base URL.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the body, if any.
    #[must_use]
    pub const fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Returns the authentication mode.
    #[must_use]
    pub const fn auth(&self) -> AuthMode {
        self.auth
    }

    /// Whether the bearer token should be attached.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.auth == AuthMode::Bearer
    }

    /// Replaces any `Authorization` header with a bearer credential.
    ///
    /// A token that is not a valid header value leaves the request without
    /// credentials; the server will answer 401 and the caller sees `Auth`.
    pub fn set_bearer(&mut self, access_token: &str) {
        self.strip_authorization();
        match HeaderValue::from_str(&format!("Bearer {access_token}")) {
            Ok(mut value) => {
                value.set_sensitive(true);
                self.headers.insert(header::AUTHORIZATION, value);
            }
            Err(_) => {
                tracing::warn!("Access token is not a valid header value, sending without it");
            }
        }
    }

    /// Removes the `Authorization` header.
    pub fn strip_authorization(&mut self) {
        self.headers.remove(header::AUTHORIZATION);
    }

    /// Clone of this request with credentials removed, ready for a replay.
    #[must_use]
    pub fn replay_template(&self) -> Self {
        let mut clone = self.clone();
        clone.strip_authorization();
        clone
    }
}

/// Raw response from a transport.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl HttpResponse {
    /// Creates a response.
    #[must_use]
    pub const fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Creates a response with no headers.
    #[must_use]
    pub fn with_body(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self::new(status, HeaderMap::new(), body.into())
    }

    /// Returns the status code.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the body bytes.
    #[must_use]
    pub const fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns the body as lossy UTF-8 text.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Whether the status is 2xx.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Whether the status is 401.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status == StatusCode::UNAUTHORIZED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replay_template_keeps_everything_but_authorization() {
        let mut request = HttpRequest::post("/orders")
            .with_json_body(r#"{"id":1}"#)
            .with_header(
                HeaderName::from_static("x-request-id"),
                HeaderValue::from_static("req-1"),
            );
        request.set_bearer("stale");

        let replay = request.replay_template();

        assert_eq!(*replay.method(), Method::POST);
        assert_eq!(replay.path(), "/orders");
        assert_eq!(replay.body().map(Bytes::as_ref), Some(&br#"{"id":1}"#[..]));
        assert_eq!(replay.headers()["x-request-id"], "req-1");
        assert_eq!(replay.headers()[header::CONTENT_TYPE], "application/json");
        assert!(replay.headers().get(header::AUTHORIZATION).is_none());
        assert!(request.headers().get(header::AUTHORIZATION).is_some());
    }

    #[test]
    fn test_set_bearer_replaces_existing_credentials() {
        let mut request = HttpRequest::get("/me");
        request.set_bearer("a1");
        request.set_bearer("a2");

        let values: Vec<_> = request.headers().get_all(header::AUTHORIZATION).iter().collect();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0], "Bearer a2");
    }

    #[test]
    fn test_anonymous_requests_are_not_authenticated() {
        let request = HttpRequest::post("/auth/login").anonymous();

        assert_eq!(request.auth(), AuthMode::Anonymous);
        assert!(!request.is_authenticated());
    }

    #[test]
    fn test_response_helpers() {
        let response = HttpResponse::with_body(StatusCode::UNAUTHORIZED, "expired");

        assert!(response.is_unauthorized());
        assert!(!response.is_success());
        assert_eq!(response.text(), "expired");
    }
}
