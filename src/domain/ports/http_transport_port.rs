//! HTTP transport port definition.

use async_trait::async_trait;

use crate::domain::entities::{HttpRequest, HttpResponse};
use crate::domain::errors::TransportError;

/// Anything that can put a request on the wire and return status and body.
///
/// Implementations send exactly one physical request per call and never
/// retry; non-2xx statuses are responses, not errors.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends the request.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use parking_lot::Mutex;
    use reqwest::StatusCode;
    use reqwest::header::AUTHORIZATION;
    use std::collections::VecDeque;
    use std::time::Duration;

    pub type Reply = Result<HttpResponse, TransportError>;
    type Responder = Box<dyn Fn(&HttpRequest) -> Reply + Send + Sync>;

    /// Transport answering from a script and recording every request.
    ///
    /// Once the script is exhausted the responder answers.
    pub struct MockTransport {
        script: Mutex<VecDeque<Reply>>,
        responder: Responder,
        delay: Option<Duration>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl MockTransport {
        /// Creates transport answering through `responder`.
        pub fn responding(
            responder: impl Fn(&HttpRequest) -> Reply + Send + Sync + 'static,
        ) -> Self {
            Self {
                script: Mutex::new(VecDeque::new()),
                responder: Box::new(responder),
                delay: None,
                requests: Mutex::new(Vec::new()),
            }
        }

        /// Creates transport that always answers with `status` and `body`.
        pub fn always(status: StatusCode, body: &str) -> Self {
            let body = body.to_string();
            Self::responding(move |_| Ok(HttpResponse::with_body(status, body.clone())))
        }

        /// Creates transport that always fails.
        pub fn failing(error: TransportError) -> Self {
            Self::responding(move |_| Err(error.clone()))
        }

        /// Queues a reply served before the responder is consulted.
        pub fn queue(self, status: StatusCode, body: &str) -> Self {
            self.script
                .lock()
                .push_back(Ok(HttpResponse::with_body(status, body.to_string())));
            self
        }

        /// Delays every reply.
        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        /// Returns recorded requests.
        pub fn requests(&self) -> Vec<HttpRequest> {
            self.requests.lock().clone()
        }

        /// Returns number of physical sends.
        pub fn call_count(&self) -> usize {
            self.requests.lock().len()
        }

        /// Returns the `Authorization` header of each recorded request.
        pub fn authorizations(&self) -> Vec<Option<String>> {
            self.requests
                .lock()
                .iter()
                .map(|request| {
                    request
                        .headers()
                        .get(AUTHORIZATION)
                        .and_then(|value| value.to_str().ok())
                        .map(str::to_string)
                })
                .collect()
        }
    }

    #[async_trait]
    impl HttpTransport for MockTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            self.requests.lock().push(request.clone());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            let scripted = self.script.lock().pop_front();
            scripted.unwrap_or_else(|| (self.responder)(&request))
        }
    }
}
