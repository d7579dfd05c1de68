//! Session observer port definition.

use std::fmt;

/// Why the session ended without the user logging out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEndReason {
    /// The refresh endpoint answered with a non-success status.
    RefreshRejected {
        /// HTTP status of the refresh response.
        status: u16,
    },
    /// The refresh endpoint could not be reached.
    RefreshTransport {
        /// Transport error description.
        message: String,
    },
    /// The refresh endpoint answered 2xx with an unusable body.
    MalformedRefreshResponse,
    /// A 401 arrived for a session that holds no refresh token.
    NoRefreshToken,
}

impl fmt::Display for SessionEndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RefreshRejected { status } => write!(f, "refresh rejected with HTTP {status}"),
            Self::RefreshTransport { message } => write!(f, "refresh request failed: {message}"),
            Self::MalformedRefreshResponse => write!(f, "malformed refresh response"),
            Self::NoRefreshToken => write!(f, "no refresh token"),
        }
    }
}

/// Port notified when a session ends irrecoverably.
///
/// Registered once at construction; the session layer reacts (for example
/// by forcing a re-login). Called synchronously, so implementations must not
/// block.
pub trait SessionObserver: Send + Sync {
    /// Called once per irrecoverable refresh failure.
    fn session_expired(&self, reason: &SessionEndReason);
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use parking_lot::Mutex;

    /// Observer recording notifications.
    #[derive(Default)]
    pub struct MockSessionObserver {
        pub reasons: Mutex<Vec<SessionEndReason>>,
    }

    impl MockSessionObserver {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn count(&self) -> usize {
            self.reasons.lock().len()
        }
    }

    impl SessionObserver for MockSessionObserver {
        fn session_expired(&self, reason: &SessionEndReason) {
            self.reasons.lock().push(reason.clone());
        }
    }
}
