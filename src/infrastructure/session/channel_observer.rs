//! Channel-backed session observer.

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::domain::ports::{SessionEndReason, SessionObserver};

/// Event delivered to the session layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The session cannot be renewed; the user must log in again.
    Expired {
        /// Why renewal failed.
        reason: SessionEndReason,
    },
}

/// Forwards session notifications onto an unbounded channel so the receiving
/// side can react on its own task.
#[derive(Debug, Clone)]
pub struct ChannelSessionObserver {
    event_tx: mpsc::UnboundedSender<SessionEvent>,
}

impl ChannelSessionObserver {
    /// Creates the observer and the receiving end of its channel.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        (Self { event_tx }, event_rx)
    }
}

impl SessionObserver for ChannelSessionObserver {
    fn session_expired(&self, reason: &SessionEndReason) {
        warn!(reason = %reason, "Session expired");
        if self
            .event_tx
            .send(SessionEvent::Expired {
                reason: reason.clone(),
            })
            .is_err()
        {
            debug!("Session event receiver dropped");
        }
    }
}
