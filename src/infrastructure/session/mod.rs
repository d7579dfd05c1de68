//! Session lifecycle notifications.

mod channel_observer;

pub use channel_observer::{ChannelSessionObserver, SessionEvent};
