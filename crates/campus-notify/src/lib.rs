//! Campus Notification Channel
//!
//! Client side of the push-notification transport: a persistent WebSocket
//! connection whose events fan out in-process over a broadcast channel,
//! plus the read/unread notification feed the header bell renders.

pub mod channel;
pub mod feed;

pub use channel::{ChannelEvent, NotificationChannel, NotifyError};
pub use feed::NotificationFeed;
