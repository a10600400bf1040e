//! WebSocket adapter for the push-notification transport.
//!
//! The channel is a long-lived connection outside the request/response
//! cycle: events are applied as they arrive with no ordering guarantee
//! relative to in-flight fetches. Incoming frames are decoded into
//! [`ChannelEvent`]s and fanned out over a `tokio::sync::broadcast`
//! channel; any number of consumers (the feed, the `watch` command) can
//! subscribe. A dropped connection ends [`NotificationChannel::run`];
//! reconnecting is user-initiated, like every other retry in the client.

use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio_tungstenite::connect_async;
use tracing::{debug, info, warn};
use tungstenite::Message;

use campus_api::types::Notification;

/// Errors produced while driving the notification channel.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// The WebSocket transport failed.
    #[error("Notification channel error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    /// A frame could not be decoded as a channel event.
    #[error("Malformed notification event: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Events delivered over the notification channel.
///
/// Serialized as JSON objects with `event` and `payload` fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum ChannelEvent {
    /// Sent once on connect with the current notification list, newest
    /// first.
    Connected(Vec<Notification>),
    /// A new notification was pushed.
    Notification(Notification),
}

impl ChannelEvent {
    /// Returns the event name as a string.
    #[must_use]
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::Connected(_) => "connected",
            Self::Notification(_) => "notification",
        }
    }
}

/// Owns the broadcast fan-out for channel events.
#[derive(Debug, Clone)]
pub struct NotificationChannel {
    sender: broadcast::Sender<ChannelEvent>,
}

impl Default for NotificationChannel {
    fn default() -> Self {
        Self::new(100)
    }
}

impl NotificationChannel {
    /// Creates a channel with the given per-subscriber buffer capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Creates a new subscriber. Slow subscribers lag rather than block the
    /// connection.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ChannelEvent> {
        self.sender.subscribe()
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Connects and pumps events until the server closes the connection.
    ///
    /// The bearer token rides in the URL query since WebSocket upgrades
    /// carry no request body. Pings are answered; text frames are decoded
    /// and broadcast; undecodable frames are logged and skipped rather
    /// than killing the connection.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::WebSocket`] when the connection fails or the
    /// transport errors mid-stream. A clean server close is `Ok`.
    pub async fn run(&self, url: &str, token: &str) -> Result<(), NotifyError> {
        let separator = if url.contains('?') { '&' } else { '?' };
        let connect_url = format!("{url}{separator}token={token}");

        info!(url, "Connecting notification channel");
        let (stream, _) = connect_async(connect_url.as_str()).await?;
        let (mut sink, mut source) = stream.split();

        while let Some(frame) = source.next().await {
            match frame? {
                Message::Text(text) => match serde_json::from_str::<ChannelEvent>(&text) {
                    Ok(event) => {
                        debug!(event = event.event_name(), "Notification event");
                        // send() only fails with no subscribers, which is fine
                        let _ = self.sender.send(event);
                    }
                    Err(e) => {
                        warn!(error = %e, "Skipping undecodable notification frame");
                    }
                },
                Message::Ping(data) => {
                    sink.send(Message::Pong(data)).await?;
                }
                Message::Close(_) => {
                    info!("Notification channel closed by server");
                    break;
                }
                Message::Binary(_) | Message::Pong(_) | Message::Frame(_) => {
                    // The server does not send these; ignore.
                }
            }
        }

        Ok(())
    }
}
