//! The read/unread notification list.
//!
//! The feed seeds from the HTTP list (or the channel's `connected`
//! snapshot) and then prepends pushed events as they arrive. Events are
//! applied in arrival order with no deduplication beyond the naive prepend;
//! out-of-order or duplicate pushes show up exactly as delivered.

use campus_api::types::Notification;
use campus_api::{ApiClient, Result};

use crate::channel::ChannelEvent;

/// Notification list, newest first.
#[derive(Debug, Default)]
pub struct NotificationFeed {
    items: Vec<Notification>,
}

impl NotificationFeed {
    /// Creates an empty feed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The notifications, newest first.
    #[must_use]
    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    /// How many notifications are unread.
    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|n| !n.read).count()
    }

    /// Replaces the list with a server snapshot.
    pub fn seed(&mut self, items: Vec<Notification>) {
        self.items = items;
    }

    /// Applies a channel event: `connected` replaces the list, a push
    /// prepends.
    pub fn apply(&mut self, event: ChannelEvent) {
        match event {
            ChannelEvent::Connected(items) => self.seed(items),
            ChannelEvent::Notification(notification) => self.items.insert(0, notification),
        }
    }

    /// Marks one notification read locally; returns whether it was found.
    pub fn mark_read_local(&mut self, notification_id: &str) -> bool {
        match self.items.iter_mut().find(|n| n.id == notification_id) {
            Some(item) => {
                item.read = true;
                true
            }
            None => false,
        }
    }

    /// Marks every notification read locally.
    pub fn mark_all_read_local(&mut self) {
        for item in &mut self.items {
            item.read = true;
        }
    }

    /// Refreshes the list from the server.
    pub async fn refresh(&mut self, api: &ApiClient) -> Result<()> {
        self.seed(api.list_notifications().await?);
        Ok(())
    }

    /// Marks one notification read server-side, then locally.
    pub async fn mark_read(&mut self, api: &ApiClient, notification_id: &str) -> Result<()> {
        api.mark_notification_read(notification_id).await?;
        self.mark_read_local(notification_id);
        Ok(())
    }

    /// Marks everything read server-side, then locally.
    pub async fn mark_all_read(&mut self, api: &ApiClient) -> Result<()> {
        api.mark_all_notifications_read().await?;
        self.mark_all_read_local();
        Ok(())
    }
}
