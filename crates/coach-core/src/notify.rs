//! Notification state shared between whoever mutates notifications and
//! whoever renders the unread badge.
//!
//! [`NotificationStore`] is the single owner: every change goes through it,
//! it calls the backend, refetches, and publishes a fresh
//! [`NotificationState`] on a `watch` channel.

use tokio::sync::{Mutex, watch};
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, info};

use coach_api::endpoints::notifications as api;
use coach_api::models::{Id, Notification};
use coach_api::{ApiClient, ApiError};

/// Counts above this are shown as `9+`.
pub const BADGE_CAP: u64 = 9;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationState {
    /// Newest first, as returned by the backend.
    pub notifications: Vec<Notification>,
    pub unread: u64,
    /// False until the first successful refresh.
    pub loaded: bool,
}

impl NotificationState {
    pub fn badge(&self) -> Option<String> {
        badge_label(self.unread)
    }
}

/// Badge text for `unread` notifications; `None` hides the badge.
pub fn badge_label(unread: u64) -> Option<String> {
    match unread {
        0 => None,
        n if n > BADGE_CAP => Some(format!("{BADGE_CAP}+")),
        n => Some(n.to_string()),
    }
}

pub struct NotificationStore {
    client: ApiClient,
    tx: watch::Sender<NotificationState>,
    /// Serializes mutations so a second one waits instead of racing.
    gate: Mutex<()>,
}

impl NotificationStore {
    pub fn new(client: ApiClient) -> Self {
        let (tx, _rx) = watch::channel(NotificationState::default());
        Self {
            client,
            tx,
            gate: Mutex::new(()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<NotificationState> {
        self.tx.subscribe()
    }

    /// Stream of states, starting with the current one.
    pub fn stream(&self) -> WatchStream<NotificationState> {
        WatchStream::new(self.tx.subscribe())
    }

    pub fn current(&self) -> NotificationState {
        self.tx.borrow().clone()
    }

    /// Reload the list and the unread count.
    pub async fn refresh(&self) -> Result<NotificationState, ApiError> {
        let _guard = self.gate.lock().await;
        self.reload().await
    }

    /// Reload only the unread count, keeping the cached list.
    pub async fn refresh_count(&self) -> Result<u64, ApiError> {
        let _guard = self.gate.lock().await;
        let unread = api::unread_count(&self.client).await?;
        self.tx.send_modify(|state| state.unread = unread);
        debug!(unread, "unread count refreshed");
        Ok(unread)
    }

    pub async fn mark_read(&self, id: Id) -> Result<NotificationState, ApiError> {
        let _guard = self.gate.lock().await;
        api::mark_read(&self.client, id).await?;
        info!(notification_id = id, "notification marked read");
        self.reload().await
    }

    /// Mark every unread notification read, one request each.
    pub async fn mark_all_read(&self) -> Result<NotificationState, ApiError> {
        let _guard = self.gate.lock().await;
        let unread: Vec<Id> = api::list_notifications(&self.client)
            .await?
            .into_iter()
            .filter(|n| !n.read)
            .map(|n| n.id)
            .collect();
        for id in &unread {
            api::mark_read(&self.client, *id).await?;
        }
        info!(count = unread.len(), "notifications marked read");
        self.reload().await
    }

    pub async fn delete(&self, id: Id) -> Result<NotificationState, ApiError> {
        let _guard = self.gate.lock().await;
        api::delete_notification(&self.client, id).await?;
        info!(notification_id = id, "notification deleted");
        self.reload().await
    }

    /// Caller must hold `gate`.
    async fn reload(&self) -> Result<NotificationState, ApiError> {
        let notifications = api::list_notifications(&self.client).await?;
        let unread = api::unread_count(&self.client).await?;
        let state = NotificationState {
            notifications,
            unread,
            loaded: true,
        };
        self.tx.send_replace(state.clone());
        debug!(unread, total = state.notifications.len(), "notification state published");
        Ok(state)
    }
}
