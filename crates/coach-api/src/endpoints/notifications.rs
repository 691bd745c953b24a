//! Coach notifications.

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::models::{Id, Notification, UnreadCount};

/// All notifications, newest first.
pub async fn list_notifications(client: &ApiClient) -> Result<Vec<Notification>, ApiError> {
    client.get("/notifications/").await
}

pub async fn unread_count(client: &ApiClient) -> Result<u64, ApiError> {
    let count: UnreadCount = client.get("/notifications/unread-count").await?;
    Ok(count.count)
}

pub async fn mark_read(client: &ApiClient, id: Id) -> Result<(), ApiError> {
    client.patch_empty(&format!("/notifications/{id}/read")).await
}

pub async fn delete_notification(client: &ApiClient, id: Id) -> Result<(), ApiError> {
    client.delete(&format!("/notifications/{id}")).await
}
