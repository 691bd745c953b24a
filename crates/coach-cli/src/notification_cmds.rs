//! CLI handlers for `coach notification` subcommands. Every change goes
//! through the [`NotificationStore`] so the printed badge is the state the
//! store published.

use anyhow::Result;

use coach_api::ApiClient;
use coach_core::notify::{NotificationState, NotificationStore};

use crate::NotificationCommands;
use crate::render;

pub async fn run_notification_command(command: NotificationCommands, api: &ApiClient) -> Result<()> {
    let store = NotificationStore::new(api.clone());
    let state = match command {
        NotificationCommands::List => store.refresh().await?,
        NotificationCommands::Count => {
            let unread = store.refresh_count().await?;
            println!("{unread} unread");
            return Ok(());
        }
        NotificationCommands::Read { id } => store.mark_read(id).await?,
        NotificationCommands::ReadAll => store.mark_all_read().await?,
        NotificationCommands::Delete { id } => store.delete(id).await?,
    };
    print!("{}", render_state(&state));
    Ok(())
}

pub fn render_state(state: &NotificationState) -> String {
    let header = match state.badge() {
        Some(badge) => format!("Notifications ({badge} unread)\n"),
        None => "Notifications (all read)\n".to_owned(),
    };
    if state.notifications.is_empty() {
        return format!("{header}No notifications.\n");
    }
    let rows: Vec<Vec<String>> = state
        .notifications
        .iter()
        .map(|n| {
            vec![
                n.id.to_string(),
                if n.read { String::new() } else { "*".to_owned() },
                n.kind.to_string(),
                n.title.clone(),
                n.created_at.format("%Y-%m-%d %H:%M").to_string(),
            ]
        })
        .collect();
    format!(
        "{header}{}",
        render::table(&["ID", "New", "Kind", "Title", "Created"], &rows)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use coach_api::models::NotificationKind;
    use coach_test_utils::FakeBackend;

    #[tokio::test]
    async fn read_all_renders_cleared_badge() {
        let backend = FakeBackend::spawn().await;
        for i in 0..11 {
            backend.push_notification(NotificationKind::DietExpired, &format!("Dieta {i} vencida"));
        }
        let store = NotificationStore::new(backend.client());

        let before = store.refresh().await.unwrap();
        assert!(render_state(&before).starts_with("Notifications (9+ unread)"));

        let after = store.mark_all_read().await.unwrap();
        let text = render_state(&after);
        assert!(text.starts_with("Notifications (all read)"), "{text}");
        assert!(text.contains("diet_expired"));
        assert!(!text.contains(" * "), "{text}");
    }

    #[test]
    fn empty_state() {
        let text = render_state(&NotificationState::default());
        assert_eq!(text, "Notifications (all read)\nNo notifications.\n");
    }
}
