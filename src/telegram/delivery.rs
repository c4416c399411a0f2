use super::TelegramClient;
use crate::services::notification::{NotificationIntent, NotificationKind, NotificationTarget};
use crate::utils::format::{format_user_mention, truncate_text};
use tokio::sync::mpsc;

const MESSAGE_PREVIEW_CHARS: usize = 500;

/// Chat id a notification should be sent to.
pub fn destination(intent: &NotificationIntent, admin_group_id: i64) -> i64 {
    match intent.target {
        NotificationTarget::User(user_id) => user_id,
        NotificationTarget::Moderators => admin_group_id,
    }
}

pub fn render(intent: &NotificationIntent) -> String {
    let appeal = &intent.appeal;
    let who = format_user_mention(appeal.display_name.as_deref(), appeal.username.as_deref());

    match intent.kind {
        NotificationKind::Submitted => format!(
            "🆕 New appeal #{id}\n\n👤 User: {who}\n🆔 ID: {user_id}\n📝 Appeal: {text}\n\n\
             Actions:\n• /approve {id} - unban the user\n• /reject {id} <reason> - reject the appeal\n• /info {id} - details",
            id = appeal.id,
            who = who,
            user_id = appeal.user_id,
            text = truncate_text(&appeal.message, MESSAGE_PREVIEW_CHARS),
        ),
        NotificationKind::Approved => format!(
            "✅ Good news! Your appeal #{} has been approved.\n\n\
             You can rejoin the group now. Please follow the community rules.",
            appeal.id
        ),
        NotificationKind::Rejected => format!(
            "❌ Your appeal #{} has been rejected.\n\nReason: {}\n\n\
             You may file a new appeal if you have additional information.",
            appeal.id,
            appeal
                .resolution_reason
                .as_deref()
                .unwrap_or("no specific reason given")
        ),
        NotificationKind::UnbanFailed => format!(
            "⚠️ Appeal #{} was approved but {} (ID {}) could not be unbanned automatically.\n\
             Error: {}\nPlease unban the user manually.",
            appeal.id,
            who,
            appeal.user_id,
            intent.detail.as_deref().unwrap_or("unknown error")
        ),
    }
}

/// Sends notifications until every [`Notifier`](crate::services::notification::Notifier)
/// is dropped. Delivery failures are logged and skipped.
pub async fn run_delivery(
    mut receiver: mpsc::UnboundedReceiver<NotificationIntent>,
    client: TelegramClient,
    admin_group_id: i64,
) {
    while let Some(intent) = receiver.recv().await {
        let chat_id = destination(&intent, admin_group_id);
        let text = render(&intent);
        match client.send_message(chat_id, &text).await {
            Ok(_) => tracing::debug!(
                appeal_id = intent.appeal.id,
                kind = ?intent.kind,
                chat_id,
                "Notification delivered"
            ),
            Err(e) => tracing::error!(
                appeal_id = intent.appeal.id,
                kind = ?intent.kind,
                chat_id,
                "Failed to deliver notification: {}",
                e
            ),
        }
    }
    tracing::info!("Notification delivery stopped");
}
