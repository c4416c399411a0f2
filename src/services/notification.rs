use crate::models::{AppealModel, AppealStatus};
use serde::Serialize;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum NotificationTarget {
    User(i64),
    Moderators,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Submitted,
    Approved,
    Rejected,
    UnbanFailed,
}

/// What the moderators or the appellant need to see about an appeal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppealSummary {
    pub id: i32,
    pub user_id: i64,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub message: String,
    pub status: AppealStatus,
    pub resolution_reason: Option<String>,
}

impl From<&AppealModel> for AppealSummary {
    fn from(a: &AppealModel) -> Self {
        Self {
            id: a.id,
            user_id: a.user_id,
            username: a.username.clone(),
            display_name: a.display_name.clone(),
            message: a.message.clone(),
            status: a.status,
            resolution_reason: a.resolution_reason.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationIntent {
    pub target: NotificationTarget,
    pub kind: NotificationKind,
    pub appeal: AppealSummary,
    /// Extra context, e.g. why an unban failed.
    pub detail: Option<String>,
}

impl NotificationIntent {
    pub fn new(target: NotificationTarget, kind: NotificationKind, appeal: &AppealModel) -> Self {
        Self {
            target,
            kind,
            appeal: AppealSummary::from(appeal),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Hands notification intents to whoever delivers them.
#[derive(Clone)]
pub struct Notifier {
    sender: mpsc::UnboundedSender<NotificationIntent>,
}

impl Notifier {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<NotificationIntent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    pub fn emit(&self, intent: NotificationIntent) {
        let kind = intent.kind;
        let appeal_id = intent.appeal.id;
        if self.sender.send(intent).is_err() {
            tracing::warn!(appeal_id, ?kind, "Notification dropped: delivery is not running");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn appeal() -> AppealModel {
        AppealModel {
            id: 3,
            user_id: 99,
            username: None,
            display_name: Some("Kimi".to_string()),
            message: "Please reconsider my ban".to_string(),
            status: AppealStatus::Pending,
            created_at: chrono::Utc::now().naive_utc(),
            resolved_at: None,
            resolved_by: None,
            resolution_reason: None,
        }
    }

    #[tokio::test]
    async fn emitted_intents_reach_the_receiver() {
        let (notifier, mut rx) = Notifier::channel();
        notifier.emit(NotificationIntent::new(
            NotificationTarget::Moderators,
            NotificationKind::Submitted,
            &appeal(),
        ));

        let intent = rx.recv().await.unwrap();
        assert_eq!(intent.kind, NotificationKind::Submitted);
        assert_eq!(intent.appeal.id, 3);
    }

    #[test]
    fn emit_without_receiver_does_not_panic() {
        let (notifier, rx) = Notifier::channel();
        drop(rx);
        notifier.emit(NotificationIntent::new(
            NotificationTarget::User(99),
            NotificationKind::Approved,
            &appeal(),
        ));
    }

    #[test]
    fn intent_serializes_target_and_kind() {
        let intent = NotificationIntent::new(
            NotificationTarget::Moderators,
            NotificationKind::UnbanFailed,
            &appeal(),
        )
        .with_detail("telegram: timed out after 30s");
        let json = serde_json::to_value(&intent).unwrap();
        assert_eq!(json["target"]["type"], "moderators");
        assert_eq!(json["kind"], "unban_failed");
        assert_eq!(json["detail"], "telegram: timed out after 30s");
    }
}
