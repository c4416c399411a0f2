use crate::{
    error::{AppError, AppResult},
    models::{AppealModel, AppealStatus},
    services::{
        appeal_store::{AppealStats, AppealStore, NewAppeal},
        moderators::ModeratorCheck,
        notification::{NotificationIntent, NotificationKind, NotificationTarget, Notifier},
        unban::{UnbanOutcome, UnbanService},
    },
};
use std::sync::Arc;
use validator::Validate;

pub const MAX_REASON_LEN: usize = 1000;

/// Result of a successful approval. The decision stands even when `unban`
/// failed.
#[derive(Debug, Clone)]
pub struct Approval {
    pub appeal: AppealModel,
    pub unban: UnbanOutcome,
}

/// Appeal lifecycle: submission, approval and rejection.
///
/// Every operation is safe to run concurrently with any other; the store
/// decides races.
#[derive(Clone)]
pub struct AppealService {
    store: AppealStore,
    unban: Arc<UnbanService>,
    moderators: Arc<dyn ModeratorCheck>,
    notifier: Notifier,
}

impl AppealService {
    pub fn new(
        store: AppealStore,
        unban: Arc<UnbanService>,
        moderators: Arc<dyn ModeratorCheck>,
        notifier: Notifier,
    ) -> Self {
        Self {
            store,
            unban,
            moderators,
            notifier,
        }
    }

    pub fn store(&self) -> &AppealStore {
        &self.store
    }

    pub async fn submit(
        &self,
        user_id: i64,
        username: Option<&str>,
        display_name: Option<&str>,
        message: &str,
    ) -> AppResult<AppealModel> {
        let new = Self::prepare_submission(user_id, username, display_name, message)?;
        self.submit_prepared(new).await
    }

    /// Trims and validates a submission without storing it.
    pub fn prepare_submission(
        user_id: i64,
        username: Option<&str>,
        display_name: Option<&str>,
        message: &str,
    ) -> AppResult<NewAppeal> {
        let message = message.trim();
        if message.is_empty() {
            return Err(AppError::Validation(
                "appeal text cannot be empty".to_string(),
            ));
        }

        let new = NewAppeal {
            user_id,
            username: username.map(str::to_string),
            display_name: display_name.map(str::to_string),
            message: message.to_string(),
        };
        new.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        Ok(new)
    }

    /// Stores a submission from [`AppealService::prepare_submission`] and
    /// notifies moderators.
    pub async fn submit_prepared(&self, new: NewAppeal) -> AppResult<AppealModel> {
        let appeal = self.store.create(new).await?;

        self.notifier.emit(NotificationIntent::new(
            NotificationTarget::Moderators,
            NotificationKind::Submitted,
            &appeal,
        ));
        Ok(appeal)
    }

    pub async fn approve(&self, appeal_id: i32, moderator_id: i64) -> AppResult<Approval> {
        self.require_moderator(moderator_id).await?;

        // Losing the race returns here, before any unban attempt.
        let appeal = self
            .store
            .transition(
                appeal_id,
                AppealStatus::Pending,
                AppealStatus::Approved,
                moderator_id,
                None,
            )
            .await?;

        let unban = self.unban.unban(appeal.user_id).await;

        self.notifier.emit(NotificationIntent::new(
            NotificationTarget::User(appeal.user_id),
            NotificationKind::Approved,
            &appeal,
        ));
        if let UnbanOutcome::Failed { detail } = &unban {
            tracing::warn!(
                appeal_id,
                user_id = appeal.user_id,
                "Appeal approved but unban failed, manual action needed"
            );
            self.notifier.emit(
                NotificationIntent::new(
                    NotificationTarget::Moderators,
                    NotificationKind::UnbanFailed,
                    &appeal,
                )
                .with_detail(detail.clone()),
            );
        }

        Ok(Approval { appeal, unban })
    }

    pub async fn reject(
        &self,
        appeal_id: i32,
        moderator_id: i64,
        reason: &str,
    ) -> AppResult<AppealModel> {
        self.require_moderator(moderator_id).await?;

        let reason = reason.trim();
        if reason.is_empty() {
            return Err(AppError::Validation(
                "a rejection reason is required".to_string(),
            ));
        }
        if reason.chars().count() > MAX_REASON_LEN {
            return Err(AppError::Validation(format!(
                "rejection reason must be at most {} characters",
                MAX_REASON_LEN
            )));
        }

        let appeal = self
            .store
            .transition(
                appeal_id,
                AppealStatus::Pending,
                AppealStatus::Rejected,
                moderator_id,
                Some(reason.to_string()),
            )
            .await?;

        self.notifier.emit(NotificationIntent::new(
            NotificationTarget::User(appeal.user_id),
            NotificationKind::Rejected,
            &appeal,
        ));
        Ok(appeal)
    }

    /// The user's pending appeal, or failing that their latest one.
    pub async fn status_for_user(&self, user_id: i64) -> AppResult<Option<AppealModel>> {
        if let Some(active) = self.store.get_active_for_user(user_id).await? {
            return Ok(Some(active));
        }
        self.store.latest_for_user(user_id).await
    }

    pub async fn history_for_user(&self, user_id: i64, limit: u64) -> AppResult<Vec<AppealModel>> {
        self.store.list_for_user(user_id, limit).await
    }

    pub async fn info(&self, appeal_id: i32, moderator_id: i64) -> AppResult<AppealModel> {
        self.require_moderator(moderator_id).await?;
        self.store.get(appeal_id).await
    }

    pub async fn pending_list(&self, moderator_id: i64) -> AppResult<Vec<AppealModel>> {
        self.require_moderator(moderator_id).await?;
        self.store.list_by_status(AppealStatus::Pending).await
    }

    pub async fn stats(&self, moderator_id: i64) -> AppResult<AppealStats> {
        self.require_moderator(moderator_id).await?;
        self.store.stats().await
    }

    async fn require_moderator(&self, user_id: i64) -> AppResult<()> {
        if !self.moderators.is_moderator(user_id).await? {
            tracing::warn!(user_id, "Moderator command refused");
            return Err(AppError::Unauthorized);
        }
        Ok(())
    }
}
