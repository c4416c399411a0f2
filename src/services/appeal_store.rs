use crate::{
    error::{AppError, AppResult},
    models::{appeal, Appeal, AppealModel, AppealStatus},
};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, SqlErr,
};
use serde::Serialize;
use validator::Validate;

pub const MIN_APPEAL_LEN: u64 = 10;
pub const MAX_APPEAL_LEN: u64 = 1000;

/// A validated-on-demand appeal submission.
#[derive(Debug, Clone, Validate)]
pub struct NewAppeal {
    pub user_id: i64,
    pub username: Option<String>,
    pub display_name: Option<String>,
    #[validate(length(
        min = MIN_APPEAL_LEN,
        max = MAX_APPEAL_LEN,
        message = "appeal text must be between 10 and 1000 characters"
    ))]
    pub message: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AppealStats {
    pub pending: u64,
    pub approved: u64,
    pub rejected: u64,
    pub total: u64,
}

impl AppealStats {
    pub fn count(&self, status: AppealStatus) -> u64 {
        match status {
            AppealStatus::Pending => self.pending,
            AppealStatus::Approved => self.approved,
            AppealStatus::Rejected => self.rejected,
        }
    }
}

/// Durable storage for appeal records.
///
/// The two race-prone rules live here as single statements: the partial unique
/// index `idx_appeals_one_pending` guards creation, and [`AppealStore::transition`]
/// is a conditional `UPDATE ... WHERE status = expected`.
#[derive(Clone)]
pub struct AppealStore {
    db: DatabaseConnection,
}

impl AppealStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn create(&self, new: NewAppeal) -> AppResult<AppealModel> {
        let now = chrono::Utc::now().naive_utc();
        let model = appeal::ActiveModel {
            user_id: ActiveValue::Set(new.user_id),
            username: ActiveValue::Set(new.username),
            display_name: ActiveValue::Set(new.display_name),
            message: ActiveValue::Set(new.message),
            status: ActiveValue::Set(AppealStatus::Pending),
            created_at: ActiveValue::Set(now),
            ..Default::default()
        };

        match model.insert(&self.db).await {
            Ok(saved) => {
                tracing::info!(appeal_id = saved.id, user_id = saved.user_id, "Appeal created");
                Ok(saved)
            }
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(AppError::DuplicatePending)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get(&self, id: i32) -> AppResult<AppealModel> {
        Appeal::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn get_active_for_user(&self, user_id: i64) -> AppResult<Option<AppealModel>> {
        let appeal = Appeal::find()
            .filter(appeal::Column::UserId.eq(user_id))
            .filter(appeal::Column::Status.eq(AppealStatus::Pending))
            .one(&self.db)
            .await?;
        Ok(appeal)
    }

    pub async fn latest_for_user(&self, user_id: i64) -> AppResult<Option<AppealModel>> {
        let appeal = Appeal::find()
            .filter(appeal::Column::UserId.eq(user_id))
            .order_by_desc(appeal::Column::Id)
            .one(&self.db)
            .await?;
        Ok(appeal)
    }

    /// Newest first.
    pub async fn list_for_user(&self, user_id: i64, limit: u64) -> AppResult<Vec<AppealModel>> {
        let appeals = Appeal::find()
            .filter(appeal::Column::UserId.eq(user_id))
            .order_by_desc(appeal::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?;
        Ok(appeals)
    }

    /// Creation order.
    pub async fn list_by_status(&self, status: AppealStatus) -> AppResult<Vec<AppealModel>> {
        let appeals = Appeal::find()
            .filter(appeal::Column::Status.eq(status))
            .order_by_asc(appeal::Column::Id)
            .all(&self.db)
            .await?;
        Ok(appeals)
    }

    /// Atomically moves an appeal from `expected` to `new_status`.
    ///
    /// Exactly one of any number of concurrent callers observes `expected` and
    /// wins; the others get `AlreadyResolved` with the status the winner wrote.
    /// A missing id is `NotFound`. Only pending appeals can be resolved, so a
    /// terminal `expected` is refused before touching the database.
    pub async fn transition(
        &self,
        id: i32,
        expected: AppealStatus,
        new_status: AppealStatus,
        resolved_by: i64,
        reason: Option<String>,
    ) -> AppResult<AppealModel> {
        if !new_status.is_terminal() {
            return Err(AppError::Validation(
                "an appeal can only be resolved to approved or rejected".to_string(),
            ));
        }
        if expected.is_terminal() {
            return Err(AppError::Validation(format!(
                "a {} appeal cannot be resolved again",
                expected
            )));
        }

        let now = chrono::Utc::now().naive_utc();
        let result = Appeal::update_many()
            .set(appeal::ActiveModel {
                status: ActiveValue::Set(new_status),
                resolved_at: ActiveValue::Set(Some(now)),
                resolved_by: ActiveValue::Set(Some(resolved_by)),
                resolution_reason: ActiveValue::Set(reason),
                ..Default::default()
            })
            .filter(appeal::Column::Id.eq(id))
            .filter(appeal::Column::Status.eq(expected))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            let current = self.get(id).await?;
            return Err(AppError::AlreadyResolved(current.status));
        }

        tracing::info!(
            appeal_id = id,
            status = %new_status,
            resolved_by,
            "Appeal resolved"
        );
        self.get(id).await
    }

    /// Counts per status from a single grouped query, so the split is
    /// consistent even while appeals are being resolved.
    pub async fn stats(&self) -> AppResult<AppealStats> {
        let rows: Vec<(AppealStatus, i64)> = Appeal::find()
            .select_only()
            .column(appeal::Column::Status)
            .column_as(Expr::col(appeal::Column::Id).count(), "count")
            .group_by(appeal::Column::Status)
            .into_tuple()
            .all(&self.db)
            .await?;

        let mut stats = AppealStats::default();
        for (status, count) in rows {
            let count = u64::try_from(count).unwrap_or_default();
            match status {
                AppealStatus::Pending => stats.pending = count,
                AppealStatus::Approved => stats.approved = count,
                AppealStatus::Rejected => stats.rejected = count,
            }
            stats.total += count;
        }
        Ok(stats)
    }
}
