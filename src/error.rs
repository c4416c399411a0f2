use crate::models::AppealStatus;
use crate::telegram::TelegramError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("User already has a pending appeal")]
    DuplicatePending,

    #[error("Not found")]
    NotFound,

    #[error("Appeal is already {0}")]
    AlreadyResolved(AppealStatus),

    #[error("Moderator permission required")]
    Unauthorized,

    #[error("Telegram error: {0}")]
    Telegram(#[from] TelegramError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Expected outcomes of a command, as opposed to faults of the system.
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_)
                | AppError::DuplicatePending
                | AppError::NotFound
                | AppError::AlreadyResolved(_)
                | AppError::Unauthorized
        )
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lost_race_is_an_expected_outcome() {
        assert!(AppError::AlreadyResolved(AppealStatus::Approved).is_expected());
        assert!(AppError::DuplicatePending.is_expected());
    }

    #[test]
    fn storage_failure_is_not_expected() {
        let err = AppError::Database(sea_orm::DbErr::Custom("gone".to_string()));
        assert!(!err.is_expected());
    }

    #[test]
    fn already_resolved_message_names_status() {
        let err = AppError::AlreadyResolved(AppealStatus::Rejected);
        assert_eq!(err.to_string(), "Appeal is already rejected");
    }
}
