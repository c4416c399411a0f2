pub mod config;
pub mod error;
pub mod handlers;
pub mod migration;
pub mod models;
pub mod routes;
pub mod services;
pub mod telegram;
pub mod utils;

pub use error::{AppError, AppResult};
pub use services::appeal::{AppealService, Approval};
pub use services::appeal_store::{AppealStats, AppealStore};
