use crate::config::unban::UnbanConfig;
use crate::telegram::{TelegramClient, TelegramError};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UnbanError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Telegram(#[from] TelegramError),

    #[error("request rejected: {0}")]
    Rejected(String),
}

/// One way of lifting a ban.
#[async_trait]
pub trait UnbanStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn unban(&self, user_id: i64) -> Result<(), UnbanError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnbanOutcome {
    Unbanned { via: &'static str },
    Failed { detail: String },
}

impl UnbanOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, UnbanOutcome::Unbanned { .. })
    }
}

/// Walks the configured strategies in order until one succeeds.
///
/// There are no retries beyond the single pass; each attempt is bounded by
/// `attempt_timeout`.
pub struct UnbanService {
    strategies: Vec<Box<dyn UnbanStrategy>>,
    attempt_timeout: Duration,
}

impl UnbanService {
    pub fn new(attempt_timeout: Duration) -> Self {
        Self {
            strategies: Vec::new(),
            attempt_timeout,
        }
    }

    pub fn with_strategy(mut self, strategy: impl UnbanStrategy + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// tg-spam first (when enabled), then the Bot API.
    pub fn from_config(config: &UnbanConfig, telegram: TelegramClient, main_group_id: i64) -> Self {
        let mut service = Self::new(config.attempt_timeout);
        if config.use_tg_spam_api {
            service = service.with_strategy(TgSpamUnban::new(
                config.tg_spam_url.clone(),
                config.tg_spam_password.clone(),
            ));
        }
        service.with_strategy(TelegramUnban::new(telegram, main_group_id))
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub async fn unban(&self, user_id: i64) -> UnbanOutcome {
        let mut last_error = "no unban strategy configured".to_string();

        for strategy in &self.strategies {
            match tokio::time::timeout(self.attempt_timeout, strategy.unban(user_id)).await {
                Ok(Ok(())) => {
                    tracing::info!(user_id, via = strategy.name(), "User unbanned");
                    return UnbanOutcome::Unbanned {
                        via: strategy.name(),
                    };
                }
                Ok(Err(e)) => {
                    tracing::warn!(user_id, via = strategy.name(), "Unban attempt failed: {}", e);
                    last_error = format!("{}: {}", strategy.name(), e);
                }
                Err(_) => {
                    tracing::warn!(
                        user_id,
                        via = strategy.name(),
                        "Unban attempt timed out after {:?}",
                        self.attempt_timeout
                    );
                    last_error = format!(
                        "{}: timed out after {}s",
                        strategy.name(),
                        self.attempt_timeout.as_secs()
                    );
                }
            }
        }

        tracing::error!(user_id, "All unban attempts failed: {}", last_error);
        UnbanOutcome::Failed { detail: last_error }
    }
}

/// The tg-spam moderation service's `/unban` endpoint.
pub struct TgSpamUnban {
    http: reqwest::Client,
    base_url: String,
    password: Option<String>,
}

impl TgSpamUnban {
    pub fn new(base_url: String, password: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            password,
        }
    }
}

#[async_trait]
impl UnbanStrategy for TgSpamUnban {
    fn name(&self) -> &'static str {
        "tg-spam"
    }

    async fn unban(&self, user_id: i64) -> Result<(), UnbanError> {
        let mut request = self
            .http
            .post(format!("{}/unban", self.base_url))
            .json(&serde_json::json!({ "user_id": user_id }));
        if let Some(password) = &self.password {
            request = request.basic_auth("tg-spam", Some(password));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UnbanError::Rejected(format!("HTTP {}: {}", status, body.trim())));
        }
        Ok(())
    }
}

/// Telegram's `unbanChatMember` on the main group.
pub struct TelegramUnban {
    client: TelegramClient,
    chat_id: i64,
}

impl TelegramUnban {
    pub fn new(client: TelegramClient, chat_id: i64) -> Self {
        Self { client, chat_id }
    }
}

#[async_trait]
impl UnbanStrategy for TelegramUnban {
    fn name(&self) -> &'static str {
        "telegram"
    }

    async fn unban(&self, user_id: i64) -> Result<(), UnbanError> {
        let unbanned = self
            .client
            .unban_chat_member(self.chat_id, user_id, true)
            .await?;
        if !unbanned {
            return Err(UnbanError::Rejected(
                "unbanChatMember returned false".to_string(),
            ));
        }
        Ok(())
    }
}
