use super::{parse_env_or, required_env};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub token: String,
    pub api_url: String,
    pub api_timeout: Duration,
    pub poll_timeout: Duration,
}

impl TelegramConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let token: String = required_env("APPEALS_BOT_TOKEN")?;
        if token.is_empty() {
            return Err(anyhow::anyhow!("APPEALS_BOT_TOKEN must not be empty"));
        }

        let api_url = env::var("TELEGRAM_API_URL")
            .unwrap_or_else(|_| "https://api.telegram.org".to_string());

        Ok(Self {
            token,
            api_url,
            api_timeout: Duration::from_secs(parse_env_or("API_TIMEOUT", 30)),
            poll_timeout: Duration::from_secs(parse_env_or("POLL_TIMEOUT", 30)),
        })
    }
}
