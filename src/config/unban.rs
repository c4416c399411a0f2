use super::{parse_bool_env, parse_env_or};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct UnbanConfig {
    /// Try the tg-spam API before the Bot API.
    pub use_tg_spam_api: bool,
    pub tg_spam_url: String,
    pub tg_spam_password: Option<String>,
    /// Upper bound for each unban attempt before moving on to the next one.
    pub attempt_timeout: Duration,
}

impl UnbanConfig {
    pub fn from_env() -> Self {
        let host = env::var("TG_SPAM_HOST").unwrap_or_else(|_| "tg-spam".to_string());
        let port: u16 = parse_env_or("TG_SPAM_PORT", 8080);
        let tg_spam_url =
            env::var("TG_SPAM_URL").unwrap_or_else(|_| format!("http://{}:{}", host, port));

        Self {
            use_tg_spam_api: parse_bool_env("USE_TG_SPAM_API", true),
            tg_spam_url,
            tg_spam_password: env::var("TG_SPAM_PASSWORD")
                .ok()
                .filter(|s| !s.is_empty()),
            attempt_timeout: Duration::from_secs(parse_env_or("API_TIMEOUT", 30)),
        }
    }
}
