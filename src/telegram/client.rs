use super::types::{
    ApiEnvelope, ChatMember, GetChatMember, GetUpdates, Message, SendMessage, UnbanChatMember,
    Update,
};
use crate::config::telegram::TelegramConfig;
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TelegramError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Bot API error {code}: {description}")]
    Api { code: i32, description: String },

    #[error("Bot API returned ok without a result for {0}")]
    MissingResult(&'static str),
}

/// Thin JSON client for the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    base_url: String,
    poll_timeout: Duration,
}

impl TelegramClient {
    pub fn new(config: &TelegramConfig) -> Result<Self, TelegramError> {
        let http = reqwest::Client::builder()
            .timeout(config.api_timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: format!("{}/bot{}", config.api_url.trim_end_matches('/'), config.token),
            poll_timeout: config.poll_timeout,
        })
    }

    async fn call<P, R>(&self, method: &'static str, params: &P) -> Result<R, TelegramError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.call_with_timeout(method, params, None).await
    }

    async fn call_with_timeout<P, R>(
        &self,
        method: &'static str,
        params: &P,
        timeout: Option<Duration>,
    ) -> Result<R, TelegramError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let mut request = self
            .http
            .post(format!("{}/{}", self.base_url, method))
            .json(params);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        // Bot API errors come back as non-2xx with an `ok: false` body.
        let envelope: ApiEnvelope<R> = request.send().await?.json().await?;
        if !envelope.ok {
            return Err(TelegramError::Api {
                code: envelope.error_code.unwrap_or_default(),
                description: envelope.description.unwrap_or_default(),
            });
        }
        envelope.result.ok_or(TelegramError::MissingResult(method))
    }

    /// Long-polls for new messages and edits, starting at `offset`.
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, TelegramError> {
        let params = GetUpdates {
            offset,
            timeout: self.poll_timeout.as_secs(),
            allowed_updates: &["message", "edited_message"],
        };
        // Leave room for the server to hold the request open.
        let timeout = self.poll_timeout + Duration::from_secs(10);
        self.call_with_timeout("getUpdates", &params, Some(timeout))
            .await
    }

    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<Message, TelegramError> {
        self.call(
            "sendMessage",
            &SendMessage {
                chat_id,
                text,
                reply_to_message_id: None,
            },
        )
        .await
    }

    pub async fn reply(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
    ) -> Result<Message, TelegramError> {
        self.call(
            "sendMessage",
            &SendMessage {
                chat_id,
                text,
                reply_to_message_id: Some(message_id),
            },
        )
        .await
    }

    /// Lifts a ban. With `only_if_banned` the call is a no-op for members.
    pub async fn unban_chat_member(
        &self,
        chat_id: i64,
        user_id: i64,
        only_if_banned: bool,
    ) -> Result<bool, TelegramError> {
        self.call(
            "unbanChatMember",
            &UnbanChatMember {
                chat_id,
                user_id,
                only_if_banned,
            },
        )
        .await
    }

    pub async fn get_chat_member(
        &self,
        chat_id: i64,
        user_id: i64,
    ) -> Result<ChatMember, TelegramError> {
        self.call("getChatMember", &GetChatMember { chat_id, user_id })
            .await
    }
}
