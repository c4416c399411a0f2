//! Chat command handlers.
//!
//! Each handler turns a parsed [`Command`] into a call on [`AppealService`]
//! and returns the reply text for the chat the command came from.

pub mod moderator;
pub mod user;

use crate::config::bot::BotConfig;
use crate::error::AppError;
use crate::services::appeal::AppealService;
use crate::telegram::command::{parse_command, Command, CommandError, APPEAL_USAGE};
use crate::telegram::{Message, TelegramClient};

pub struct BotContext {
    pub appeals: AppealService,
    pub telegram: TelegramClient,
    pub config: BotConfig,
}

/// Handles one incoming message. `None` means the bot stays silent.
///
/// Edited messages are only honoured for `/appeal`, including its usage
/// reply when the text is missing. Moderator commands are ignored outside the
/// admin group.
pub async fn handle_message(ctx: &BotContext, message: &Message, edited: bool) -> Option<String> {
    let text = message.text.as_deref()?;
    let from = message.from.as_ref()?;
    let in_admin_group = message.chat.id == ctx.config.admin_group_id;

    let command = match parse_command(text)? {
        Ok(command) => command,
        Err(e) => {
            let appeal_usage = e == CommandError::Usage(APPEAL_USAGE);
            if (edited && !appeal_usage) || (e.is_moderator_command() && !in_admin_group) {
                return None;
            }
            return Some(format!("❌ {}", e));
        }
    };

    if edited && !matches!(command, Command::Appeal { .. }) {
        return None;
    }
    if command.is_moderator_command() && !in_admin_group {
        return None;
    }

    tracing::debug!(user_id = from.id, chat_id = message.chat.id, ?command, "Handling command");

    let reply = match command {
        Command::Start | Command::Help => Ok(user::help_text().to_string()),
        Command::Appeal { text } => {
            if !message.chat.is_private() {
                return Some(user::PRIVATE_ONLY.to_string());
            }
            user::submit(ctx, from, &text).await
        }
        Command::Status => user::status(ctx, from.id).await,
        Command::Approve { appeal_id } => moderator::approve(ctx, appeal_id, from.id).await,
        Command::Reject { appeal_id, reason } => {
            moderator::reject(ctx, appeal_id, from.id, &reason).await
        }
        Command::Info { appeal_id } => moderator::info(ctx, appeal_id, from.id).await,
        Command::Pending => moderator::pending(ctx, from.id).await,
        Command::Stats => moderator::stats(ctx, from.id).await,
    };

    Some(reply.unwrap_or_else(|e| {
        if e.is_expected() {
            tracing::debug!(user_id = from.id, "Command refused: {}", e);
        }
        describe_error(&e)
    }))
}

/// Reply text for a failed command.
pub fn describe_error(err: &AppError) -> String {
    match err {
        AppError::Validation(msg) => format!("❌ {}", msg),
        AppError::DuplicatePending => {
            "⏳ You already have a pending appeal. Please wait for a moderator to review it."
                .to_string()
        }
        AppError::NotFound => "❌ Appeal not found.".to_string(),
        AppError::AlreadyResolved(status) => format!("ℹ️ This appeal is already {}.", status),
        AppError::Unauthorized => "⛔ Only moderators can do this.".to_string(),
        AppError::Database(_) | AppError::Telegram(_) | AppError::Internal(_) => {
            tracing::error!("Command failed: {:?}", err);
            "❌ Something went wrong. Please try again later.".to_string()
        }
    }
}
