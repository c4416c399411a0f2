use super::{describe_error, BotContext};
use crate::error::{AppError, AppResult};
use crate::services::appeal::AppealService;
use crate::telegram::User;
use crate::utils::format::{format_datetime, status_icon, status_label};

/// How many past appeals `/status` lists.
const STATUS_HISTORY: u64 = 5;

pub const PRIVATE_ONLY: &str = "ℹ️ Please send appeals to the bot in a private chat.";

pub fn help_text() -> &'static str {
    "🤖 Appeals bot\n\n\
     If you were banned from the group and believe it was a mistake, you can appeal here.\n\n\
     Commands:\n\
     • /appeal <text> - file an appeal\n\
     • /status - check your appeals\n\
     • /help - show this message\n\n\
     Example:\n\
     /appeal I was discussing race strategy, not insulting anyone.\n\n\
     Moderators usually review appeals within 24 hours."
}

pub async fn submit(ctx: &BotContext, from: &User, text: &str) -> AppResult<String> {
    let submission = AppealService::prepare_submission(
        from.id,
        from.username.as_deref(),
        Some(from.first_name.as_str()),
        text,
    )?;

    if ctx.config.require_ban_check {
        match ctx
            .telegram
            .get_chat_member(ctx.config.main_group_id, from.id)
            .await
        {
            Ok(member) if !member.is_banned() => {
                return Ok(
                    "ℹ️ You are not banned in the group. Only banned users can file appeals."
                        .to_string(),
                );
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!(user_id = from.id, "Failed to check ban status: {}", e);
                return Ok(
                    "❌ Could not check your status in the group. Please try again later."
                        .to_string(),
                );
            }
        }
    }

    let result = ctx.appeals.submit_prepared(submission).await;

    match result {
        Ok(appeal) => Ok(format!(
            "✅ Appeal submitted!\nAppeal ID: #{}\n\nModerators will review it within 24 hours.",
            appeal.id
        )),
        Err(AppError::DuplicatePending) => {
            let reply = match ctx.appeals.status_for_user(from.id).await? {
                Some(existing) if existing.is_pending() => format!(
                    "⏳ You already have a pending appeal (#{}). Please wait for a moderator to review it.",
                    existing.id
                ),
                _ => describe_error(&AppError::DuplicatePending),
            };
            Ok(reply)
        }
        Err(e) => Err(e),
    }
}

pub async fn status(ctx: &BotContext, user_id: i64) -> AppResult<String> {
    let appeals = ctx.appeals.history_for_user(user_id, STATUS_HISTORY).await?;
    if appeals.is_empty() {
        return Ok("You have no appeals on record.".to_string());
    }

    let mut reply = String::from("📋 Your appeals:\n\n");
    for appeal in &appeals {
        reply.push_str(&format!(
            "{} #{} - {}\n📅 {}\n",
            status_icon(appeal.status),
            appeal.id,
            status_label(appeal.status),
            format_datetime(&appeal.created_at)
        ));
        if let Some(reason) = &appeal.resolution_reason {
            reply.push_str(&format!("💬 {}\n", reason));
        }
        reply.push('\n');
    }
    Ok(reply.trim_end().to_string())
}
