use super::BotContext;
use crate::error::AppResult;
use crate::models::{AppealModel, AppealStatus};
use crate::services::unban::UnbanOutcome;
use crate::utils::format::{format_datetime, format_user_mention, status_icon, status_label};
use sea_orm::Iterable;

pub async fn approve(ctx: &BotContext, appeal_id: i32, moderator_id: i64) -> AppResult<String> {
    let approval = ctx.appeals.approve(appeal_id, moderator_id).await?;
    let who = mention(&approval.appeal);

    let reply = match approval.unban {
        UnbanOutcome::Unbanned { via } => format!(
            "✅ Appeal #{} approved. {} has been unbanned (via {}).",
            appeal_id, who, via
        ),
        UnbanOutcome::Failed { detail } => format!(
            "⚠️ Appeal #{} approved, but unbanning {} failed: {}\nPlease unban the user manually.",
            appeal_id, who, detail
        ),
    };
    Ok(reply)
}

pub async fn reject(
    ctx: &BotContext,
    appeal_id: i32,
    moderator_id: i64,
    reason: &str,
) -> AppResult<String> {
    let appeal = ctx.appeals.reject(appeal_id, moderator_id, reason).await?;
    Ok(format!("❌ Appeal #{} rejected.", appeal.id))
}

pub async fn info(ctx: &BotContext, appeal_id: i32, moderator_id: i64) -> AppResult<String> {
    let appeal = ctx.appeals.info(appeal_id, moderator_id).await?;
    Ok(render_info(&appeal))
}

pub async fn pending(ctx: &BotContext, moderator_id: i64) -> AppResult<String> {
    let appeals = ctx.appeals.pending_list(moderator_id).await?;
    if appeals.is_empty() {
        return Ok("✅ No pending appeals.".to_string());
    }

    let mut reply = String::from("⏳ Pending appeals:\n\n");
    for appeal in &appeals {
        reply.push_str(&format!(
            "#{} - {} - {}\n",
            appeal.id,
            mention(appeal),
            format_datetime(&appeal.created_at)
        ));
    }
    Ok(reply.trim_end().to_string())
}

pub async fn stats(ctx: &BotContext, moderator_id: i64) -> AppResult<String> {
    let stats = ctx.appeals.stats(moderator_id).await?;

    let mut reply = format!("📊 Appeal statistics\n\nTotal: {}\n", stats.total);
    for status in AppealStatus::iter() {
        let count = stats.count(status);
        if count > 0 {
            reply.push_str(&format!(
                "{} {}: {}\n",
                status_icon(status),
                status_label(status),
                count
            ));
        }
    }
    Ok(reply.trim_end().to_string())
}

fn mention(appeal: &AppealModel) -> String {
    format_user_mention(appeal.display_name.as_deref(), appeal.username.as_deref())
}

pub fn render_info(appeal: &AppealModel) -> String {
    let mut info = format!(
        "📋 Appeal #{}\n\n👤 User: {}\n🆔 User ID: {}\n📅 Submitted: {} UTC\n📝 Appeal: {}\n🔄 Status: {}\n",
        appeal.id,
        mention(appeal),
        appeal.user_id,
        format_datetime(&appeal.created_at),
        appeal.message,
        status_label(appeal.status),
    );

    if appeal.status != AppealStatus::Pending {
        if let Some(resolved_by) = appeal.resolved_by {
            info.push_str(&format!("⚖️ Resolved by: {}\n", resolved_by));
        }
        if let Some(resolved_at) = &appeal.resolved_at {
            info.push_str(&format!("✅ Resolved: {} UTC\n", format_datetime(resolved_at)));
        }
    }
    if let Some(reason) = &appeal.resolution_reason {
        info.push_str(&format!("💬 Reason: {}\n", reason));
    }
    info.trim_end().to_string()
}
