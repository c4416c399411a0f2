//! Plain-text rendering helpers shared by replies and notifications.

use crate::models::AppealStatus;
use chrono::NaiveDateTime;

pub fn format_user_mention(display_name: Option<&str>, username: Option<&str>) -> String {
    let name = display_name.filter(|n| !n.is_empty()).unwrap_or("Unknown");
    match username {
        Some(username) if !username.is_empty() => format!("{} (@{})", name, username),
        _ => name.to_string(),
    }
}

/// Truncates to at most `max_chars` characters, ending in "..." when cut.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}

pub fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%d %H:%M").to_string()
}

pub fn status_icon(status: AppealStatus) -> &'static str {
    match status {
        AppealStatus::Pending => "⏳",
        AppealStatus::Approved => "✅",
        AppealStatus::Rejected => "❌",
    }
}

pub fn status_label(status: AppealStatus) -> &'static str {
    match status {
        AppealStatus::Pending => "Pending",
        AppealStatus::Approved => "Approved",
        AppealStatus::Rejected => "Rejected",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mention_with_username() {
        assert_eq!(
            format_user_mention(Some("Lewis"), Some("lh44")),
            "Lewis (@lh44)"
        );
    }

    #[test]
    fn mention_without_name_falls_back() {
        assert_eq!(format_user_mention(None, None), "Unknown");
        assert_eq!(format_user_mention(Some(""), Some("max33")), "Unknown (@max33)");
    }

    #[test]
    fn truncate_short_text_unchanged() {
        assert_eq!(truncate_text("short", 100), "short");
    }

    #[test]
    fn truncate_long_text_adds_ellipsis() {
        let out = truncate_text(&"x".repeat(20), 10);
        assert_eq!(out, "xxxxxxx...");
        assert_eq!(out.chars().count(), 10);
    }

    #[test]
    fn truncate_respects_multibyte_chars() {
        let out = truncate_text("апелляцияапелляция", 8);
        assert_eq!(out, "апелл...");
    }

    #[test]
    fn datetime_is_minute_precision() {
        let dt = chrono::NaiveDate::from_ymd_opt(2024, 3, 2)
            .unwrap()
            .and_hms_opt(14, 5, 59)
            .unwrap();
        assert_eq!(format_datetime(&dt), "2024-03-02 14:05");
    }
}
