use super::{parse_bool_env, required_env};
use std::collections::HashSet;
use std::env;

/// Chats the bot works with and who may moderate.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// The community group users are banned from.
    pub main_group_id: i64,
    /// The group where moderators receive notifications and issue commands.
    pub admin_group_id: i64,
    /// Explicit moderator ids. When `None`, admin group membership decides.
    pub moderator_ids: Option<HashSet<i64>>,
    /// Refuse appeals from users who are not banned in the main group.
    pub require_ban_check: bool,
}

impl BotConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let main_group_id = required_env("MAIN_GROUP_ID")?;
        let admin_group_id = required_env("ADMIN_GROUP_ID")?;

        let moderator_ids = match env::var("MODERATOR_IDS") {
            Ok(raw) if !raw.trim().is_empty() => Some(
                parse_moderator_ids(&raw)
                    .map_err(|e| anyhow::anyhow!("Invalid MODERATOR_IDS '{}': {}", raw, e))?,
            ),
            _ => None,
        };

        Ok(Self {
            main_group_id,
            admin_group_id,
            moderator_ids,
            require_ban_check: parse_bool_env("REQUIRE_BAN_CHECK", true),
        })
    }
}

fn parse_moderator_ids(raw: &str) -> Result<HashSet<i64>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<i64>()
                .map_err(|_| format!("'{}' is not a user id", part))
        })
        .collect()
}
