use crate::error::AppResult;
use crate::telegram::TelegramClient;
use async_trait::async_trait;
use std::collections::HashSet;

/// Answers whether a user may act as a moderator.
#[async_trait]
pub trait ModeratorCheck: Send + Sync {
    async fn is_moderator(&self, user_id: i64) -> AppResult<bool>;
}

/// A fixed set of moderator ids.
pub struct ModeratorList {
    ids: HashSet<i64>,
}

impl ModeratorList {
    pub fn new(ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }
}

#[async_trait]
impl ModeratorCheck for ModeratorList {
    async fn is_moderator(&self, user_id: i64) -> AppResult<bool> {
        Ok(self.ids.contains(&user_id))
    }
}

/// Anyone currently in the admin group is a moderator.
pub struct AdminGroupMembership {
    client: TelegramClient,
    admin_group_id: i64,
}

impl AdminGroupMembership {
    pub fn new(client: TelegramClient, admin_group_id: i64) -> Self {
        Self {
            client,
            admin_group_id,
        }
    }
}

#[async_trait]
impl ModeratorCheck for AdminGroupMembership {
    async fn is_moderator(&self, user_id: i64) -> AppResult<bool> {
        let member = self
            .client
            .get_chat_member(self.admin_group_id, user_id)
            .await?;
        Ok(matches!(
            member.status.as_str(),
            "creator" | "administrator" | "member"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn list_membership() {
        let moderators = ModeratorList::new([1, 2]);
        assert!(moderators.is_moderator(1).await.unwrap());
        assert!(!moderators.is_moderator(3).await.unwrap());
    }
}
