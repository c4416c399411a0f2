use super::{Message, Update};
use crate::handlers::{self, BotContext};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

const ERROR_BACKOFF: Duration = Duration::from_secs(5);

/// Long-polls `getUpdates` and handles each message in its own task.
pub struct UpdatePoller {
    ctx: Arc<BotContext>,
}

impl UpdatePoller {
    pub fn new(ctx: Arc<BotContext>) -> Self {
        Self { ctx }
    }

    /// Runs until `shutdown` flips to `true`.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut offset = 0;
        tracing::info!("Polling Telegram for updates");

        loop {
            let updates = tokio::select! {
                _ = shutdown.changed() => break,
                result = self.ctx.telegram.get_updates(offset) => result,
            };

            match updates {
                Ok(updates) => {
                    for update in updates {
                        offset = offset.max(update.update_id + 1);
                        self.dispatch(update);
                    }
                }
                Err(e) => {
                    tracing::warn!("getUpdates failed: {}", e);
                    tokio::select! {
                        _ = shutdown.changed() => break,
                        _ = tokio::time::sleep(ERROR_BACKOFF) => {}
                    }
                }
            }
        }

        tracing::info!("Update polling stopped");
    }

    fn dispatch(&self, update: Update) {
        let (message, edited) = match (update.message, update.edited_message) {
            (Some(message), _) => (message, false),
            (None, Some(message)) => (message, true),
            (None, None) => return,
        };

        let ctx = self.ctx.clone();
        tokio::spawn(async move {
            handle_and_reply(&ctx, &message, edited).await;
        });
    }
}

async fn handle_and_reply(ctx: &BotContext, message: &Message, edited: bool) {
    let Some(reply) = handlers::handle_message(ctx, message, edited).await else {
        return;
    };
    if let Err(e) = ctx
        .telegram
        .reply(message.chat.id, message.message_id, &reply)
        .await
    {
        tracing::error!(chat_id = message.chat.id, "Failed to send reply: {}", e);
    }
}

