#![allow(dead_code)]

use appeals_bot::config::bot::BotConfig;
use appeals_bot::config::telegram::TelegramConfig;
use appeals_bot::migration::Migrator;
use appeals_bot::services::moderators::ModeratorList;
use appeals_bot::services::notification::{NotificationIntent, Notifier};
use appeals_bot::services::unban::{UnbanError, UnbanService, UnbanStrategy};
use appeals_bot::telegram::TelegramClient;
use appeals_bot::{AppealService, AppealStore};
use async_trait::async_trait;
use axum::Router;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

pub const MODERATOR: i64 = 1000;
pub const OTHER_MODERATOR: i64 = 1001;
pub const NOT_MODERATOR: i64 = 2000;

pub const MAIN_GROUP: i64 = -100_111;
pub const ADMIN_GROUP: i64 = -100_222;

pub const BOT_TOKEN: &str = "TEST";

pub const APPEAL_TEXT: &str = "I was discussing strategy";

/// Fresh in-memory database with migrations applied.
///
/// A single connection keeps every query on the same in-memory database.
pub async fn test_db() -> DatabaseConnection {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(opt)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

/// Unban strategy with a fixed answer that counts its calls.
pub struct ScriptedUnban {
    succeed: bool,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl UnbanStrategy for ScriptedUnban {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn unban(&self, _user_id: i64) -> Result<(), UnbanError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.succeed {
            Ok(())
        } else {
            Err(UnbanError::Rejected("moderation service unavailable".to_string()))
        }
    }
}

pub struct TestApp {
    pub db: DatabaseConnection,
    pub appeals: AppealService,
    pub notifications: UnboundedReceiver<NotificationIntent>,
    pub unban_calls: Arc<AtomicUsize>,
}

impl TestApp {
    pub fn store(&self) -> &AppealStore {
        self.appeals.store()
    }

    pub fn unban_count(&self) -> usize {
        self.unban_calls.load(Ordering::SeqCst)
    }

    /// Everything emitted so far.
    pub fn drain_notifications(&mut self) -> Vec<NotificationIntent> {
        let mut intents = Vec::new();
        while let Ok(intent) = self.notifications.try_recv() {
            intents.push(intent);
        }
        intents
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with_unban(true).await
}

pub async fn spawn_app_with_unban(unban_succeeds: bool) -> TestApp {
    let db = test_db().await;
    let unban_calls = Arc::new(AtomicUsize::new(0));
    let unban = UnbanService::new(Duration::from_secs(5)).with_strategy(ScriptedUnban {
        succeed: unban_succeeds,
        calls: unban_calls.clone(),
    });

    let (notifier, notifications) = Notifier::channel();
    let appeals = AppealService::new(
        AppealStore::new(db.clone()),
        Arc::new(unban),
        Arc::new(ModeratorList::new([MODERATOR, OTHER_MODERATOR])),
        notifier,
    );

    TestApp {
        db,
        appeals,
        notifications,
        unban_calls,
    }
}

/// Serves `router` on a random local port and returns its base URL.
pub async fn spawn_stub(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{}", addr)
}

pub fn telegram_client(api_url: &str) -> TelegramClient {
    TelegramClient::new(&TelegramConfig {
        token: BOT_TOKEN.to_string(),
        api_url: api_url.to_string(),
        api_timeout: Duration::from_secs(5),
        poll_timeout: Duration::from_secs(1),
    })
    .expect("Failed to build Telegram client")
}

pub fn bot_config(require_ban_check: bool) -> BotConfig {
    BotConfig {
        main_group_id: MAIN_GROUP,
        admin_group_id: ADMIN_GROUP,
        moderator_ids: Some([MODERATOR, OTHER_MODERATOR].into_iter().collect()),
        require_ban_check,
    }
}

/// Requests received by a stub server, as `(method, json body)`.
pub type Calls = Arc<std::sync::Mutex<Vec<(String, serde_json::Value)>>>;

#[derive(Clone)]
struct TelegramStub {
    member_status: &'static str,
    unban_ok: bool,
    updates: Arc<Vec<serde_json::Value>>,
    calls: Calls,
}

/// A Bot API stand-in for token [`BOT_TOKEN`].
///
/// `getChatMember` answers with `member_status`; `unbanChatMember` fails with
/// a 400 unless `unban_ok`.
pub async fn spawn_telegram_stub(member_status: &'static str, unban_ok: bool) -> (String, Calls) {
    spawn_telegram_api(member_status, unban_ok, Vec::new()).await
}

/// Like [`spawn_telegram_stub`], with `getUpdates` serving every update whose
/// `update_id` is at least the requested offset.
pub async fn spawn_telegram_stub_with_updates(
    updates: Vec<serde_json::Value>,
) -> (String, Calls) {
    spawn_telegram_api("kicked", true, updates).await
}

async fn spawn_telegram_api(
    member_status: &'static str,
    unban_ok: bool,
    updates: Vec<serde_json::Value>,
) -> (String, Calls) {
    use axum::{extract::Path, extract::State, http::StatusCode, routing::post, Json};
    use serde_json::{json, Value};

    async fn api(
        State(stub): State<TelegramStub>,
        Path(method): Path<String>,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        stub.calls
            .lock()
            .unwrap()
            .push((method.clone(), body.clone()));

        match method.as_str() {
            "sendMessage" => (
                StatusCode::OK,
                Json(json!({
                    "ok": true,
                    "result": {
                        "message_id": 1,
                        "chat": {"id": body["chat_id"], "type": "private"},
                        "text": body["text"],
                    }
                })),
            ),
            "getUpdates" => {
                let offset = body["offset"].as_i64().unwrap_or_default();
                let pending: Vec<Value> = stub
                    .updates
                    .iter()
                    .filter(|u| u["update_id"].as_i64().unwrap_or_default() >= offset)
                    .cloned()
                    .collect();
                if pending.is_empty() {
                    // Stand-in for the long poll.
                    tokio::time::sleep(Duration::from_millis(50)).await;
                }
                (StatusCode::OK, Json(json!({"ok": true, "result": pending})))
            }
            "getChatMember" => (
                StatusCode::OK,
                Json(json!({"ok": true, "result": {"status": stub.member_status}})),
            ),
            "unbanChatMember" if stub.unban_ok => {
                (StatusCode::OK, Json(json!({"ok": true, "result": true})))
            }
            "unbanChatMember" => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "ok": false,
                    "error_code": 400,
                    "description": "Bad Request: not enough rights to restrict/unrestrict chat member",
                })),
            ),
            _ => (
                StatusCode::NOT_FOUND,
                Json(json!({"ok": false, "error_code": 404, "description": "Not Found"})),
            ),
        }
    }

    let calls: Calls = Arc::default();
    let router = Router::new()
        .route(&format!("/bot{}/{{method}}", BOT_TOKEN), post(api))
        .with_state(TelegramStub {
            member_status,
            unban_ok,
            updates: Arc::new(updates),
            calls: calls.clone(),
        });

    (spawn_stub(router).await, calls)
}

/// A tg-spam stand-in whose `/unban` answers with `status`.
pub async fn spawn_tg_spam_stub(status: u16) -> (String, Calls) {
    use axum::{extract::State, http::HeaderMap, http::StatusCode, routing::post, Json};
    use serde_json::{json, Value};

    async fn unban(
        State((status, calls)): State<(u16, Calls)>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> StatusCode {
        let authorized = headers.contains_key("authorization");
        calls
            .lock()
            .unwrap()
            .push(("unban".to_string(), json!({"body": body, "authorized": authorized})));
        StatusCode::from_u16(status).unwrap()
    }

    let calls: Calls = Arc::default();
    let router = Router::new()
        .route("/unban", post(unban))
        .with_state((status, calls.clone()));

    (spawn_stub(router).await, calls)
}

pub fn methods(calls: &Calls) -> Vec<String> {
    calls
        .lock()
        .unwrap()
        .iter()
        .map(|(method, _)| method.clone())
        .collect()
}
