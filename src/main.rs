use appeals_bot::config::{self, bot::BotConfig, telegram::TelegramConfig, unban::UnbanConfig};
use appeals_bot::handlers::BotContext;
use appeals_bot::migration::Migrator;
use appeals_bot::services::moderators::{AdminGroupMembership, ModeratorCheck, ModeratorList};
use appeals_bot::services::notification::Notifier;
use appeals_bot::services::unban::UnbanService;
use appeals_bot::telegram::{delivery, poller::UpdatePoller, TelegramClient};
use appeals_bot::{routes, AppealService, AppealStore};
use axum::extract::Extension;
use sea_orm_migration::MigratorTrait;
use std::env;
use std::sync::Arc;
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    // Validate configuration before doing anything else
    let (bot_config, telegram_config, unban_config) = validate_config()?;

    tracing::info!("Starting Appeals Bot v{}...", env!("CARGO_PKG_VERSION"));

    let db = config::database::get_database().await?;
    tracing::info!("Database connected successfully");

    Migrator::up(&db, None).await?;
    tracing::info!("Database migrations applied successfully");

    let telegram = TelegramClient::new(&telegram_config)?;

    let unban = UnbanService::from_config(&unban_config, telegram.clone(), bot_config.main_group_id);
    tracing::info!("Unban strategies: {}", unban.strategy_names().join(" -> "));

    let moderators: Arc<dyn ModeratorCheck> = match &bot_config.moderator_ids {
        Some(ids) => {
            tracing::info!("Using {} configured moderator ids", ids.len());
            Arc::new(ModeratorList::new(ids.iter().copied()))
        }
        None => {
            tracing::info!("Moderators are members of admin group {}", bot_config.admin_group_id);
            Arc::new(AdminGroupMembership::new(
                telegram.clone(),
                bot_config.admin_group_id,
            ))
        }
    };

    let (notifier, notifications) = Notifier::channel();
    let appeals = AppealService::new(
        AppealStore::new(db.clone()),
        Arc::new(unban),
        moderators,
        notifier,
    );

    let delivery_task = tokio::spawn(delivery::run_delivery(
        notifications,
        telegram.clone(),
        bot_config.admin_group_id,
    ));

    let ctx = Arc::new(BotContext {
        appeals,
        telegram,
        config: bot_config,
    });

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let poller_task = tokio::spawn(UpdatePoller::new(ctx.clone()).run(shutdown_rx.clone()));

    let app = routes::create_routes().layer(Extension(db));

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let addr = format!("{}:{}", host, port);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Health check listening on http://{}/health", addr);

    let mut server_shutdown = shutdown_rx;
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        let _ = server_shutdown.changed().await;
    });
    let server_task = tokio::spawn(async move { server.await });

    shutdown_signal().await;
    let _ = shutdown_tx.send(true);

    poller_task.await?;
    server_task.await??;

    // Dropping the last Notifier (held by the context) lets delivery drain and stop.
    drop(ctx);
    delivery_task.await?;

    tracing::info!("Appeals Bot shut down gracefully");
    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "appeals_bot=info,tower_http=info".into());

    let json = env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Validate all required configuration at startup (fail-fast).
fn validate_config() -> anyhow::Result<(BotConfig, TelegramConfig, UnbanConfig)> {
    let bot_config = BotConfig::from_env()?;
    let telegram_config = TelegramConfig::from_env()?;
    let unban_config = UnbanConfig::from_env();

    if bot_config.main_group_id == bot_config.admin_group_id {
        return Err(anyhow::anyhow!(
            "MAIN_GROUP_ID and ADMIN_GROUP_ID must be different chats"
        ));
    }

    Ok((bot_config, telegram_config, unban_config))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received, gracefully shutting down...");
}
