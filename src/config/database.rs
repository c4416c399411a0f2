use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::env;
use std::time::Duration;

/// `DATABASE_URL`, or a SQLite file at `DATABASE_PATH`.
pub fn database_url() -> String {
    env::var("DATABASE_URL").unwrap_or_else(|_| {
        let path = env::var("DATABASE_PATH").unwrap_or_else(|_| "/data/appeals.db".to_string());
        format!("sqlite://{}?mode=rwc", path)
    })
}

pub async fn get_database() -> Result<DatabaseConnection, DbErr> {
    let max_connections: u32 = env::var("DB_MAX_CONNECTIONS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(10);

    let min_connections: u32 = env::var("DB_MIN_CONNECTIONS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(1);

    let mut opt = ConnectOptions::new(database_url());
    opt.max_connections(max_connections)
        .min_connections(min_connections)
        .connect_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(300))
        .sqlx_logging(false);

    Database::connect(opt).await
}
