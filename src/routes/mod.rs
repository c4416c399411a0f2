use axum::{extract::Extension, response::IntoResponse, routing, Json, Router};
use sea_orm::DatabaseConnection;
use serde_json::json;
use tower_http::trace::TraceLayer;

/// Routes served next to the bot. Expects a `DatabaseConnection` extension.
pub fn create_routes() -> Router {
    Router::new()
        .route("/health", routing::get(health_check))
        .layer(TraceLayer::new_for_http())
}

async fn health_check(Extension(db): Extension<DatabaseConnection>) -> impl IntoResponse {
    let db_ok = db.ping().await.is_ok();
    let status = if db_ok { "ok" } else { "degraded" };

    Json(json!({
        "status": status,
        "service": "Appeals Bot",
        "version": env!("CARGO_PKG_VERSION"),
        "database": db_ok,
    }))
}
