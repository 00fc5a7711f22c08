use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing::info;

use super::state::AppState;
use super::{orders, telegram, tracking, whatsapp};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/orders", post(orders::place_order))
        .route(
            "/orders/track",
            get(tracking::query_tracking).post(tracking::command_tracking),
        )
        .route("/orders/track/stream", get(tracking::stream_tracking))
        .route("/orders/:order_id", get(orders::get_order))
        .route(
            "/telegram/webhook",
            get(telegram::webhook_status).post(telegram::webhook),
        )
        .route("/telegram/send", post(telegram::send))
        .route("/whatsapp/send", post(whatsapp::send))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

/// Bind and serve until ctrl-c.
pub async fn serve(state: AppState, addr: &str) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(signal_error) = tokio::signal::ctrl_c().await {
        tracing::error!(%signal_error, "shutdown signal listener failed");
    }
    info!("shutting down");
}
