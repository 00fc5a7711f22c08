use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};
use tracing::warn;

use crate::http::error::ApiError;
use crate::http::send::{parse_data, SendOrderData, SendReply, SendRequest};
use crate::http::state::AppState;
use crate::notify::{NotificationChannel, OrderEvent};
use crate::telegram::classify_raw;

/// GET /telegram/webhook: readiness probe for the platform setup.
pub async fn webhook_status() -> Json<Value> {
    Json(json!({
        "ok": true,
        "service": "siparis-telegram-webhook",
        "time": Utc::now(),
    }))
}

/// POST /telegram/webhook. Always answers 200 whatever the body held;
/// a non-200 would only make the platform redeliver the same update.
pub async fn webhook(State(state): State<AppState>, body: Bytes) -> Json<Value> {
    let event = classify_raw(&body);
    let reply = state.webhook.handle(event).await;
    Json(json!({ "ok": reply.ok }))
}

/// POST /telegram/send: direct send, outside the fan-out.
pub async fn send(
    State(state): State<AppState>,
    Json(request): Json<SendRequest>,
) -> Result<Json<SendReply>, ApiError> {
    let Some(channel) = &state.telegram else {
        return Ok(Json(SendReply::failed("Telegram kanalı yapılandırılmamış")));
    };

    let event = match request.kind.as_str() {
        "new_order" => {
            let data: SendOrderData = parse_data(request.data)?;
            let items = data.items.clone().unwrap_or_default();
            OrderEvent::NewOrder {
                context: data.context(),
                items,
            }
        }
        "status_update" => {
            let data: SendOrderData = parse_data(request.data)?;
            let status = data.parsed_status()?;
            OrderEvent::StatusChanged {
                context: data.context(),
                status,
            }
        }
        other => {
            return Err(ApiError::Validation(format!("Bilinmeyen mesaj türü: {other}")));
        }
    };

    match channel.send(&event).await {
        Ok(()) => Ok(Json(SendReply::sent("Mesaj gönderildi"))),
        Err(send_error) => {
            warn!(%send_error, "direct telegram send failed");
            Ok(Json(SendReply::failed(send_error.to_string())))
        }
    }
}
