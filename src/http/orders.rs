use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};
use tracing::error;
use uuid::Uuid;

use crate::http::error::ApiError;
use crate::http::state::AppState;
use crate::notify::{message, OrderContext, OrderEvent};
use crate::order::{Order, OrderDraft, OrderStatus};
use crate::tracking::{MilestoneTimes, OrderTracking};

/// POST /orders. Places the order, opens its tracking with a `Pending`
/// entry and alerts every channel with approve/reject buttons.
pub async fn place_order(
    State(state): State<AppState>,
    Json(draft): Json<OrderDraft>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    if draft.items.is_empty() {
        return Err(ApiError::Validation("Sepet boş olamaz".into()));
    }
    if draft.customer.name.trim().is_empty() || draft.customer.phone.trim().is_empty() {
        return Err(ApiError::Validation("Müşteri adı ve telefonu gerekli".into()));
    }

    let now = Utc::now();
    let estimated = estimate(&state, now);
    let mut order = Order::place(Uuid::new_v4().to_string(), draft, now);
    order.estimated_delivery_at = estimated.delivered;
    let tracking = OrderTracking::start(
        &order,
        estimated,
        message::status_line(OrderStatus::Pending).to_string(),
        now,
    );

    let event = OrderEvent::NewOrder {
        context: OrderContext::from_order(&order),
        items: order.items.clone(),
    };
    let order_id = order.id.clone();
    state.machine.register(order, tracking).await?;

    let report = state.dispatcher.dispatch(&event).await;
    if let Err(log_error) = state
        .machine
        .record_notifications(&order_id, report.records())
        .await
    {
        error!(%order_id, %log_error, "notification log write failed");
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "orderId": order_id })),
    ))
}

/// GET /orders/:order_id.
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    match state.machine.order(&order_id).await? {
        Some(order) => Ok(Json(order)),
        None => Err(ApiError::order_not_found()),
    }
}

/// Milestone estimates offered at placement, from the configured kitchen
/// and delivery windows.
fn estimate(state: &AppState, now: DateTime<Utc>) -> MilestoneTimes {
    let prep = state.config.prep_minutes;
    let delivery = state.config.delivery_minutes;
    MilestoneTimes {
        confirmed: Some(now + Duration::minutes(5)),
        prepared: Some(now + Duration::minutes(prep)),
        picked_up: Some(now + Duration::minutes(prep + 5)),
        delivered: Some(now + Duration::minutes(delivery)),
    }
}
