use axum::extract::{Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::convert::Infallible;
use tokio_stream::{Stream, StreamExt};

use crate::http::error::ApiError;
use crate::http::send::parse_data;
use crate::http::state::AppState;
use crate::machine::{RejectReason, TransitionOutcome};
use crate::order::OrderStatus;
use crate::tracking::{
    CustomerInteraction, DeliveryDriver, DeliveryStatus, ElapsedTimes, InteractionKind,
    LocationPoint, MilestoneTimes, NotificationRecord, OrderTracking, StatusUpdate, UpdateActor,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackQuery {
    #[serde(default)]
    pub order_id: Option<String>,
}

/// Wire shape of the tracking view.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingResponse {
    pub order_id: String,
    pub status: OrderStatus,
    pub delivery_status: DeliveryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver: Option<DeliveryDriver>,
    pub timestamps: Timestamps,
    pub estimated_times: MilestoneTimes,
    /// Elapsed seconds between the milestones actually visited.
    pub actual_times: ElapsedTimes,
    pub location_history: Vec<LocationPoint>,
    pub status_updates: Vec<StatusUpdate>,
    pub customer_interactions: Vec<CustomerInteraction>,
    pub notifications: Vec<NotificationRecord>,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timestamps {
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prepared_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picked_up_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<DateTime<Utc>>,
}

impl From<OrderTracking> for TrackingResponse {
    fn from(tracking: OrderTracking) -> Self {
        let actual_times = tracking.elapsed_times();
        TrackingResponse {
            timestamps: Timestamps {
                created_at: tracking.created_at,
                confirmed_at: tracking.actual.confirmed,
                prepared_at: tracking.actual.prepared,
                picked_up_at: tracking.actual.picked_up,
                delivered_at: tracking.actual.delivered,
            },
            order_id: tracking.order_id,
            status: tracking.status,
            delivery_status: tracking.delivery_status,
            driver: tracking.driver,
            estimated_times: tracking.estimated,
            actual_times,
            location_history: tracking.locations,
            status_updates: tracking.status_updates,
            customer_interactions: tracking.interactions,
            notifications: tracking.notifications,
            last_updated: tracking.updated_at,
        }
    }
}

fn required_order_id(raw: Option<String>) -> Result<String, ApiError> {
    raw.filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::missing("orderId"))
}

/// GET /orders/track?orderId=…
pub async fn query_tracking(
    State(state): State<AppState>,
    Query(query): Query<TrackQuery>,
) -> Result<Json<TrackingResponse>, ApiError> {
    let order_id = required_order_id(query.order_id)?;
    match state.machine.tracking(&order_id).await? {
        Some(tracking) => Ok(Json(tracking.into())),
        None => Err(ApiError::order_not_found()),
    }
}

/// GET /orders/track/stream?orderId=...: the tracking view as SSE. The
/// first event is the current snapshot; each store write pushes another.
pub async fn stream_tracking(
    State(state): State<AppState>,
    Query(query): Query<TrackQuery>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let order_id = required_order_id(query.order_id)?;
    let Some(subscription) = state.view.watch(&order_id).await? else {
        return Err(ApiError::order_not_found());
    };
    let stream = subscription
        .into_stream()
        .filter_map(|tracking| serde_json::to_string(&TrackingResponse::from(tracking)).ok())
        .map(|payload| Ok::<Event, Infallible>(Event::default().data(payload)));
    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackCommand {
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandReply {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateStatusData {
    status: String,
    #[serde(default)]
    updated_by: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    metadata: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssignDriverData {
    driver: DeliveryDriver,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateLocationData {
    lat: f64,
    lng: f64,
    status: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddInteractionData {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    notes: Option<String>,
}

fn parse_status(raw: &str) -> Result<OrderStatus, ApiError> {
    OrderStatus::parse(raw).ok_or_else(|| ApiError::Validation(format!("Geçersiz durum: {raw}")))
}

/// POST /orders/track: the mutation surface. `action` picks the
/// operation, `data` carries its arguments.
pub async fn command_tracking(
    State(state): State<AppState>,
    Json(command): Json<TrackCommand>,
) -> Result<Json<CommandReply>, ApiError> {
    let order_id = required_order_id(command.order_id)?;
    let action = command
        .action
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::missing("action"))?;
    let data = command.data.unwrap_or(Value::Null);

    let outcome = match action.as_str() {
        "update_status" => {
            let input: UpdateStatusData = parse_data(data)?;
            let status = parse_status(&input.status)?;
            let actor = input
                .updated_by
                .as_deref()
                .map(UpdateActor::parse)
                .unwrap_or(UpdateActor::System);
            state
                .machine
                .transition(&order_id, status, actor, input.description, input.metadata)
                .await?
        }
        "assign_driver" => {
            let input: AssignDriverData = parse_data(data)?;
            state.machine.assign_driver(&order_id, input.driver).await?
        }
        "update_location" => {
            let input: UpdateLocationData = parse_data(data)?;
            let status = parse_status(&input.status)?;
            state
                .machine
                .update_location(&order_id, input.lat, input.lng, status, input.description)
                .await?
        }
        "add_interaction" => {
            let input: AddInteractionData = parse_data(data)?;
            let kind = InteractionKind::parse(&input.kind).ok_or_else(|| {
                ApiError::Validation(format!("Geçersiz etkileşim türü: {}", input.kind))
            })?;
            state
                .machine
                .add_customer_interaction(&order_id, kind, input.notes)
                .await?
        }
        other => {
            return Err(ApiError::Validation(format!("Bilinmeyen işlem: {other}")));
        }
    };

    match outcome {
        TransitionOutcome::Applied(change) => {
            state
                .machine
                .run_notification(&state.dispatcher, &change)
                .await;
            Ok(Json(CommandReply {
                success: true,
                error: None,
            }))
        }
        TransitionOutcome::Rejected(RejectReason::UnknownOrder) => Err(ApiError::order_not_found()),
        TransitionOutcome::Rejected(reason) => Ok(Json(CommandReply {
            success: false,
            error: Some(reason.message_tr()),
        })),
    }
}
