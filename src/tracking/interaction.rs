use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the customer did on the tracking screen. Recording one never
/// changes the order status; a `CancelRequest` is a note for the
/// restaurant, not a cancellation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    CallDriver,
    CallRestaurant,
    CancelRequest,
    ModifyRequest,
}

impl InteractionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionKind::CallDriver => "call_driver",
            InteractionKind::CallRestaurant => "call_restaurant",
            InteractionKind::CancelRequest => "cancel_request",
            InteractionKind::ModifyRequest => "modify_request",
        }
    }

    pub fn parse(value: &str) -> Option<InteractionKind> {
        match value {
            "call_driver" => Some(InteractionKind::CallDriver),
            "call_restaurant" => Some(InteractionKind::CallRestaurant),
            "cancel_request" => Some(InteractionKind::CancelRequest),
            "modify_request" => Some(InteractionKind::ModifyRequest),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInteraction {
    #[serde(rename = "type")]
    pub kind: InteractionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub recorded_at: DateTime<Utc>,
}
