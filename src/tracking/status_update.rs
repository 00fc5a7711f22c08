use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use crate::order::OrderStatus;

/// Who performed a tracked operation. Anything outside the fixed set is
/// treated as an external bot identity and kept verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UpdateActor {
    System,
    Restaurant,
    Driver,
    Customer,
    Bot { user_id: String },
}

impl UpdateActor {
    pub fn parse(value: &str) -> UpdateActor {
        match value {
            "system" => UpdateActor::System,
            "restaurant" => UpdateActor::Restaurant,
            "driver" => UpdateActor::Driver,
            "customer" => UpdateActor::Customer,
            other => UpdateActor::Bot {
                user_id: other.to_string(),
            },
        }
    }
}

impl fmt::Display for UpdateActor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateActor::System => f.write_str("system"),
            UpdateActor::Restaurant => f.write_str("restaurant"),
            UpdateActor::Driver => f.write_str("driver"),
            UpdateActor::Customer => f.write_str("customer"),
            UpdateActor::Bot { user_id } => f.write_str(user_id),
        }
    }
}

// On the wire an actor is a plain string, the same shape clients send in
// `updatedBy`.
impl Serialize for UpdateActor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for UpdateActor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ActorVisitor;

        impl de::Visitor<'_> for ActorVisitor {
            type Value = UpdateActor;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an actor name string")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<UpdateActor, E> {
                Ok(UpdateActor::parse(value))
            }
        }

        deserializer.deserialize_str(ActorVisitor)
    }
}

/// One immutable record in the status history. The history is append-only
/// and ordered by `recorded_at`; the aggregate's current status is always
/// the status of the last entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub status: OrderStatus,
    pub actor: UpdateActor,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    pub recorded_at: DateTime<Utc>,
}
