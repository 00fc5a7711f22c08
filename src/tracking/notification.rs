use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-channel outcome of one notification attempt, kept on the tracking
/// aggregate so the full send history is queryable alongside the order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRecord {
    /// Channel name, e.g. "telegram".
    pub channel: String,
    /// Event label, e.g. "new_order" or "status:confirmed".
    pub event: String,
    pub ok: bool,
    /// Failure detail when `ok` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub sent_at: DateTime<Utc>,
}
