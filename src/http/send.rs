use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::http::error::ApiError;
use crate::notify::OrderContext;
use crate::order::{OrderItem, OrderStatus, PaymentMethod};

/// Body of the direct send endpoints: a message type plus loose data.
#[derive(Debug, Deserialize)]
pub struct SendRequest {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: Value,
}

/// Envelope of the direct send endpoints. A channel refusing or failing
/// a message is a soft failure: 200 with `success: false`.
#[derive(Debug, Serialize)]
pub struct SendReply {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SendReply {
    pub fn sent(message: impl Into<String>) -> Self {
        SendReply {
            success: true,
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        SendReply {
            success: false,
            message: None,
            error: Some(error.into()),
        }
    }
}

/// Order fields accepted by the send endpoints. Only the id is required;
/// everything else defaults to empty so operators can fire a quick
/// message without the full record.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOrderData {
    pub order_id: String,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub restaurant_id: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub total_cents: Option<u32>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub special_instructions: Option<String>,
    #[serde(default)]
    pub items: Option<Vec<OrderItem>>,
    #[serde(default)]
    pub status: Option<String>,
}

impl SendOrderData {
    pub fn context(&self) -> OrderContext {
        OrderContext {
            order_id: self.order_id.clone(),
            restaurant_id: self.restaurant_id.clone().unwrap_or_default(),
            customer_name: self.customer_name.clone().unwrap_or_default(),
            customer_phone: self.customer_phone.clone().unwrap_or_default(),
            address: self.address.clone().unwrap_or_default(),
            payment_method: self.payment_method.unwrap_or_default(),
            total_cents: self.total_cents.unwrap_or_default(),
            special_instructions: self.special_instructions.clone(),
        }
    }

    /// The status field, parsed. Required by the status-bearing message
    /// types.
    pub fn parsed_status(&self) -> Result<OrderStatus, ApiError> {
        let raw = self
            .status
            .as_deref()
            .ok_or_else(|| ApiError::missing("status"))?;
        OrderStatus::parse(raw)
            .ok_or_else(|| ApiError::Validation(format!("Geçersiz durum: {raw}")))
    }
}

/// Decode the loose `data` object into the type a message kind expects.
pub fn parse_data<T: serde::de::DeserializeOwned>(data: Value) -> Result<T, ApiError> {
    serde_json::from_value(data).map_err(|e| ApiError::Validation(format!("Geçersiz veri: {e}")))
}
