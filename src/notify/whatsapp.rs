use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

use crate::order::{OrderItem, OrderStatus};

use super::channel::{ChannelError, NotificationChannel};
use super::event::{OrderContext, OrderEvent};
use super::message;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Messaging channel behind an HTTP gateway. The gateway takes
/// `{"to", "message"}` and relays to the messaging platform; an API key,
/// when configured, travels as a bearer token.
pub struct WhatsAppChannel {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    /// Operations number that receives new-order alerts.
    ops_number: String,
}

impl WhatsAppChannel {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        ops_number: impl Into<String>,
    ) -> Self {
        WhatsAppChannel {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key,
            ops_number: ops_number.into(),
        }
    }

    pub async fn send_text(&self, to: &str, body: &str) -> Result<(), ChannelError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .timeout(REQUEST_TIMEOUT)
            .json(&json!({ "to": to, "message": body }));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(ChannelError::Rejected(format!(
                "gateway returned {}",
                response.status()
            )));
        }
        Ok(())
    }

    pub fn new_order_message(context: &OrderContext, items: &[OrderItem]) -> String {
        message::order_summary(context, items)
    }

    pub fn status_update_message(context: &OrderContext, status: OrderStatus) -> String {
        message::status_message(context, status)
    }

    pub fn cancellation_message(context: &OrderContext) -> String {
        format!(
            "{}\nSipariş #{}\nÖdeme alınmadıysa işlem gerekmez.",
            message::status_line(OrderStatus::Cancelled),
            context.order_id
        )
    }

    pub fn emergency_message(text: &str) -> String {
        format!("🚨 ACİL: {text}")
    }

    pub fn ops_number(&self) -> &str {
        &self.ops_number
    }
}

#[async_trait]
impl NotificationChannel for WhatsAppChannel {
    fn name(&self) -> &'static str {
        "whatsapp"
    }

    async fn send(&self, event: &OrderEvent) -> Result<(), ChannelError> {
        match event {
            OrderEvent::NewOrder { context, items } => {
                let body = Self::new_order_message(context, items);
                self.send_text(&self.ops_number, &body).await
            }
            OrderEvent::StatusChanged { context, status } => {
                let body = if *status == OrderStatus::Cancelled {
                    Self::cancellation_message(context)
                } else {
                    Self::status_update_message(context, *status)
                };
                self.send_text(&context.customer_phone, &body).await
            }
        }
    }
}
