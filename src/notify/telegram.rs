use async_trait::async_trait;
use std::sync::Arc;

use crate::order::OrderStatus;
use crate::telegram::{BotApi, InlineButton, InlineKeyboard};

use super::channel::{ChannelError, NotificationChannel};
use super::event::OrderEvent;
use super::message;

/// Chat channel for the restaurant's operations group: short text plus
/// inline buttons whose payload is `"<action>:<orderId>"`.
pub struct TelegramChannel {
    api: Arc<dyn BotApi>,
    chat_id: String,
}

impl TelegramChannel {
    pub fn new(api: Arc<dyn BotApi>, chat_id: impl Into<String>) -> Self {
        TelegramChannel {
            api,
            chat_id: chat_id.into(),
        }
    }

    fn new_order_keyboard(order_id: &str) -> InlineKeyboard {
        vec![
            vec![
                InlineButton::new("✅ Onayla", format!("approve:{order_id}")),
                InlineButton::new("❌ Reddet", format!("reject:{order_id}")),
            ],
            vec![InlineButton::new("📞 Müşteriyi ara", format!("call:{order_id}"))],
        ]
    }

    fn status_keyboard(order_id: &str, status: OrderStatus) -> Option<InlineKeyboard> {
        let mut rows: InlineKeyboard = Vec::new();
        if let Some((action, label)) = message::next_action(status) {
            rows.push(vec![InlineButton::new(label, format!("{action}:{order_id}"))]);
        }
        if !status.is_terminal() {
            rows.push(vec![
                InlineButton::new("📞 Müşteriyi ara", format!("call:{order_id}")),
                InlineButton::new("ℹ️ Durum", format!("status_info:{order_id}")),
            ]);
        }
        if rows.is_empty() {
            None
        } else {
            Some(rows)
        }
    }
}

#[async_trait]
impl NotificationChannel for TelegramChannel {
    fn name(&self) -> &'static str {
        "telegram"
    }

    async fn send(&self, event: &OrderEvent) -> Result<(), ChannelError> {
        match event {
            OrderEvent::NewOrder { context, items } => {
                let text = message::order_summary(context, items);
                let keyboard = Self::new_order_keyboard(&context.order_id);
                self.api
                    .send_message(&self.chat_id, &text, Some(keyboard))
                    .await
            }
            OrderEvent::StatusChanged { context, status } => {
                let text = message::status_message(context, *status);
                let keyboard = Self::status_keyboard(&context.order_id, *status);
                self.api.send_message(&self.chat_id, &text, keyboard).await
            }
        }
    }
}
