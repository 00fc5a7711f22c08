use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

use crate::machine::OrderStatusMachine;
use crate::notify::message;

use super::update::BotUser;

/// Result of handling a plain text message: whether handling worked and
/// an optional reply for the chat.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessedMessage {
    pub success: bool,
    pub response: Option<String>,
}

impl ProcessedMessage {
    pub fn silent() -> Self {
        ProcessedMessage {
            success: true,
            response: None,
        }
    }

    pub fn reply(text: impl Into<String>) -> Self {
        ProcessedMessage {
            success: true,
            response: Some(text.into()),
        }
    }

    pub fn failed() -> Self {
        ProcessedMessage {
            success: false,
            response: Some("⚠️ İşlem şu anda gerçekleştirilemiyor".into()),
        }
    }
}

/// Pluggable handler for messages that are not button presses.
#[async_trait]
pub trait MessageProcessor: Send + Sync {
    async fn process(
        &self,
        chat_id: i64,
        sender: Option<&BotUser>,
        text: &str,
    ) -> ProcessedMessage;
}

const WELCOME: &str = "👋 Merhaba! Sipariş takip botuna hoş geldiniz.\n\
                       Komutlar için /help yazın.";

const HELP: &str = "Komutlar:\n\
                    /durum <sipariş no> - sipariş durumunu gösterir\n\
                    /help - bu mesaj";

/// Built-in commands: `/start`, `/help` and `/durum <orderId>`. Anything
/// else is ignored without a reply.
pub struct BotCommandProcessor {
    machine: Arc<OrderStatusMachine>,
}

impl BotCommandProcessor {
    pub fn new(machine: Arc<OrderStatusMachine>) -> Self {
        BotCommandProcessor { machine }
    }

    async fn status_reply(&self, order_id: &str) -> ProcessedMessage {
        match self.machine.tracking(order_id).await {
            Ok(Some(tracking)) => ProcessedMessage::reply(format!(
                "{}\nSipariş #{}\nSon güncelleme: {}",
                message::status_line(tracking.status),
                order_id,
                tracking.updated_at.format("%d.%m.%Y %H:%M")
            )),
            Ok(None) => ProcessedMessage::reply(format!("Sipariş bulunamadı: {order_id}")),
            Err(error) => {
                warn!(%order_id, %error, "status command failed");
                ProcessedMessage::failed()
            }
        }
    }
}

#[async_trait]
impl MessageProcessor for BotCommandProcessor {
    async fn process(
        &self,
        _chat_id: i64,
        _sender: Option<&BotUser>,
        text: &str,
    ) -> ProcessedMessage {
        let text = text.trim();
        if text == "/start" {
            return ProcessedMessage::reply(WELCOME);
        }
        if text == "/help" {
            return ProcessedMessage::reply(HELP);
        }
        if text == "/durum" {
            return ProcessedMessage::reply("Kullanım: /durum <sipariş no>");
        }
        if let Some(rest) = text.strip_prefix("/durum ") {
            let order_id = rest.trim();
            if order_id.is_empty() {
                return ProcessedMessage::reply("Kullanım: /durum <sipariş no>");
            }
            return self.status_reply(order_id).await;
        }
        ProcessedMessage::silent()
    }
}
