use std::sync::Arc;
use tracing::{error, warn};

use crate::machine::{OrderStatusMachine, TransitionOutcome};
use crate::notify::{message, NotificationDispatcher};
use crate::tracking::UpdateActor;

use super::api::BotApi;
use super::callback::{parse_callback_data, CallbackAction, CallbackParseError};
use super::processor::MessageProcessor;
use super::update::{CallbackQuery, WebhookEvent};

/// What the webhook hands back to the platform. `ok` goes false only for
/// internal failures; invalid input and refused transitions are handled
/// outcomes with their explanation in `response`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WebhookReply {
    pub ok: bool,
    pub response: Option<String>,
}

/// Turns classified webhook events into state machine calls and replies.
/// Every button press gets its callback answered, whatever happened, so
/// the pressing client never hangs on a spinner.
pub struct ChannelCommandHandler {
    machine: Arc<OrderStatusMachine>,
    dispatcher: Arc<NotificationDispatcher>,
    api: Arc<dyn BotApi>,
    processor: Arc<dyn MessageProcessor>,
}

impl ChannelCommandHandler {
    pub fn new(
        machine: Arc<OrderStatusMachine>,
        dispatcher: Arc<NotificationDispatcher>,
        api: Arc<dyn BotApi>,
        processor: Arc<dyn MessageProcessor>,
    ) -> Self {
        ChannelCommandHandler {
            machine,
            dispatcher,
            api,
            processor,
        }
    }

    pub async fn handle(&self, event: WebhookEvent) -> WebhookReply {
        match event {
            WebhookEvent::InlineCallback(query) => self.handle_callback(query).await,
            WebhookEvent::PlainMessage {
                chat_id,
                sender,
                text,
            } => self.handle_message(chat_id, sender.as_ref(), &text).await,
            WebhookEvent::Unrecognized => WebhookReply {
                ok: true,
                response: None,
            },
        }
    }

    async fn handle_message(
        &self,
        chat_id: i64,
        sender: Option<&super::update::BotUser>,
        text: &str,
    ) -> WebhookReply {
        let processed = self.processor.process(chat_id, sender, text).await;
        if let Some(response) = &processed.response {
            let chat = chat_id.to_string();
            if let Err(error) = self.api.send_message(&chat, response, None).await {
                warn!(chat_id, %error, "chat reply failed");
            }
        }
        WebhookReply {
            ok: processed.success,
            response: processed.response,
        }
    }

    async fn handle_callback(&self, query: CallbackQuery) -> WebhookReply {
        let data = query.data.as_deref().unwrap_or_default();
        let (action, order_id) = match parse_callback_data(data) {
            Ok(parsed) => parsed,
            Err(parse_error) => {
                warn!(callback = data, %parse_error, "invalid callback data");
                let text = match parse_error {
                    CallbackParseError::UnknownAction(_) => "Bilinmeyen işlem",
                    _ => "Geçersiz buton verisi",
                };
                self.ack(&query.id, text).await;
                return WebhookReply {
                    ok: true,
                    response: Some(text.to_string()),
                };
            }
        };

        let Some(target) = action.target_status() else {
            let text = if action == CallbackAction::Call {
                "📞 Müşteri telefonu sipariş mesajında"
            } else {
                "Bu adım zaten tamamlandı ✓"
            };
            self.ack(&query.id, text).await;
            return WebhookReply {
                ok: true,
                response: Some(text.to_string()),
            };
        };

        let actor = UpdateActor::Bot {
            user_id: format!("telegram:{}", query.from.id),
        };
        match self
            .machine
            .transition(order_id, target, actor, None, None)
            .await
        {
            Ok(TransitionOutcome::Applied(change)) => {
                self.machine
                    .run_notification(&self.dispatcher, &change)
                    .await;
                let text = message::status_line(target);
                self.ack(&query.id, text).await;
                WebhookReply {
                    ok: true,
                    response: Some(text.to_string()),
                }
            }
            Ok(TransitionOutcome::Rejected(reason)) => {
                let text = reason.message_tr();
                self.ack(&query.id, &text).await;
                WebhookReply {
                    ok: true,
                    response: Some(text),
                }
            }
            Err(store_error) => {
                error!(order_id, %store_error, "callback transition failed");
                self.ack(&query.id, "⚠️ İşlem başarısız oldu").await;
                WebhookReply {
                    ok: false,
                    response: None,
                }
            }
        }
    }

    async fn ack(&self, callback_id: &str, text: &str) {
        if let Err(ack_error) = self.api.answer_callback(callback_id, text).await {
            warn!(callback_id, %ack_error, "callback ack failed");
        }
    }
}
