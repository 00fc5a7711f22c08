use serde::Deserialize;

/// Typed subset of the bot platform's update object. Everything the
/// handler does not use stays undeclared and is ignored on decode.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Update {
    #[serde(default)]
    pub update_id: Option<i64>,
    #[serde(default)]
    pub message: Option<IncomingMessage>,
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct IncomingMessage {
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub from: Option<BotUser>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct BotUser {
    pub id: i64,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: BotUser,
    #[serde(default)]
    pub data: Option<String>,
}

/// Closed set of inbound webhook shapes. Everything that is neither a
/// button press nor a text message lands in `Unrecognized` and is
/// acknowledged without action.
#[derive(Clone, Debug)]
pub enum WebhookEvent {
    InlineCallback(CallbackQuery),
    PlainMessage {
        chat_id: i64,
        sender: Option<BotUser>,
        text: String,
    },
    Unrecognized,
}

/// Sort a decoded update into its handling class. A callback query wins
/// over an embedded message.
pub fn classify(update: Update) -> WebhookEvent {
    if let Some(query) = update.callback_query {
        return WebhookEvent::InlineCallback(query);
    }
    if let Some(message) = update.message {
        if let Some(text) = message.text {
            return WebhookEvent::PlainMessage {
                chat_id: message.chat.id,
                sender: message.from,
                text,
            };
        }
    }
    WebhookEvent::Unrecognized
}

/// Decode a raw webhook body. Malformed JSON and unknown shapes are both
/// `Unrecognized`; the webhook never rejects a body.
pub fn classify_raw(body: &[u8]) -> WebhookEvent {
    match serde_json::from_slice::<Update>(body) {
        Ok(update) => classify(update),
        Err(_) => WebhookEvent::Unrecognized,
    }
}
