use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

use crate::notify::ChannelError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// One button of an inline keyboard. Field names follow the bot API wire
/// format.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineButton {
    pub text: String,
    pub callback_data: String,
}

impl InlineButton {
    pub fn new(text: impl Into<String>, callback_data: impl Into<String>) -> Self {
        InlineButton {
            text: text.into(),
            callback_data: callback_data.into(),
        }
    }
}

/// Rows of buttons attached to a message.
pub type InlineKeyboard = Vec<Vec<InlineButton>>;

/// Outbound surface of the bot platform. The HTTP implementation talks to
/// the real API; tests substitute a recording fake.
#[async_trait]
pub trait BotApi: Send + Sync {
    async fn send_message(
        &self,
        chat_id: &str,
        text: &str,
        keyboard: Option<InlineKeyboard>,
    ) -> Result<(), ChannelError>;

    /// Acknowledge an inline button press. Required after every callback,
    /// successful or not, or the client keeps its spinner.
    async fn answer_callback(&self, callback_id: &str, text: &str) -> Result<(), ChannelError>;
}

#[derive(Debug, Deserialize)]
struct ApiReply {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Bot API client over HTTPS.
pub struct HttpBotApi {
    client: reqwest::Client,
    base: String,
}

impl HttpBotApi {
    pub fn new(token: &str) -> Self {
        Self::with_root("https://api.telegram.org", token)
    }

    /// Point at a different API root, e.g. a local bot API server.
    pub fn with_root(root: &str, token: &str) -> Self {
        HttpBotApi {
            client: reqwest::Client::new(),
            base: format!("{}/bot{}", root.trim_end_matches('/'), token),
        }
    }

    async fn call(&self, method: &str, payload: Value) -> Result<(), ChannelError> {
        let response = self
            .client
            .post(format!("{}/{}", self.base, method))
            .timeout(REQUEST_TIMEOUT)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let reply: ApiReply = match response.json().await {
            Ok(reply) => reply,
            Err(_) if !status.is_success() => {
                return Err(ChannelError::Rejected(format!("{method} returned {status}")));
            }
            Err(error) => return Err(ChannelError::Http(error)),
        };
        if !reply.ok {
            return Err(ChannelError::Rejected(
                reply
                    .description
                    .unwrap_or_else(|| format!("{method} returned {status}")),
            ));
        }
        Ok(())
    }
}

fn send_message_payload(chat_id: &str, text: &str, keyboard: Option<&InlineKeyboard>) -> Value {
    let mut payload = json!({
        "chat_id": chat_id,
        "text": text,
    });
    if let Some(keyboard) = keyboard {
        payload["reply_markup"] = json!({ "inline_keyboard": keyboard });
    }
    payload
}

#[async_trait]
impl BotApi for HttpBotApi {
    async fn send_message(
        &self,
        chat_id: &str,
        text: &str,
        keyboard: Option<InlineKeyboard>,
    ) -> Result<(), ChannelError> {
        self.call(
            "sendMessage",
            send_message_payload(chat_id, text, keyboard.as_ref()),
        )
        .await
    }

    async fn answer_callback(&self, callback_id: &str, text: &str) -> Result<(), ChannelError> {
        self.call(
            "answerCallbackQuery",
            json!({
                "callback_query_id": callback_id,
                "text": text,
            }),
        )
        .await
    }
}
