mod api;
mod callback;
mod handler;
mod processor;
mod update;

pub use api::{BotApi, HttpBotApi, InlineButton, InlineKeyboard};
pub use callback::{parse_callback_data, CallbackAction, CallbackParseError};
pub use handler::{ChannelCommandHandler, WebhookReply};
pub use processor::{BotCommandProcessor, MessageProcessor, ProcessedMessage};
pub use update::{
    classify, classify_raw, BotUser, CallbackQuery, Chat, IncomingMessage, Update, WebhookEvent,
};
