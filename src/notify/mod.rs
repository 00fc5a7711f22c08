mod channel;
mod dispatcher;
mod email;
mod event;
pub mod message;
mod telegram;
mod whatsapp;

pub use channel::{ChannelError, NotificationChannel};
pub use dispatcher::{ChannelOutcome, DispatchReport, NotificationDispatcher, DEFAULT_SEND_TIMEOUT};
pub use email::{EmailChannel, LogMailer, Mailer};
pub use event::{OrderContext, OrderEvent};
pub use telegram::TelegramChannel;
pub use whatsapp::WhatsAppChannel;
