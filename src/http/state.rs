use std::sync::Arc;

use crate::config::AppConfig;
use crate::machine::OrderStatusMachine;
use crate::notify::{NotificationDispatcher, TelegramChannel, WhatsAppChannel};
use crate::realtime::TrackingView;
use crate::telegram::ChannelCommandHandler;

/// Everything the handlers share. Clones are cheap; all fields are
/// reference counted. A channel left unconfigured is `None` and its send
/// endpoint reports a soft failure.
#[derive(Clone)]
pub struct AppState {
    pub machine: Arc<OrderStatusMachine>,
    pub dispatcher: Arc<NotificationDispatcher>,
    pub view: Arc<TrackingView>,
    pub webhook: Arc<ChannelCommandHandler>,
    pub telegram: Option<Arc<TelegramChannel>>,
    pub whatsapp: Option<Arc<WhatsAppChannel>>,
    pub config: Arc<AppConfig>,
}
