//! Order tracking and notification server.

use std::process::ExitCode;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use siparis::config::AppConfig;
use siparis::http::{self, AppState};
use siparis::machine::OrderStatusMachine;
use siparis::notify::{
    EmailChannel, LogMailer, NotificationChannel, NotificationDispatcher, TelegramChannel,
    WhatsAppChannel,
};
use siparis::realtime::TrackingView;
use siparis::store::{MemoryOrderStore, MemoryTrackingStore};
use siparis::telegram::{BotCommandProcessor, ChannelCommandHandler, HttpBotApi};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let config = match AppConfig::from_env() {
        Ok(config) => Arc::new(config),
        Err(config_error) => {
            tracing::error!(%config_error, "configuration rejected");
            return ExitCode::FAILURE;
        }
    };

    let orders = Arc::new(MemoryOrderStore::new());
    let view = Arc::new(TrackingView::new(Arc::new(MemoryTrackingStore::new())));
    let machine = Arc::new(OrderStatusMachine::new(orders, view.clone()));

    let bot_api = Arc::new(HttpBotApi::new(&config.telegram_bot_token));
    let mut channels: Vec<Arc<dyn NotificationChannel>> = Vec::new();

    let telegram = config.telegram_enabled().then(|| {
        Arc::new(TelegramChannel::new(
            bot_api.clone(),
            config.telegram_ops_chat.clone(),
        ))
    });
    if let Some(channel) = &telegram {
        channels.push(channel.clone());
    }

    let whatsapp = config.whatsapp_enabled().then(|| {
        Arc::new(WhatsAppChannel::new(
            config.whatsapp_gateway_url.clone(),
            config.whatsapp_api_key.clone(),
            config.whatsapp_ops_number.clone(),
        ))
    });
    if let Some(channel) = &whatsapp {
        channels.push(channel.clone());
    }

    if !config.email_recipient.is_empty() {
        channels.push(Arc::new(EmailChannel::new(
            Arc::new(LogMailer),
            config.email_recipient.clone(),
        )));
    }

    info!(
        telegram = telegram.is_some(),
        whatsapp = whatsapp.is_some(),
        email = !config.email_recipient.is_empty(),
        "notification channels configured"
    );

    let dispatcher = Arc::new(
        NotificationDispatcher::new(channels).with_send_timeout(config.channel_send_timeout),
    );

    let processor = Arc::new(BotCommandProcessor::new(machine.clone()));
    let webhook = Arc::new(ChannelCommandHandler::new(
        machine.clone(),
        dispatcher.clone(),
        bot_api,
        processor,
    ));

    let state = AppState {
        machine,
        dispatcher,
        view,
        webhook,
        telegram,
        whatsapp,
        config: config.clone(),
    };

    if let Err(serve_error) = http::serve(state, &config.bind_addr).await {
        tracing::error!(%serve_error, "server stopped");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("SIPARIS_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
