use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use super::channel::{ChannelError, NotificationChannel};
use super::event::OrderEvent;
use super::message;

/// Mail transport seam. The default implementation only logs; a real
/// SMTP or API transport plugs in behind it.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn deliver(&self, to: &str, subject: &str, html: &str) -> Result<(), ChannelError>;
}

/// Logs outbound mail instead of sending it.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn deliver(&self, to: &str, subject: &str, html: &str) -> Result<(), ChannelError> {
        info!(to, subject, bytes = html.len(), "mail logged, not sent");
        Ok(())
    }
}

/// Email channel for the back office. Renders a small HTML summary per
/// event.
pub struct EmailChannel {
    mailer: Arc<dyn Mailer>,
    recipient: String,
}

impl EmailChannel {
    pub fn new(mailer: Arc<dyn Mailer>, recipient: impl Into<String>) -> Self {
        EmailChannel {
            mailer,
            recipient: recipient.into(),
        }
    }

    fn subject(event: &OrderEvent) -> String {
        match event {
            OrderEvent::NewOrder { context, .. } => {
                format!("Yeni sipariş #{}", context.order_id)
            }
            OrderEvent::StatusChanged { context, status } => {
                format!("Sipariş #{} {}", context.order_id, status)
            }
        }
    }

    fn render(event: &OrderEvent) -> String {
        match event {
            OrderEvent::NewOrder { context, items } => {
                let rows: String = items
                    .iter()
                    .map(|item| {
                        format!(
                            "<tr><td>{}</td><td>x{}</td><td>{}</td></tr>",
                            item.name,
                            item.quantity,
                            message::format_lira(item.line_total_cents())
                        )
                    })
                    .collect();
                format!(
                    "<html><body><h3>Yeni sipariş #{}</h3>\
                     <p>{} / {}</p><p>{}</p>\
                     <table>{}</table>\
                     <p><b>Toplam: {}</b></p></body></html>",
                    context.order_id,
                    context.customer_name,
                    context.customer_phone,
                    context.address,
                    rows,
                    message::format_lira(context.total_cents)
                )
            }
            OrderEvent::StatusChanged { context, status } => format!(
                "<html><body><h3>Sipariş #{}</h3><p>{}</p></body></html>",
                context.order_id,
                message::status_line(*status)
            ),
        }
    }
}

#[async_trait]
impl NotificationChannel for EmailChannel {
    fn name(&self) -> &'static str {
        "email"
    }

    async fn send(&self, event: &OrderEvent) -> Result<(), ChannelError> {
        let subject = Self::subject(event);
        let html = Self::render(event);
        self.mailer.deliver(&self.recipient, &subject, &html).await
    }
}
