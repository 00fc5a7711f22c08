use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use super::event::OrderEvent;

/// Failure of a single channel send. These never escalate past the
/// dispatcher; a failed channel is logged and recorded, nothing more.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("channel rejected the message: {0}")]
    Rejected(String),

    #[error("send timed out after {0:?}")]
    TimedOut(Duration),
}

/// One delivery target for order events. Implementations must be safe to
/// call concurrently and must not panic on send failure.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Stable channel name used in logs and the notification log.
    fn name(&self) -> &'static str;

    async fn send(&self, event: &OrderEvent) -> Result<(), ChannelError>;
}
