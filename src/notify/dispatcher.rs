use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::tracking::NotificationRecord;

use super::channel::{ChannelError, NotificationChannel};
use super::event::OrderEvent;

/// Upper bound on one channel send before it counts as failed.
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(8);

/// Outcome of one channel attempt within a fan-out.
#[derive(Debug)]
pub struct ChannelOutcome {
    pub channel: &'static str,
    pub result: Result<(), ChannelError>,
}

impl ChannelOutcome {
    pub fn ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// What happened to one event across all channels.
#[derive(Debug)]
pub struct DispatchReport {
    pub event: String,
    pub sent_at: DateTime<Utc>,
    pub outcomes: Vec<ChannelOutcome>,
}

impl DispatchReport {
    pub fn all_ok(&self) -> bool {
        self.outcomes.iter().all(ChannelOutcome::ok)
    }

    /// Rows for the tracking aggregate's notification log.
    pub fn records(&self) -> Vec<NotificationRecord> {
        self.outcomes
            .iter()
            .map(|outcome| NotificationRecord {
                channel: outcome.channel.to_string(),
                event: self.event.clone(),
                ok: outcome.ok(),
                detail: outcome.result.as_ref().err().map(|e| e.to_string()),
                sent_at: self.sent_at,
            })
            .collect()
    }
}

/// Fans one order event out to every registered channel. Channels are
/// isolated: a failed or slow send is recorded and the loop moves on, so
/// the caller always gets a full report and never an error.
pub struct NotificationDispatcher {
    channels: Vec<Arc<dyn NotificationChannel>>,
    send_timeout: Duration,
}

impl NotificationDispatcher {
    pub fn new(channels: Vec<Arc<dyn NotificationChannel>>) -> Self {
        NotificationDispatcher {
            channels,
            send_timeout: DEFAULT_SEND_TIMEOUT,
        }
    }

    pub fn with_send_timeout(mut self, send_timeout: Duration) -> Self {
        self.send_timeout = send_timeout;
        self
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub async fn dispatch(&self, event: &OrderEvent) -> DispatchReport {
        let label = event.label();
        let order_id = &event.context().order_id;
        let mut outcomes = Vec::with_capacity(self.channels.len());

        for channel in &self.channels {
            let result = match timeout(self.send_timeout, channel.send(event)).await {
                Ok(result) => result,
                Err(_) => Err(ChannelError::TimedOut(self.send_timeout)),
            };
            match &result {
                Ok(()) => {
                    debug!(channel = channel.name(), %order_id, event = %label, "notification sent");
                }
                Err(error) => {
                    warn!(channel = channel.name(), %order_id, event = %label, %error, "notification failed");
                }
            }
            outcomes.push(ChannelOutcome {
                channel: channel.name(),
                result,
            });
        }

        DispatchReport {
            event: label,
            sent_at: Utc::now(),
            outcomes,
        }
    }
}
