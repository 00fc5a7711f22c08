use std::collections::HashMap;
use tokio::sync::{watch, Mutex};
use tokio_stream::wrappers::WatchStream;

use crate::store::{StoreError, TrackingStore};
use crate::tracking::OrderTracking;

/// Per-order broadcast registry for the live tracking view. Watchers get
/// the current aggregate the moment they subscribe and a fresh snapshot
/// after every store write. A slow watcher observes the latest state;
/// intermediate snapshots may be skipped.
pub struct TrackingFeed {
    senders: Mutex<HashMap<String, watch::Sender<OrderTracking>>>,
}

impl TrackingFeed {
    pub fn new() -> Self {
        TrackingFeed {
            senders: Mutex::new(HashMap::new()),
        }
    }

    /// Push a snapshot to whoever watches this order. Channels nobody
    /// watches anymore are dropped here; a later subscriber re-seeds from
    /// the store.
    pub async fn publish(&self, tracking: &OrderTracking) {
        let mut senders = self.senders.lock().await;
        if let Some(sender) = senders.get(&tracking.order_id) {
            if sender.receiver_count() == 0 {
                senders.remove(&tracking.order_id);
                return;
            }
            let _ = sender.send(tracking.clone());
        }
    }

    /// Subscribe to one order, seeding from `store` when no channel
    /// exists yet. Runs under the registry lock, so a concurrent write is
    /// either already in the seed or arrives on the channel, never lost
    /// in between. `Ok(None)` when the order has no tracking.
    pub async fn watch(
        &self,
        store: &dyn TrackingStore,
        order_id: &str,
    ) -> Result<Option<TrackingSubscription>, StoreError> {
        let mut senders = self.senders.lock().await;
        if let Some(sender) = senders.get(order_id) {
            return Ok(Some(TrackingSubscription {
                rx: sender.subscribe(),
                first: true,
            }));
        }
        let Some(current) = store.fetch(order_id).await? else {
            return Ok(None);
        };
        let (tx, rx) = watch::channel(current);
        senders.insert(order_id.to_string(), tx);
        Ok(Some(TrackingSubscription { rx, first: true }))
    }

    #[cfg(test)]
    pub(crate) async fn watcher_count(&self, order_id: &str) -> usize {
        self.senders
            .lock()
            .await
            .get(order_id)
            .map(|s| s.receiver_count())
            .unwrap_or(0)
    }
}

impl Default for TrackingFeed {
    fn default() -> Self {
        Self::new()
    }
}

/// One watcher's handle. Dropping it unsubscribes.
pub struct TrackingSubscription {
    rx: watch::Receiver<OrderTracking>,
    first: bool,
}

impl TrackingSubscription {
    /// Next snapshot. The first call returns the current state without
    /// waiting; afterwards each store write wakes the subscription.
    /// `None` once the feed side is gone.
    pub async fn next(&mut self) -> Option<OrderTracking> {
        if self.first {
            self.first = false;
            return Some(self.rx.borrow_and_update().clone());
        }
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Stream form, used by the SSE endpoint. Yields the current snapshot
    /// first, like `next`.
    pub fn into_stream(self) -> WatchStream<OrderTracking> {
        WatchStream::new(self.rx)
    }
}
