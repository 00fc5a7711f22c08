use async_trait::async_trait;
use std::sync::Arc;

use crate::store::{StoreError, TrackingStore};
use crate::tracking::OrderTracking;

use super::feed::{TrackingFeed, TrackingSubscription};

/// Store decorator behind the live tracking view: every insert and save
/// goes to the inner store first, then out to the order's watchers. Wire
/// the machine against this and pushes need no extra plumbing.
pub struct TrackingView {
    inner: Arc<dyn TrackingStore>,
    feed: TrackingFeed,
}

impl TrackingView {
    pub fn new(inner: Arc<dyn TrackingStore>) -> Self {
        TrackingView {
            inner,
            feed: TrackingFeed::new(),
        }
    }

    /// Watch one order's tracking. `Ok(None)` when the order is unknown.
    pub async fn watch(&self, order_id: &str) -> Result<Option<TrackingSubscription>, StoreError> {
        self.feed.watch(self.inner.as_ref(), order_id).await
    }
}

#[async_trait]
impl TrackingStore for TrackingView {
    async fn insert(&self, tracking: OrderTracking) -> Result<(), StoreError> {
        self.inner.insert(tracking.clone()).await?;
        self.feed.publish(&tracking).await;
        Ok(())
    }

    async fn fetch(&self, order_id: &str) -> Result<Option<OrderTracking>, StoreError> {
        self.inner.fetch(order_id).await
    }

    async fn save(&self, tracking: OrderTracking) -> Result<(), StoreError> {
        self.inner.save(tracking.clone()).await?;
        self.feed.publish(&tracking).await;
        Ok(())
    }
}
