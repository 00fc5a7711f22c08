use async_trait::async_trait;

use crate::store::StoreError;
use crate::tracking::OrderTracking;

/// Persistence seam for tracking aggregates. `save` writes the whole
/// aggregate; callers serialize writes per order above this layer, so the
/// store itself is last-write-wins.
#[async_trait]
pub trait TrackingStore: Send + Sync {
    async fn insert(&self, tracking: OrderTracking) -> Result<(), StoreError>;

    async fn fetch(&self, order_id: &str) -> Result<Option<OrderTracking>, StoreError>;

    async fn save(&self, tracking: OrderTracking) -> Result<(), StoreError>;
}
