use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::order::{Order, OrderStatus};
use crate::store::StoreError;

/// Persistence seam for orders. The in-memory implementation backs tests
/// and single-node deployments; a database-backed one plugs in here.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn insert(&self, order: Order) -> Result<(), StoreError>;

    async fn fetch(&self, order_id: &str) -> Result<Option<Order>, StoreError>;

    /// Mirror the tracking side's latest status onto the order record.
    async fn set_status(
        &self,
        order_id: &str,
        status: OrderStatus,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError>;
}
