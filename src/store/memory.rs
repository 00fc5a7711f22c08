use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::order::{Order, OrderStatus};
use crate::store::{OrderStore, StoreError, TrackingStore};

/// Hash-map order store. Suitable for tests and single-node use.
#[derive(Default)]
pub struct MemoryOrderStore {
    orders: RwLock<HashMap<String, Order>>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn insert(&self, order: Order) -> Result<(), StoreError> {
        let mut orders = self.orders.write().await;
        if orders.contains_key(&order.id) {
            return Err(StoreError::Duplicate(order.id));
        }
        orders.insert(order.id.clone(), order);
        Ok(())
    }

    async fn fetch(&self, order_id: &str) -> Result<Option<Order>, StoreError> {
        Ok(self.orders.read().await.get(order_id).cloned())
    }

    async fn set_status(
        &self,
        order_id: &str,
        status: OrderStatus,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut orders = self.orders.write().await;
        match orders.get_mut(order_id) {
            Some(order) => {
                order.status = status;
                order.updated_at = at;
                Ok(())
            }
            None => Err(StoreError::Missing(order_id.to_string())),
        }
    }
}

/// Hash-map tracking store, last-write-wins on `save`.
#[derive(Default)]
pub struct MemoryTrackingStore {
    trackings: RwLock<HashMap<String, crate::tracking::OrderTracking>>,
}

impl MemoryTrackingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TrackingStore for MemoryTrackingStore {
    async fn insert(&self, tracking: crate::tracking::OrderTracking) -> Result<(), StoreError> {
        let mut trackings = self.trackings.write().await;
        if trackings.contains_key(&tracking.order_id) {
            return Err(StoreError::Duplicate(tracking.order_id));
        }
        trackings.insert(tracking.order_id.clone(), tracking);
        Ok(())
    }

    async fn fetch(
        &self,
        order_id: &str,
    ) -> Result<Option<crate::tracking::OrderTracking>, StoreError> {
        Ok(self.trackings.read().await.get(order_id).cloned())
    }

    async fn save(&self, tracking: crate::tracking::OrderTracking) -> Result<(), StoreError> {
        let mut trackings = self.trackings.write().await;
        if !trackings.contains_key(&tracking.order_id) {
            return Err(StoreError::Missing(tracking.order_id));
        }
        trackings.insert(tracking.order_id.clone(), tracking);
        Ok(())
    }
}
