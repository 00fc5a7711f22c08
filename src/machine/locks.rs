use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// One mutex per order id. The tokio mutex hands the lock out in arrival
/// order, so writes to the same order queue up fairly while different
/// orders never contend.
pub(crate) struct OrderLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl OrderLocks {
    pub fn new() -> Self {
        OrderLocks {
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub async fn for_order(&self, order_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(order_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
