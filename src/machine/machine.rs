use chrono::Utc;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::notify::{message, NotificationDispatcher, OrderContext, OrderEvent};
use crate::order::{Order, OrderStatus};
use crate::store::{OrderStore, StoreError, TrackingStore};
use crate::tracking::{
    CustomerInteraction, DeliveryDriver, InteractionKind, LocationPoint, NotificationRecord,
    OrderTracking, StatusUpdate, UpdateActor,
};

use super::locks::OrderLocks;

/// Why a request was turned away without touching state. These are
/// business outcomes, not errors; store faults travel separately.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RejectReason {
    UnknownOrder,
    TerminalState(OrderStatus),
    DriverAssignmentBarred(OrderStatus),
}

impl RejectReason {
    /// User-facing explanation, Turkish like the rest of the surface.
    pub fn message_tr(&self) -> String {
        match self {
            RejectReason::UnknownOrder => "Sipariş bulunamadı".to_string(),
            RejectReason::TerminalState(status) => {
                format!("Sipariş kapalı ({status}), durum değiştirilemez")
            }
            RejectReason::DriverAssignmentBarred(status) => {
                format!("Bu aşamada kurye atanamaz ({status})")
            }
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::UnknownOrder => f.write_str("order not found"),
            RejectReason::TerminalState(status) => write!(f, "order already closed ({status})"),
            RejectReason::DriverAssignmentBarred(status) => {
                write!(f, "driver assignment not allowed in {status}")
            }
        }
    }
}

/// A committed change plus the notification it still owes. The caller
/// hands the event to the dispatcher after the write; the machine itself
/// never touches the network.
#[derive(Debug)]
pub struct AppliedChange {
    pub order_id: String,
    pub status: OrderStatus,
    pub tracking: OrderTracking,
    pub notification: Option<OrderEvent>,
}

#[derive(Debug)]
pub enum TransitionOutcome {
    Applied(AppliedChange),
    Rejected(RejectReason),
}

impl TransitionOutcome {
    pub fn applied(&self) -> bool {
        matches!(self, TransitionOutcome::Applied(_))
    }
}

/// Drives the order lifecycle. All writes for one order run under that
/// order's lock, so the read-check-append-save sequence below is atomic
/// per order and the status history stays append-only and ordered.
///
/// Any status is reachable from a non-terminal state; the machine guards
/// the terminal states and leaves step-skipping to the operators.
pub struct OrderStatusMachine {
    orders: Arc<dyn OrderStore>,
    trackings: Arc<dyn TrackingStore>,
    locks: OrderLocks,
}

impl OrderStatusMachine {
    pub fn new(orders: Arc<dyn OrderStore>, trackings: Arc<dyn TrackingStore>) -> Self {
        OrderStatusMachine {
            orders,
            trackings,
            locks: OrderLocks::new(),
        }
    }

    /// Register a freshly placed order together with its tracking. The id
    /// is new, so no per-order lock is taken; a duplicate id surfaces as a
    /// store error.
    pub async fn register(
        &self,
        order: Order,
        tracking: OrderTracking,
    ) -> Result<(), StoreError> {
        let order_id = order.id.clone();
        self.orders.insert(order).await?;
        self.trackings.insert(tracking).await?;
        info!(%order_id, "order registered");
        Ok(())
    }

    /// Move an order to `target`. On success the status history gains an
    /// entry, the matching milestone is stamped, the order record mirrors
    /// the new status and the returned change carries a `StatusChanged`
    /// notification for the dispatcher.
    pub async fn transition(
        &self,
        order_id: &str,
        target: OrderStatus,
        actor: UpdateActor,
        description: Option<String>,
        metadata: Option<Value>,
    ) -> Result<TransitionOutcome, StoreError> {
        let lock = self.locks.for_order(order_id).await;
        let _guard = lock.lock().await;

        let Some(order) = self.orders.fetch(order_id).await? else {
            return Ok(TransitionOutcome::Rejected(RejectReason::UnknownOrder));
        };
        let Some(mut tracking) = self.trackings.fetch(order_id).await? else {
            return Ok(TransitionOutcome::Rejected(RejectReason::UnknownOrder));
        };
        if tracking.status.is_terminal() {
            info!(%order_id, status = %tracking.status, %target, "transition refused, order closed");
            return Ok(TransitionOutcome::Rejected(RejectReason::TerminalState(
                tracking.status,
            )));
        }

        let now = Utc::now();
        tracking.record_status(StatusUpdate {
            status: target,
            actor,
            description: description
                .unwrap_or_else(|| message::status_line(target).to_string()),
            metadata,
            recorded_at: now,
        });
        let snapshot = tracking.clone();
        self.trackings.save(tracking).await?;
        self.orders.set_status(order_id, target, now).await?;

        info!(%order_id, %target, "status transition applied");
        Ok(TransitionOutcome::Applied(AppliedChange {
            order_id: order_id.to_string(),
            status: target,
            tracking: snapshot,
            notification: Some(OrderEvent::StatusChanged {
                context: OrderContext::from_order(&order),
                status: target,
            }),
        }))
    }

    /// Attach a courier. Only orders that are confirmed but not yet out
    /// of the door take an assignment; assigning again overwrites.
    pub async fn assign_driver(
        &self,
        order_id: &str,
        driver: DeliveryDriver,
    ) -> Result<TransitionOutcome, StoreError> {
        let lock = self.locks.for_order(order_id).await;
        let _guard = lock.lock().await;

        let Some(mut tracking) = self.trackings.fetch(order_id).await? else {
            return Ok(TransitionOutcome::Rejected(RejectReason::UnknownOrder));
        };
        if tracking.status.is_terminal() {
            return Ok(TransitionOutcome::Rejected(RejectReason::TerminalState(
                tracking.status,
            )));
        }
        if !matches!(
            tracking.status,
            OrderStatus::Confirmed | OrderStatus::Preparing | OrderStatus::Ready
        ) {
            return Ok(TransitionOutcome::Rejected(
                RejectReason::DriverAssignmentBarred(tracking.status),
            ));
        }

        let driver_id = driver.id.clone();
        tracking.assign_driver(driver, Utc::now());
        let snapshot = tracking.clone();
        self.trackings.save(tracking).await?;

        info!(%order_id, driver_id, "driver assigned");
        Ok(TransitionOutcome::Applied(AppliedChange {
            order_id: order_id.to_string(),
            status: snapshot.status,
            tracking: snapshot,
            notification: None,
        }))
    }

    /// Append a route point. When the point's status differs from the
    /// current one the matching status transition happens in the same
    /// per-order critical section, so readers never see the location
    /// without its status entry.
    pub async fn update_location(
        &self,
        order_id: &str,
        latitude: f64,
        longitude: f64,
        status: OrderStatus,
        description: Option<String>,
    ) -> Result<TransitionOutcome, StoreError> {
        let lock = self.locks.for_order(order_id).await;
        let _guard = lock.lock().await;

        let Some(order) = self.orders.fetch(order_id).await? else {
            return Ok(TransitionOutcome::Rejected(RejectReason::UnknownOrder));
        };
        let Some(mut tracking) = self.trackings.fetch(order_id).await? else {
            return Ok(TransitionOutcome::Rejected(RejectReason::UnknownOrder));
        };
        if tracking.status.is_terminal() {
            return Ok(TransitionOutcome::Rejected(RejectReason::TerminalState(
                tracking.status,
            )));
        }

        let now = Utc::now();
        tracking.record_location(LocationPoint {
            latitude,
            longitude,
            status,
            description,
            recorded_at: now,
        });
        let status_changed = status != tracking.status;
        if status_changed {
            tracking.record_status(StatusUpdate {
                status,
                actor: UpdateActor::Driver,
                description: message::status_line(status).to_string(),
                metadata: None,
                recorded_at: now,
            });
        }
        let snapshot = tracking.clone();
        self.trackings.save(tracking).await?;
        if status_changed {
            self.orders.set_status(order_id, status, now).await?;
        }

        Ok(TransitionOutcome::Applied(AppliedChange {
            order_id: order_id.to_string(),
            status: snapshot.status,
            tracking: snapshot,
            notification: status_changed.then(|| OrderEvent::StatusChanged {
                context: OrderContext::from_order(&order),
                status,
            }),
        }))
    }

    /// Note something the customer did on the tracking screen. Appends
    /// only; the status never moves, not even for a cancel request.
    pub async fn add_customer_interaction(
        &self,
        order_id: &str,
        kind: InteractionKind,
        notes: Option<String>,
    ) -> Result<TransitionOutcome, StoreError> {
        let lock = self.locks.for_order(order_id).await;
        let _guard = lock.lock().await;

        let Some(mut tracking) = self.trackings.fetch(order_id).await? else {
            return Ok(TransitionOutcome::Rejected(RejectReason::UnknownOrder));
        };

        tracking.record_interaction(CustomerInteraction {
            kind,
            notes,
            recorded_at: Utc::now(),
        });
        let snapshot = tracking.clone();
        self.trackings.save(tracking).await?;

        Ok(TransitionOutcome::Applied(AppliedChange {
            order_id: order_id.to_string(),
            status: snapshot.status,
            tracking: snapshot,
            notification: None,
        }))
    }

    /// Append dispatch outcomes to the aggregate's notification log. A
    /// vanished aggregate is logged and ignored; the sends already went
    /// out.
    pub async fn record_notifications(
        &self,
        order_id: &str,
        records: Vec<NotificationRecord>,
    ) -> Result<(), StoreError> {
        if records.is_empty() {
            return Ok(());
        }
        let lock = self.locks.for_order(order_id).await;
        let _guard = lock.lock().await;

        let Some(mut tracking) = self.trackings.fetch(order_id).await? else {
            warn!(%order_id, "tracking gone, notification log dropped");
            return Ok(());
        };
        for record in records {
            tracking.record_notification(record);
        }
        self.trackings.save(tracking).await
    }

    /// Fan out the pending notification of an applied change, then log
    /// the outcomes on the aggregate. The change itself already
    /// committed, so nothing here escalates.
    pub async fn run_notification(
        &self,
        dispatcher: &NotificationDispatcher,
        change: &AppliedChange,
    ) {
        let Some(event) = &change.notification else {
            return;
        };
        let report = dispatcher.dispatch(event).await;
        if let Err(error) = self
            .record_notifications(&change.order_id, report.records())
            .await
        {
            error!(order_id = %change.order_id, %error, "notification log write failed");
        }
    }

    pub async fn tracking(&self, order_id: &str) -> Result<Option<OrderTracking>, StoreError> {
        self.trackings.fetch(order_id).await
    }

    pub async fn order(&self, order_id: &str) -> Result<Option<Order>, StoreError> {
        self.orders.fetch(order_id).await
    }
}
