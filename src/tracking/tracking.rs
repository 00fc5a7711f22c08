use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::order::{Order, OrderStatus};
use crate::tracking::{
    elapsed_between, CustomerInteraction, DeliveryDriver, ElapsedTimes, LocationPoint, Milestone,
    MilestoneTimes, NotificationRecord, StatusUpdate, UpdateActor,
};

/// Coarse delivery sub-status shown on the tracking screen, derived from
/// driver assignment and the status history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Waiting,
    Assigned,
    OnTheWay,
    Completed,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Waiting => "waiting",
            DeliveryStatus::Assigned => "assigned",
            DeliveryStatus::OnTheWay => "on_the_way",
            DeliveryStatus::Completed => "completed",
        }
    }
}

/// Per-order tracking aggregate: current status plus the append-only
/// histories hanging off it. All mutation goes through the methods here;
/// each one keeps the core invariant that `status` equals the status of
/// the last entry in `status_updates`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTracking {
    pub order_id: String,
    pub status: OrderStatus,
    pub delivery_status: DeliveryStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver: Option<DeliveryDriver>,
    pub status_updates: Vec<StatusUpdate>,
    pub locations: Vec<LocationPoint>,
    pub interactions: Vec<CustomerInteraction>,
    pub notifications: Vec<NotificationRecord>,
    pub estimated: MilestoneTimes,
    pub actual: MilestoneTimes,
    /// Bumped on every mutation; later writes win at the store level.
    pub revision: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderTracking {
    /// Open tracking for a freshly placed order. The history starts with a
    /// `Pending` entry so the status invariant holds from the first read.
    pub fn start(
        order: &Order,
        estimated: MilestoneTimes,
        description: String,
        now: DateTime<Utc>,
    ) -> OrderTracking {
        OrderTracking {
            order_id: order.id.clone(),
            status: OrderStatus::Pending,
            delivery_status: DeliveryStatus::Waiting,
            driver: None,
            status_updates: vec![StatusUpdate {
                status: OrderStatus::Pending,
                actor: UpdateActor::System,
                description,
                metadata: None,
                recorded_at: now,
            }],
            locations: Vec::new(),
            interactions: Vec::new(),
            notifications: Vec::new(),
            estimated,
            actual: MilestoneTimes::default(),
            revision: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Append a status entry and move the aggregate to its status. Stamps
    /// the matching actual milestone on first visit and adjusts the
    /// delivery sub-status.
    pub fn record_status(&mut self, update: StatusUpdate) {
        let at = update.recorded_at;
        self.status = update.status;
        if let Some(milestone) = Milestone::for_status(update.status) {
            self.actual.stamp(milestone, at);
        }
        match update.status {
            OrderStatus::Delivering => self.delivery_status = DeliveryStatus::OnTheWay,
            OrderStatus::Delivered => self.delivery_status = DeliveryStatus::Completed,
            _ => {}
        }
        self.status_updates.push(update);
        self.touch(at);
    }

    /// Attach (or replace) the courier. Assigning overwrites the whole
    /// driver record.
    pub fn assign_driver(&mut self, driver: DeliveryDriver, at: DateTime<Utc>) {
        self.driver = Some(driver);
        if self.delivery_status == DeliveryStatus::Waiting {
            self.delivery_status = DeliveryStatus::Assigned;
        }
        self.touch(at);
    }

    pub fn record_location(&mut self, point: LocationPoint) {
        let at = point.recorded_at;
        self.locations.push(point);
        self.touch(at);
    }

    pub fn record_interaction(&mut self, interaction: CustomerInteraction) {
        let at = interaction.recorded_at;
        self.interactions.push(interaction);
        self.touch(at);
    }

    pub fn record_notification(&mut self, record: NotificationRecord) {
        let at = record.sent_at;
        self.notifications.push(record);
        self.touch(at);
    }

    pub fn last_update(&self) -> Option<&StatusUpdate> {
        self.status_updates.last()
    }

    /// Elapsed times between the milestones actually visited.
    pub fn elapsed_times(&self) -> ElapsedTimes {
        elapsed_between(&self.status_updates)
    }

    fn touch(&mut self, at: DateTime<Utc>) {
        self.revision += 1;
        if at > self.updated_at {
            self.updated_at = at;
        }
    }
}
