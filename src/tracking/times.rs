use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::order::OrderStatus;
use crate::tracking::StatusUpdate;

/// The four milestones of a fulfilled order. `prepared` is stamped when
/// preparation starts and `picked_up` when the courier heads out; `Ready`
/// falls between the two and stamps nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Milestone {
    Confirmed,
    Prepared,
    PickedUp,
    Delivered,
}

impl Milestone {
    pub fn for_status(status: OrderStatus) -> Option<Milestone> {
        match status {
            OrderStatus::Confirmed => Some(Milestone::Confirmed),
            OrderStatus::Preparing => Some(Milestone::Prepared),
            OrderStatus::Delivering => Some(Milestone::PickedUp),
            OrderStatus::Delivered => Some(Milestone::Delivered),
            OrderStatus::Pending | OrderStatus::Ready | OrderStatus::Cancelled => None,
        }
    }
}

/// Milestone timestamps, either the estimate made at placement or the
/// actual times stamped as the order moves forward.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneTimes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmed: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prepared: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picked_up: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivered: Option<DateTime<Utc>>,
}

impl MilestoneTimes {
    pub fn get(&self, milestone: Milestone) -> Option<DateTime<Utc>> {
        match milestone {
            Milestone::Confirmed => self.confirmed,
            Milestone::Prepared => self.prepared,
            Milestone::PickedUp => self.picked_up,
            Milestone::Delivered => self.delivered,
        }
    }

    /// Record a milestone time if it is not already set. First stamp wins,
    /// so a status revisited later never moves a milestone.
    pub fn stamp(&mut self, milestone: Milestone, at: DateTime<Utc>) -> bool {
        let slot = match milestone {
            Milestone::Confirmed => &mut self.confirmed,
            Milestone::Prepared => &mut self.prepared,
            Milestone::PickedUp => &mut self.picked_up,
            Milestone::Delivered => &mut self.delivered,
        };
        if slot.is_none() {
            *slot = Some(at);
            true
        } else {
            false
        }
    }
}

/// Elapsed seconds between consecutive visited milestones, derived from
/// the status history for display. A milestone that was never reached
/// leaves its slot empty and the next gap is measured from the one before
/// it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElapsedTimes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirm_secs: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prepare_secs: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup_secs: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deliver_secs: Option<i64>,
}

impl ElapsedTimes {
    fn set(&mut self, milestone: Milestone, secs: i64) {
        match milestone {
            Milestone::Confirmed => self.confirm_secs = Some(secs),
            Milestone::Prepared => self.prepare_secs = Some(secs),
            Milestone::PickedUp => self.pickup_secs = Some(secs),
            Milestone::Delivered => self.deliver_secs = Some(secs),
        }
    }
}

/// Project the status history into per-milestone elapsed times. Only the
/// first visit of each milestone counts; the gap for `Confirmed` is
/// measured from the initial non-milestone entry when one exists.
pub fn elapsed_between(updates: &[StatusUpdate]) -> ElapsedTimes {
    let mut out = ElapsedTimes::default();
    let mut visited = MilestoneTimes::default();
    let mut prev: Option<DateTime<Utc>> = updates
        .first()
        .filter(|u| Milestone::for_status(u.status).is_none())
        .map(|u| u.recorded_at);

    for update in updates {
        if let Some(milestone) = Milestone::for_status(update.status) {
            if visited.stamp(milestone, update.recorded_at) {
                if let Some(from) = prev {
                    out.set(milestone, (update.recorded_at - from).num_seconds());
                }
                prev = Some(update.recorded_at);
            }
        }
    }
    out
}
