mod driver;
mod interaction;
mod location;
mod notification;
mod status_update;
mod times;
mod tracking;

pub use driver::{DeliveryDriver, DriverLocation, Vehicle};
pub use interaction::{CustomerInteraction, InteractionKind};
pub use location::LocationPoint;
pub use notification::NotificationRecord;
pub use status_update::{StatusUpdate, UpdateActor};
pub use times::{elapsed_between, ElapsedTimes, Milestone, MilestoneTimes};
pub use tracking::{DeliveryStatus, OrderTracking};
