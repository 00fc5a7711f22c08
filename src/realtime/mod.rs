mod feed;
mod view;

pub use feed::{TrackingFeed, TrackingSubscription};
pub use view::TrackingView;
