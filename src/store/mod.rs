mod error;
mod memory;
mod order_store;
mod tracking_store;

pub use error::StoreError;
pub use memory::{MemoryOrderStore, MemoryTrackingStore};
pub use order_store::OrderStore;
pub use tracking_store::TrackingStore;
