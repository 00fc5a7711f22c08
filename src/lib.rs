//! Order lifecycle tracking and multi-channel notifications for a
//! restaurant delivery service.
//!
//! The crate is organised around a few seams:
//!  - [`order`] and [`tracking`] hold the domain model: placed orders and
//!    their append-only tracking history.
//!  - [`machine`] applies status transitions under a per-order lock and
//!    reports the side effects each change calls for.
//!  - [`notify`] fans events out to Telegram, WhatsApp and email without
//!    letting one channel's failure starve the others.
//!  - [`telegram`] speaks the bot protocol: webhook decoding, callback
//!    buttons and the `/durum` command processor.
//!  - [`realtime`] publishes tracking snapshots to watchers so the HTTP
//!    layer can stream live updates.
//!  - [`http`] wires it all into an axum router.

pub mod config;
pub mod http;
pub mod machine;
pub mod notify;
pub mod order;
pub mod realtime;
pub mod store;
pub mod telegram;
pub mod tracking;

pub use config::AppConfig;
pub use http::{router, serve, ApiError, AppState};
pub use machine::{AppliedChange, OrderStatusMachine, RejectReason, TransitionOutcome};
pub use notify::{
    ChannelError, DispatchReport, NotificationChannel, NotificationDispatcher, OrderContext,
    OrderEvent,
};
pub use order::{Order, OrderDraft, OrderItem, OrderStatus, PaymentMethod};
pub use realtime::{TrackingFeed, TrackingSubscription, TrackingView};
pub use store::{MemoryOrderStore, MemoryTrackingStore, OrderStore, StoreError, TrackingStore};
pub use tracking::{OrderTracking, StatusUpdate, UpdateActor};
