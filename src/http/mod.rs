mod error;
mod orders;
mod routes;
mod send;
mod state;
mod telegram;
mod tracking;
mod whatsapp;

pub use error::ApiError;
pub use routes::{router, serve};
pub use send::{SendReply, SendRequest};
pub use state::AppState;
pub use tracking::TrackingResponse;
