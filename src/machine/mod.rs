mod locks;
mod machine;

pub use machine::{AppliedChange, OrderStatusMachine, RejectReason, TransitionOutcome};
