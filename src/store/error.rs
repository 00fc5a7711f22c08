use thiserror::Error;

/// Failures surfaced by the durable stores. Missing records are `Option`s
/// on the read path; these are the real faults.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(String),

    #[error("record already exists: {0}")]
    Duplicate(String),

    #[error("record vanished during write: {0}")]
    Missing(String),
}
