//! Error types shared across the timer, store and driver

use thiserror::Error;

/// A write to the key-value store did not go through.
///
/// In-memory state stays authoritative when this is returned; the next
/// successful write reconciles the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to persist '{key}': {reason}")]
pub struct PersistenceError {
    pub key: String,
    pub reason: String,
}

impl PersistenceError {
    pub fn new(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Errors surfaced by timer operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    /// Duration that is not a positive number of minutes; nothing was changed
    #[error("invalid duration: {0} minutes (expected a positive integer)")]
    InvalidDuration(i64),

    /// The change was applied in memory but could not be saved
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// The timer driver task is gone
    #[error("timer driver is not running")]
    DriverUnavailable,
}
