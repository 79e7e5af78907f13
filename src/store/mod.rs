//! Persistent key-value store
//!
//! The timer only needs string keys mapped to string values. Numbers are
//! stored as decimal strings and booleans as `"true"`/`"false"`.

pub mod file_store;
pub mod memory_store;

pub use file_store::JsonFileStore;
pub use memory_store::MemoryStore;

use crate::error::PersistenceError;

/// Completed work sessions
pub const KEY_SESSIONS: &str = "sessions";
/// Total focused minutes
pub const KEY_FOCUS_TIME: &str = "focusTime";
pub const KEY_WORK_DURATION: &str = "workDuration";
pub const KEY_BREAK_DURATION: &str = "breakDuration";
pub const KEY_DARK_MODE: &str = "darkMode";

/// Minimal key-value contract the timer persists through
pub trait KeyValueStore {
    /// Read a value; `None` when absent or unreadable
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value synchronously
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError>;

    /// Write several values as one unit.
    ///
    /// Every entry is attempted even after a failure; the first failure is
    /// returned. Stores that can commit a batch at once override this.
    fn set_many(&mut self, entries: &[(&str, String)]) -> Result<(), PersistenceError> {
        let mut first_error = None;
        for (key, value) in entries {
            if let Err(e) = self.set(key, value) {
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        (**self).set(key, value)
    }

    fn set_many(&mut self, entries: &[(&str, String)]) -> Result<(), PersistenceError> {
        (**self).set_many(entries)
    }
}
