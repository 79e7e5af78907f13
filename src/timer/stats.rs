//! Aggregate focus statistics

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    error::PersistenceError,
    settings::{save_configuration, Settings},
    store::KeyValueStore,
};

/// Completed work intervals and the minutes they add up to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub sessions_completed: u64,
    pub total_focus_minutes: u64,
}

/// Count one finished work interval of `duration_minutes` and write through.
///
/// The counters are updated before the write, so on failure they stay ahead of
/// the store until the next successful save.
pub fn record_completed_work_session<S: KeyValueStore + ?Sized>(
    stats: &mut SessionStats,
    store: &mut S,
    settings: &Settings,
    duration_minutes: u32,
) -> Result<(), PersistenceError> {
    stats.sessions_completed = stats.sessions_completed.saturating_add(1);
    stats.total_focus_minutes = stats
        .total_focus_minutes
        .saturating_add(u64::from(duration_minutes));

    info!(
        "Recorded work session #{} ({} min, {} min total)",
        stats.sessions_completed, duration_minutes, stats.total_focus_minutes
    );

    save_configuration(store, settings, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_record_increments_and_persists() {
        let mut store = MemoryStore::new();
        let mut stats = SessionStats {
            sessions_completed: 3,
            total_focus_minutes: 75,
        };

        record_completed_work_session(&mut stats, &mut store, &Settings::default(), 25).unwrap();

        assert_eq!(stats.sessions_completed, 4);
        assert_eq!(stats.total_focus_minutes, 100);
        assert_eq!(store.get("sessions").as_deref(), Some("4"));
        assert_eq!(store.get("focusTime").as_deref(), Some("100"));
    }

    #[test]
    fn test_failed_write_keeps_memory_counters() {
        let mut store = MemoryStore::new();
        store.set_fail_writes(true);
        let mut stats = SessionStats::default();

        let result =
            record_completed_work_session(&mut stats, &mut store, &Settings::default(), 50);

        assert!(result.is_err());
        assert_eq!(stats.sessions_completed, 1);
        assert_eq!(stats.total_focus_minutes, 50);
        assert_eq!(store.get("sessions"), None);
    }
}
