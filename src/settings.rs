//! Persisted configuration and statistics load/save

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::PersistenceError,
    store::{
        KeyValueStore, KEY_BREAK_DURATION, KEY_DARK_MODE, KEY_FOCUS_TIME, KEY_SESSIONS,
        KEY_WORK_DURATION,
    },
    timer::SessionStats,
};

pub const DEFAULT_WORK_MINUTES: u32 = 25;
pub const DEFAULT_BREAK_MINUTES: u32 = 5;

/// User-configurable timer settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub work_minutes: u32,
    pub break_minutes: u32,
    pub dark_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work_minutes: DEFAULT_WORK_MINUTES,
            break_minutes: DEFAULT_BREAK_MINUTES,
            dark_mode: false,
        }
    }
}

/// Durations are whole, positive minutes
pub fn is_valid_duration(minutes: u32) -> bool {
    minutes >= 1
}

/// Load settings and stats; every missing or malformed key gets its default
pub fn load_configuration<S: KeyValueStore + ?Sized>(store: &S) -> (Settings, SessionStats) {
    let defaults = Settings::default();

    let settings = Settings {
        work_minutes: read_number(store, KEY_WORK_DURATION)
            .filter(|&m| is_valid_duration(m))
            .unwrap_or(defaults.work_minutes),
        break_minutes: read_number(store, KEY_BREAK_DURATION)
            .filter(|&m| is_valid_duration(m))
            .unwrap_or(defaults.break_minutes),
        dark_mode: read_bool(store, KEY_DARK_MODE).unwrap_or(defaults.dark_mode),
    };

    let stats = SessionStats {
        sessions_completed: read_number(store, KEY_SESSIONS).unwrap_or(0),
        total_focus_minutes: read_number(store, KEY_FOCUS_TIME).unwrap_or(0),
    };

    (settings, stats)
}

/// Write settings and stats as one unit through [`KeyValueStore::set_many`]
pub fn save_configuration<S: KeyValueStore + ?Sized>(
    store: &mut S,
    settings: &Settings,
    stats: &SessionStats,
) -> Result<(), PersistenceError> {
    let entries = [
        (KEY_SESSIONS, stats.sessions_completed.to_string()),
        (KEY_FOCUS_TIME, stats.total_focus_minutes.to_string()),
        (KEY_WORK_DURATION, settings.work_minutes.to_string()),
        (KEY_BREAK_DURATION, settings.break_minutes.to_string()),
        (KEY_DARK_MODE, settings.dark_mode.to_string()),
    ];

    store.set_many(&entries)
}

fn read_number<S, T>(store: &S, key: &str) -> Option<T>
where
    S: KeyValueStore + ?Sized,
    T: std::str::FromStr,
{
    let raw = store.get(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            debug!("Ignoring malformed value for {}: {:?}", key, raw);
            None
        }
    }
}

fn read_bool<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> Option<bool> {
    match store.get(key)?.trim() {
        "true" => Some(true),
        "false" => Some(false),
        other => {
            debug!("Ignoring malformed value for {}: {:?}", key, other);
            None
        }
    }
}
