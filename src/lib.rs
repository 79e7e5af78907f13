//! Focus Ring - A Pomodoro timer daemon
//!
//! This library provides the work/break countdown state machine, its
//! persisted statistics, and the pieces that drive it from a tokio runtime:
//! a tick clock, a desktop presenter and a local HTTP control API.

pub mod api;
pub mod clock;
pub mod config;
pub mod error;
pub mod presenter;
pub mod services;
pub mod settings;
pub mod state;
pub mod store;
pub mod tasks;
pub mod timer;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use error::{PersistenceError, TimerError};
pub use state::AppState;
pub use timer::{Mode, PomodoroTimer, TimerSnapshot};
pub use utils::signals::shutdown_signal;
