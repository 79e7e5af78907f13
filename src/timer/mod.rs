//! Pomodoro timer core
//!
//! Work and break intervals, the countdown state machine that moves between
//! them, and the aggregate statistics recorded when work intervals finish.

pub mod machine;
pub mod mode;
pub mod state;
pub mod stats;

pub use machine::{PomodoroTimer, TickOutcome, TimerSnapshot};
pub use mode::Mode;
pub use state::TimerState;
pub use stats::{record_completed_work_session, SessionStats};
