//! Presenter that only writes to the log

use tracing::{debug, info};

use super::{format_countdown, Presenter, SoundAction, SoundSelection};
use crate::timer::Mode;

/// Reports every timer event through `tracing`
#[derive(Debug, Clone, Default)]
pub struct LogPresenter;

impl LogPresenter {
    pub fn new() -> Self {
        Self
    }
}

impl Presenter for LogPresenter {
    fn on_display_update(&mut self, minutes: u64, seconds: u64) {
        debug!("Countdown {}", format_countdown(minutes, seconds));
    }

    fn on_progress_update(&mut self, fraction_remaining: f64) {
        debug!("Progress {:.1}% remaining", fraction_remaining * 100.0);
    }

    fn on_dashboard_update(&mut self, sessions_completed: u64, total_focus_minutes: u64) {
        info!(
            "Dashboard: {} sessions, {} focus minutes",
            sessions_completed, total_focus_minutes
        );
    }

    fn on_interval_completed(&mut self, finished: Mode) {
        info!("{} interval completed: {}", finished, finished.completion_message());
    }

    fn on_sound_request(&mut self, selection: SoundSelection, action: SoundAction) {
        debug!("Sound request: {:?} {}", action, selection);
    }
}
