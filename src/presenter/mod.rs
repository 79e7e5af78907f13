//! Presentation sink the timer reports into
//!
//! The timer never renders anything itself. It calls these hooks after each
//! state change; rendering, sound and notifications are the presenter's job
//! and their failures stay inside the presenter.

pub mod desktop;
pub mod log;

pub use desktop::DesktopPresenter;
pub use log::LogPresenter;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::timer::Mode;

/// Ambient sound picked by the user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundSelection {
    #[default]
    None,
    Rain,
    Forest,
    Waves,
}

impl SoundSelection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundSelection::None => "none",
            SoundSelection::Rain => "rain",
            SoundSelection::Forest => "forest",
            SoundSelection::Waves => "waves",
        }
    }

    /// File name inside the sound directory, `None` for silence
    pub fn file_name(&self) -> Option<&'static str> {
        match self {
            SoundSelection::None => None,
            SoundSelection::Rain => Some("rain_1.mp3"),
            SoundSelection::Forest => Some("forest_1.wav"),
            SoundSelection::Waves => Some("ocean_1.wav"),
        }
    }
}

impl fmt::Display for SoundSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do with the ambient sound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundAction {
    Play,
    Pause,
    /// Stop and rewind
    Stop,
}

/// Hooks the timer calls into; none of them may fail back into the timer
pub trait Presenter {
    /// Countdown changed
    fn on_display_update(&mut self, minutes: u64, seconds: u64);

    /// Fraction of the current interval still remaining, `0.0..=1.0`
    fn on_progress_update(&mut self, fraction_remaining: f64);

    fn on_dashboard_update(&mut self, sessions_completed: u64, total_focus_minutes: u64);

    /// An interval just ran out; `finished` is the mode that ended
    fn on_interval_completed(&mut self, finished: Mode);

    fn on_sound_request(&mut self, selection: SoundSelection, action: SoundAction);
}

impl<T: Presenter + ?Sized> Presenter for Box<T> {
    fn on_display_update(&mut self, minutes: u64, seconds: u64) {
        (**self).on_display_update(minutes, seconds)
    }

    fn on_progress_update(&mut self, fraction_remaining: f64) {
        (**self).on_progress_update(fraction_remaining)
    }

    fn on_dashboard_update(&mut self, sessions_completed: u64, total_focus_minutes: u64) {
        (**self).on_dashboard_update(sessions_completed, total_focus_minutes)
    }

    fn on_interval_completed(&mut self, finished: Mode) {
        (**self).on_interval_completed(finished)
    }

    fn on_sound_request(&mut self, selection: SoundSelection, action: SoundAction) {
        (**self).on_sound_request(selection, action)
    }
}

/// `MM:SS`, each part zero-padded to two digits
pub fn format_countdown(minutes: u64, seconds: u64) -> String {
    format!("{:02}:{:02}", minutes, seconds)
}
