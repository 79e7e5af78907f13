//! Countdown state

use serde::Serialize;

use super::Mode;

/// Countdown position and interval lengths.
///
/// Never persisted: every load starts a fresh work interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimerState {
    pub mode: Mode,
    pub remaining_seconds: u64,
    pub running: bool,
    pub work_minutes: u32,
    pub break_minutes: u32,
}

impl TimerState {
    /// Idle at the start of a work interval
    pub fn new(work_minutes: u32, break_minutes: u32) -> Self {
        Self {
            mode: Mode::Work,
            remaining_seconds: u64::from(work_minutes) * 60,
            running: false,
            work_minutes,
            break_minutes,
        }
    }

    /// Configured length of `mode` in minutes
    pub fn duration_minutes(&self, mode: Mode) -> u32 {
        match mode {
            Mode::Work => self.work_minutes,
            Mode::Break => self.break_minutes,
        }
    }

    /// Full length of the current interval in seconds
    pub fn current_duration_seconds(&self) -> u64 {
        u64::from(self.duration_minutes(self.mode)) * 60
    }

    /// Switch to `mode` with a full countdown
    pub fn begin(&mut self, mode: Mode) {
        self.mode = mode;
        self.remaining_seconds = self.current_duration_seconds();
    }

    /// Split remaining time into display minutes and seconds
    pub fn display_parts(&self) -> (u64, u64) {
        (self.remaining_seconds / 60, self.remaining_seconds % 60)
    }

    /// Remaining share of the current interval, `0.0..=1.0`
    pub fn fraction_remaining(&self) -> f64 {
        let total = self.current_duration_seconds();
        if total == 0 {
            return 0.0;
        }
        (self.remaining_seconds as f64 / total as f64).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_idle_work() {
        let state = TimerState::new(25, 5);
        assert_eq!(state.mode, Mode::Work);
        assert_eq!(state.remaining_seconds, 1500);
        assert!(!state.running);
        assert_eq!(state.display_parts(), (25, 0));
        assert_eq!(state.fraction_remaining(), 1.0);
    }

    #[test]
    fn test_begin_break() {
        let mut state = TimerState::new(25, 5);
        state.begin(Mode::Break);
        assert_eq!(state.remaining_seconds, 300);
        assert_eq!(state.current_duration_seconds(), 300);
    }

    #[test]
    fn test_display_and_fraction_mid_interval() {
        let mut state = TimerState::new(10, 5);
        state.remaining_seconds = 300 + 9;
        assert_eq!(state.display_parts(), (5, 9));
        assert!((state.fraction_remaining() - 309.0 / 600.0).abs() < f64::EPSILON);
    }
}
