//! Countdown state machine

use serde::Serialize;
use tracing::{debug, info};

use super::{record_completed_work_session, Mode, SessionStats, TimerState};
use crate::{
    clock::{ClockSource, SubscriptionId, TICK_PERIOD},
    error::{PersistenceError, TimerError},
    presenter::{Presenter, SoundAction, SoundSelection},
    settings::{is_valid_duration, load_configuration, save_configuration, Settings},
    store::KeyValueStore,
};

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running, or the tick came from a cancelled subscription
    Ignored,
    /// Still counting down
    Counting { remaining_seconds: u64 },
    /// The countdown hit zero; carries the mode that just ended
    Completed(Mode),
}

/// Serialisable view of the whole timer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimerSnapshot {
    pub mode: Mode,
    pub remaining_seconds: u64,
    pub running: bool,
    pub work_minutes: u32,
    pub break_minutes: u32,
    pub sessions_completed: u64,
    pub total_focus_minutes: u64,
    pub sound: SoundSelection,
    pub dark_mode: bool,
    /// Fraction of the current interval remaining
    pub progress: f64,
}

/// Pomodoro timer with injected store, presenter and clock.
///
/// Owns at most one clock subscription, present exactly while running. Every
/// operation cancels ticks before mutating state, and mutates state before
/// notifying the presenter.
#[derive(Debug)]
pub struct PomodoroTimer<S, P, C> {
    state: TimerState,
    stats: SessionStats,
    dark_mode: bool,
    sound: SoundSelection,
    subscription: Option<SubscriptionId>,
    store: S,
    presenter: P,
    clock: C,
}

impl<S, P, C> PomodoroTimer<S, P, C>
where
    S: KeyValueStore,
    P: Presenter,
    C: ClockSource,
{
    /// Load persisted configuration and present an idle work interval
    pub fn new(store: S, presenter: P, clock: C) -> Self {
        let (settings, stats) = load_configuration(&store);
        info!(
            "Loaded configuration: work={}min, break={}min, {} sessions, {} focus minutes",
            settings.work_minutes,
            settings.break_minutes,
            stats.sessions_completed,
            stats.total_focus_minutes
        );

        let mut timer = Self {
            state: TimerState::new(settings.work_minutes, settings.break_minutes),
            stats,
            dark_mode: settings.dark_mode,
            sound: SoundSelection::None,
            subscription: None,
            store,
            presenter,
            clock,
        };
        timer.refresh_dashboard();
        timer.refresh_display();
        timer
    }

    /// Start ticking; does nothing when already running
    pub fn start(&mut self) {
        if self.state.running {
            debug!("Start ignored, timer already running");
            return;
        }

        let id = self.clock.schedule(TICK_PERIOD);
        self.subscription = Some(id);
        self.state.running = true;
        info!(
            "{} interval started with {}s remaining",
            self.state.mode, self.state.remaining_seconds
        );

        self.presenter.on_sound_request(self.sound, SoundAction::Play);
    }

    /// Stop ticking and keep the remaining time; does nothing when idle
    pub fn pause(&mut self) {
        if !self.state.running {
            debug!("Pause ignored, timer not running");
            return;
        }

        self.cancel_subscription();
        self.state.running = false;
        info!(
            "{} interval paused with {}s remaining",
            self.state.mode, self.state.remaining_seconds
        );

        self.presenter.on_sound_request(self.sound, SoundAction::Pause);
    }

    /// Stop and go back to a full work interval
    pub fn reset(&mut self) {
        self.cancel_subscription();
        self.state.running = false;
        self.state.begin(Mode::Work);
        info!("Timer reset to {}s of work", self.state.remaining_seconds);

        self.presenter.on_sound_request(self.sound, SoundAction::Stop);
        self.refresh_display();
    }

    /// Handle one tick from `subscription`.
    ///
    /// On completion the transition always finishes and the presenter is
    /// notified; a failed stats write is returned afterwards.
    pub fn on_tick(
        &mut self,
        subscription: SubscriptionId,
    ) -> Result<TickOutcome, PersistenceError> {
        if !self.state.running || self.subscription != Some(subscription) {
            debug!("Ignoring tick from {}", subscription);
            return Ok(TickOutcome::Ignored);
        }

        self.state.remaining_seconds = self.state.remaining_seconds.saturating_sub(1);
        if self.state.remaining_seconds > 0 {
            self.refresh_display();
            return Ok(TickOutcome::Counting {
                remaining_seconds: self.state.remaining_seconds,
            });
        }

        self.complete_interval()
    }

    /// Change the work interval length
    pub fn set_work_duration(&mut self, minutes: u32) -> Result<(), TimerError> {
        self.set_duration(Mode::Work, minutes)
    }

    /// Change the break interval length
    pub fn set_break_duration(&mut self, minutes: u32) -> Result<(), TimerError> {
        self.set_duration(Mode::Break, minutes)
    }

    /// Pick the ambient sound; switches playback right away when running
    pub fn set_sound(&mut self, selection: SoundSelection) {
        self.sound = selection;
        info!("Sound set to {}", selection);

        if self.state.running {
            let action = match selection {
                SoundSelection::None => SoundAction::Pause,
                _ => SoundAction::Play,
            };
            self.presenter.on_sound_request(selection, action);
        }
    }

    pub fn set_dark_mode(&mut self, enabled: bool) -> Result<(), PersistenceError> {
        self.dark_mode = enabled;
        info!("Dark mode {}", if enabled { "enabled" } else { "disabled" });
        self.save()
    }

    /// Tear down: cancel ticks, stop sound and hand back the store
    pub fn dispose(mut self) -> S {
        let was_running = self.state.running;
        self.cancel_subscription();
        self.state.running = false;
        if was_running {
            self.presenter.on_sound_request(self.sound, SoundAction::Stop);
        }
        debug!("Timer disposed");
        self.store
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            mode: self.state.mode,
            remaining_seconds: self.state.remaining_seconds,
            running: self.state.running,
            work_minutes: self.state.work_minutes,
            break_minutes: self.state.break_minutes,
            sessions_completed: self.stats.sessions_completed,
            total_focus_minutes: self.stats.total_focus_minutes,
            sound: self.sound,
            dark_mode: self.dark_mode,
            progress: self.state.fraction_remaining(),
        }
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn settings(&self) -> Settings {
        Settings {
            work_minutes: self.state.work_minutes,
            break_minutes: self.state.break_minutes,
            dark_mode: self.dark_mode,
        }
    }

    pub fn sound(&self) -> SoundSelection {
        self.sound
    }

    /// Subscription ticks are currently accepted from
    pub fn active_subscription(&self) -> Option<SubscriptionId> {
        self.subscription
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn complete_interval(&mut self) -> Result<TickOutcome, PersistenceError> {
        let finished = self.state.mode;
        self.cancel_subscription();
        self.state.running = false;

        let persisted = match finished {
            Mode::Work => {
                let settings = self.settings();
                let minutes = self.state.work_minutes;
                let result = record_completed_work_session(
                    &mut self.stats,
                    &mut self.store,
                    &settings,
                    minutes,
                );
                self.state.begin(Mode::Break);
                result
            }
            Mode::Break => {
                self.state.begin(Mode::Work);
                Ok(())
            }
        };
        info!(
            "{} interval completed, {} of {}s is next",
            finished, self.state.mode, self.state.remaining_seconds
        );

        self.presenter.on_sound_request(self.sound, SoundAction::Stop);
        if finished == Mode::Work {
            self.refresh_dashboard();
        }
        self.refresh_display();
        self.presenter.on_interval_completed(finished);

        persisted.map(|()| TickOutcome::Completed(finished))
    }

    fn set_duration(&mut self, mode: Mode, minutes: u32) -> Result<(), TimerError> {
        if !is_valid_duration(minutes) {
            return Err(TimerError::InvalidDuration(i64::from(minutes)));
        }

        match mode {
            Mode::Work => self.state.work_minutes = minutes,
            Mode::Break => self.state.break_minutes = minutes,
        }
        info!("{} duration set to {} minutes", mode, minutes);

        if self.state.mode == mode {
            let full = self.state.current_duration_seconds();
            if !self.state.running {
                self.state.remaining_seconds = full;
                self.refresh_display();
            } else if self.state.remaining_seconds > full {
                // A shorter interval while running keeps counting from its new length
                self.state.remaining_seconds = full;
                self.refresh_display();
            }
        }

        self.save()?;
        Ok(())
    }

    fn save(&mut self) -> Result<(), PersistenceError> {
        let settings = self.settings();
        save_configuration(&mut self.store, &settings, &self.stats)
    }

    fn cancel_subscription(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.clock.cancel(id);
        }
    }

    fn refresh_display(&mut self) {
        let (minutes, seconds) = self.state.display_parts();
        self.presenter.on_display_update(minutes, seconds);
        self.presenter
            .on_progress_update(self.state.fraction_remaining());
    }

    fn refresh_dashboard(&mut self) {
        self.presenter
            .on_dashboard_update(self.stats.sessions_completed, self.stats.total_focus_minutes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{clock::ManualClock, store::MemoryStore};

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Display(u64, u64),
        Progress(f64),
        Dashboard(u64, u64),
        Completed(Mode),
        Sound(SoundSelection, SoundAction),
    }

    #[derive(Debug, Default)]
    struct Recorder {
        events: Vec<Event>,
    }

    impl Recorder {
        fn completions(&self) -> Vec<Mode> {
            self.events
                .iter()
                .filter_map(|e| match e {
                    Event::Completed(mode) => Some(*mode),
                    _ => None,
                })
                .collect()
        }

        fn sounds(&self) -> Vec<(SoundSelection, SoundAction)> {
            self.events
                .iter()
                .filter_map(|e| match e {
                    Event::Sound(s, a) => Some((*s, *a)),
                    _ => None,
                })
                .collect()
        }
    }

    impl Presenter for Recorder {
        fn on_display_update(&mut self, minutes: u64, seconds: u64) {
            self.events.push(Event::Display(minutes, seconds));
        }

        fn on_progress_update(&mut self, fraction_remaining: f64) {
            self.events.push(Event::Progress(fraction_remaining));
        }

        fn on_dashboard_update(&mut self, sessions_completed: u64, total_focus_minutes: u64) {
            self.events
                .push(Event::Dashboard(sessions_completed, total_focus_minutes));
        }

        fn on_interval_completed(&mut self, finished: Mode) {
            self.events.push(Event::Completed(finished));
        }

        fn on_sound_request(&mut self, selection: SoundSelection, action: SoundAction) {
            self.events.push(Event::Sound(selection, action));
        }
    }

    type TestTimer = PomodoroTimer<MemoryStore, Recorder, ManualClock>;

    fn timer() -> TestTimer {
        PomodoroTimer::new(MemoryStore::new(), Recorder::default(), ManualClock::new())
    }

    fn tick(timer: &mut TestTimer) -> TickOutcome {
        let id = timer.active_subscription().expect("timer should be running");
        timer.on_tick(id).unwrap()
    }

    #[test]
    fn test_initial_state() {
        let timer = timer();
        assert_eq!(timer.state().mode, Mode::Work);
        assert_eq!(timer.state().remaining_seconds, 1500);
        assert!(!timer.state().running);
        assert_eq!(
            timer.presenter().events,
            vec![Event::Dashboard(0, 0), Event::Display(25, 0), Event::Progress(1.0)]
        );
    }

    #[test]
    fn test_start_twice_schedules_once() {
        let mut timer = timer();
        timer.start();
        timer.start();

        assert!(timer.state().running);
        assert_eq!(timer.clock().scheduled().len(), 1);
        assert_eq!(timer.clock().scheduled()[0].1, TICK_PERIOD);
        assert_eq!(timer.clock().active().len(), 1);
        assert_eq!(
            timer.presenter().sounds(),
            vec![(SoundSelection::None, SoundAction::Play)]
        );
    }

    #[test]
    fn test_tick_decrements_by_one() {
        let mut timer = timer();
        timer.start();

        assert_eq!(tick(&mut timer), TickOutcome::Counting { remaining_seconds: 1499 });
        assert_eq!(tick(&mut timer), TickOutcome::Counting { remaining_seconds: 1498 });
        assert_eq!(timer.presenter().events.last(), Some(&Event::Progress(1498.0 / 1500.0)));
    }

    #[test]
    fn test_tick_while_idle_is_ignored() {
        let mut timer = timer();
        assert_eq!(timer.on_tick(SubscriptionId(1)).unwrap(), TickOutcome::Ignored);
        assert_eq!(timer.state().remaining_seconds, 1500);
    }

    #[test]
    fn test_stale_tick_after_pause_is_ignored() {
        let mut timer = timer();
        timer.start();
        let old = timer.active_subscription().unwrap();
        timer.pause();
        timer.start();

        assert_eq!(timer.on_tick(old).unwrap(), TickOutcome::Ignored);
        assert_eq!(timer.state().remaining_seconds, 1500);
        assert_eq!(timer.clock().cancelled(), &[old]);
    }

    #[test]
    fn test_pause_preserves_remaining() {
        let mut timer = timer();
        timer.start();
        for _ in 0..10 {
            tick(&mut timer);
        }
        timer.pause();

        assert!(!timer.state().running);
        assert_eq!(timer.state().remaining_seconds, 1490);
        assert!(timer.clock().active().is_empty());
        assert_eq!(timer.active_subscription(), None);

        timer.start();
        tick(&mut timer);
        assert_eq!(timer.state().remaining_seconds, 1489);
    }

    #[test]
    fn test_pause_when_idle_is_noop() {
        let mut timer = timer();
        timer.pause();
        assert!(timer.presenter().sounds().is_empty());
        assert!(timer.clock().cancelled().is_empty());
    }

    #[test]
    fn test_work_completion_records_session() {
        let mut timer = timer();
        timer.start();
        timer.state.remaining_seconds = 1;

        assert_eq!(tick(&mut timer), TickOutcome::Completed(Mode::Work));

        assert_eq!(timer.state().mode, Mode::Break);
        assert_eq!(timer.state().remaining_seconds, 300);
        assert!(!timer.state().running);
        assert_eq!(timer.active_subscription(), None);
        assert!(timer.clock().active().is_empty());
        assert_eq!(timer.stats().sessions_completed, 1);
        assert_eq!(timer.stats().total_focus_minutes, 25);
        assert_eq!(timer.store().get("sessions").as_deref(), Some("1"));
        assert_eq!(timer.store().get("focusTime").as_deref(), Some("25"));
        assert_eq!(timer.presenter().events.last(), Some(&Event::Completed(Mode::Work)));
    }

    #[test]
    fn test_break_completion_leaves_stats() {
        let mut timer = timer();
        timer.start();
        timer.state.remaining_seconds = 1;
        tick(&mut timer);

        timer.start();
        timer.state.remaining_seconds = 1;
        assert_eq!(tick(&mut timer), TickOutcome::Completed(Mode::Break));

        assert_eq!(timer.state().mode, Mode::Work);
        assert_eq!(timer.state().remaining_seconds, 1500);
        assert_eq!(timer.stats().sessions_completed, 1);
        assert_eq!(timer.stats().total_focus_minutes, 25);
        assert_eq!(timer.presenter().completions(), vec![Mode::Work, Mode::Break]);
    }

    #[test]
    fn test_full_work_interval_takes_1500_ticks() {
        let mut timer = timer();
        timer.start();

        for _ in 0..1499 {
            assert!(matches!(tick(&mut timer), TickOutcome::Counting { .. }));
        }
        assert_eq!(tick(&mut timer), TickOutcome::Completed(Mode::Work));

        assert_eq!(timer.state().mode, Mode::Break);
        assert_eq!(timer.state().remaining_seconds, 300);
        assert_eq!(timer.presenter().completions(), vec![Mode::Work]);
        assert_eq!(timer.stats().sessions_completed, 1);
    }

    #[test]
    fn test_reset_returns_to_idle_work() {
        let mut timer = timer();
        timer.set_work_duration(40).unwrap();
        timer.start();
        tick(&mut timer);
        timer.reset();

        assert_eq!(timer.state().mode, Mode::Work);
        assert_eq!(timer.state().remaining_seconds, 2400);
        assert!(!timer.state().running);
        assert!(timer.clock().active().is_empty());
        assert_eq!(
            timer.presenter().sounds().last(),
            Some(&(SoundSelection::None, SoundAction::Stop))
        );
    }

    #[test]
    fn test_reset_from_break() {
        let mut timer = timer();
        timer.start();
        timer.state.remaining_seconds = 1;
        tick(&mut timer);
        assert_eq!(timer.state().mode, Mode::Break);

        timer.reset();
        assert_eq!(timer.state().mode, Mode::Work);
        assert_eq!(timer.state().remaining_seconds, 1500);
    }

    #[test]
    fn test_set_work_duration_while_idle() {
        let mut timer = timer();
        timer.set_work_duration(10).unwrap();

        assert_eq!(timer.state().remaining_seconds, 600);
        assert_eq!(timer.store().get("workDuration").as_deref(), Some("10"));
        assert_eq!(timer.presenter().events.last(), Some(&Event::Progress(1.0)));
    }

    #[test]
    fn test_long_work_duration_survives_reset() {
        let mut timer = timer();
        timer.set_work_duration(1500).unwrap();
        timer.start();
        tick(&mut timer);
        timer.reset();

        assert_eq!(timer.state().work_minutes, 1500);
        assert_eq!(timer.state().remaining_seconds, 90_000);
        assert_eq!(timer.store().get("workDuration").as_deref(), Some("1500"));
    }

    #[test]
    fn test_set_break_duration_in_work_keeps_countdown() {
        let mut timer = timer();
        timer.set_break_duration(15).unwrap();

        assert_eq!(timer.state().remaining_seconds, 1500);
        assert_eq!(timer.state().break_minutes, 15);
        assert_eq!(timer.store().get("breakDuration").as_deref(), Some("15"));
    }

    #[test]
    fn test_set_duration_while_running_keeps_countdown() {
        let mut timer = timer();
        timer.start();
        tick(&mut timer);
        timer.set_work_duration(30).unwrap();

        assert_eq!(timer.state().remaining_seconds, 1499);
        assert_eq!(timer.state().work_minutes, 30);
    }

    #[test]
    fn test_shorter_duration_while_running_clamps() {
        let mut timer = timer();
        timer.start();
        timer.set_work_duration(1).unwrap();

        assert_eq!(timer.state().remaining_seconds, 60);
        assert!(timer.state().running);
    }

    #[test]
    fn test_invalid_duration_is_rejected() {
        let mut timer = timer();
        assert_eq!(timer.set_work_duration(0), Err(TimerError::InvalidDuration(0)));
        assert_eq!(timer.set_break_duration(0), Err(TimerError::InvalidDuration(0)));

        assert_eq!(timer.state().work_minutes, 25);
        assert_eq!(timer.state().break_minutes, 5);
        assert_eq!(timer.state().remaining_seconds, 1500);
        assert!(timer.store().is_empty());
    }

    #[test]
    fn test_completion_persistence_failure_still_transitions() {
        let mut timer = timer();
        timer.store_mut().set_fail_writes(true);
        timer.start();
        timer.state.remaining_seconds = 1;

        let id = timer.active_subscription().unwrap();
        assert!(timer.on_tick(id).is_err());

        assert_eq!(timer.state().mode, Mode::Break);
        assert!(!timer.state().running);
        assert_eq!(timer.stats().sessions_completed, 1);
        assert_eq!(timer.presenter().completions(), vec![Mode::Work]);

        // Next successful write reconciles
        timer.store_mut().set_fail_writes(false);
        timer.set_dark_mode(true).unwrap();
        assert_eq!(timer.store().get("sessions").as_deref(), Some("1"));
    }

    #[test]
    fn test_duration_persistence_failure_keeps_new_value() {
        let mut timer = timer();
        timer.store_mut().set_fail_writes(true);

        let err = timer.set_work_duration(45).unwrap_err();
        assert!(matches!(err, TimerError::Persistence(_)));
        assert_eq!(timer.state().work_minutes, 45);
        assert_eq!(timer.state().remaining_seconds, 2700);
    }

    #[test]
    fn test_sound_change_while_running() {
        let mut timer = timer();
        timer.set_sound(SoundSelection::Rain);
        timer.start();
        timer.set_sound(SoundSelection::Waves);
        timer.set_sound(SoundSelection::None);

        assert_eq!(
            timer.presenter().sounds(),
            vec![
                (SoundSelection::Rain, SoundAction::Play),
                (SoundSelection::Waves, SoundAction::Play),
                (SoundSelection::None, SoundAction::Pause),
            ]
        );
    }

    #[test]
    fn test_sound_change_while_idle_is_silent() {
        let mut timer = timer();
        timer.set_sound(SoundSelection::Forest);
        assert_eq!(timer.sound(), SoundSelection::Forest);
        assert!(timer.presenter().sounds().is_empty());
    }

    #[test]
    fn test_loads_persisted_configuration() {
        let store = MemoryStore::with_values([
            ("sessions", "4"),
            ("focusTime", "100"),
            ("workDuration", "50"),
            ("breakDuration", "10"),
            ("darkMode", "true"),
        ]);
        let timer = PomodoroTimer::new(store, Recorder::default(), ManualClock::new());

        let snapshot = timer.snapshot();
        assert_eq!(snapshot.remaining_seconds, 3000);
        assert_eq!(snapshot.work_minutes, 50);
        assert_eq!(snapshot.break_minutes, 10);
        assert_eq!(snapshot.sessions_completed, 4);
        assert_eq!(snapshot.total_focus_minutes, 100);
        assert!(snapshot.dark_mode);
        assert_eq!(timer.presenter().events[0], Event::Dashboard(4, 100));
    }

    #[test]
    fn test_dispose_cancels_and_returns_store() {
        let mut timer = timer();
        timer.set_sound(SoundSelection::Rain);
        timer.set_work_duration(20).unwrap();
        timer.start();

        let store = timer.dispose();
        assert_eq!(store.get("workDuration").as_deref(), Some("20"));
    }
}
