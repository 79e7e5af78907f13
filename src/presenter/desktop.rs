//! Presenter for a Linux desktop session

use tracing::warn;

use super::{LogPresenter, Presenter, SoundAction, SoundSelection};
use crate::{
    services::{send_notification, SoundPlayer},
    timer::Mode,
};

/// Notification title
pub const APP_TITLE: &str = "Focus Ring";

/// Logs every event, plays ambient sound and sends completion notifications.
///
/// Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct DesktopPresenter {
    log: LogPresenter,
    player: Option<SoundPlayer>,
    notifications: bool,
}

impl DesktopPresenter {
    /// `player` is `None` when sound is disabled
    pub fn new(player: Option<SoundPlayer>, notifications: bool) -> Self {
        Self {
            log: LogPresenter::new(),
            player,
            notifications,
        }
    }
}

impl Presenter for DesktopPresenter {
    fn on_display_update(&mut self, minutes: u64, seconds: u64) {
        self.log.on_display_update(minutes, seconds);
    }

    fn on_progress_update(&mut self, fraction_remaining: f64) {
        self.log.on_progress_update(fraction_remaining);
    }

    fn on_dashboard_update(&mut self, sessions_completed: u64, total_focus_minutes: u64) {
        self.log
            .on_dashboard_update(sessions_completed, total_focus_minutes);
    }

    fn on_interval_completed(&mut self, finished: Mode) {
        self.log.on_interval_completed(finished);

        if !self.notifications {
            return;
        }
        let body = finished.completion_message();
        tokio::spawn(async move {
            if let Err(e) = send_notification(APP_TITLE, body).await {
                warn!("Failed to send completion notification: {}", e);
            }
        });
    }

    fn on_sound_request(&mut self, selection: SoundSelection, action: SoundAction) {
        self.log.on_sound_request(selection, action);

        let Some(player) = self.player.as_mut() else {
            return;
        };
        match action {
            SoundAction::Play => {
                if let Err(e) = player.play(selection) {
                    warn!("Play failed: {}", e);
                }
            }
            // The player process cannot be suspended; resuming restarts the file
            SoundAction::Pause | SoundAction::Stop => player.stop(),
        }
    }
}
