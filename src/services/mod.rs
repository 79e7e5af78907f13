//! External desktop command integration
//!
//! This module wraps the command-line tools used for desktop notifications
//! and ambient sound playback.

pub mod notification;
pub mod player;

// Re-export main functions
pub use notification::{check_command_available, send_notification};
pub use player::SoundPlayer;
