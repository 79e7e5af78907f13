//! Ambient sound playback through an external player command

use std::{path::PathBuf, process::Stdio};
use tokio::process::{Child, Command};
use tracing::{debug, info};

use crate::presenter::SoundSelection;

/// Runs at most one player process at a time
#[derive(Debug)]
pub struct SoundPlayer {
    program: String,
    sound_dir: PathBuf,
    current: Option<(SoundSelection, Child)>,
}

impl SoundPlayer {
    pub fn new(program: impl Into<String>, sound_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            sound_dir: sound_dir.into(),
            current: None,
        }
    }

    /// Selection currently playing, if the player process is still alive
    pub fn playing(&mut self) -> Option<SoundSelection> {
        match &mut self.current {
            Some((selection, child)) => match child.try_wait() {
                Ok(None) => Some(*selection),
                _ => None,
            },
            None => None,
        }
    }

    /// Start playing `selection`, replacing whatever is playing
    pub fn play(&mut self, selection: SoundSelection) -> Result<(), String> {
        let Some(file_name) = selection.file_name() else {
            self.stop();
            return Ok(());
        };

        if self.playing() == Some(selection) {
            debug!("{} already playing", selection);
            return Ok(());
        }
        self.stop();

        let path = self.sound_dir.join(file_name);
        let child = Command::new(&self.program)
            .arg(&path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| format!("Failed to execute {} {}: {}", self.program, path.display(), e))?;

        info!("Playing {} ({})", selection, path.display());
        self.current = Some((selection, child));
        Ok(())
    }

    /// Kill the player process, if any
    pub fn stop(&mut self) {
        if let Some((selection, mut child)) = self.current.take() {
            if let Err(e) = child.start_kill() {
                debug!("Player for {} already gone: {}", selection, e);
            } else {
                info!("Stopped {}", selection);
            }
        }
    }
}

impl Drop for SoundPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}
