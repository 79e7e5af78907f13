//! Configuration and CLI argument handling

use std::path::PathBuf;
use clap::Parser;

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "focus-ring")]
#[command(about = "A Pomodoro timer daemon with persisted focus statistics")]
#[command(version)]
pub struct Config {
    /// Port to bind the control API to
    #[arg(short, long, default_value = "25055")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Store file for durations and statistics
    /// [default: <data dir>/focus-ring/store.json]
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Directory holding the ambient sound files
    #[arg(long, default_value = "sounds")]
    pub sound_dir: PathBuf,

    /// Command used to play ambient sound files
    #[arg(long, default_value = "paplay")]
    pub player: String,

    /// Disable ambient sound playback
    #[arg(long)]
    pub no_sound: bool,

    /// Disable desktop notifications
    #[arg(long)]
    pub no_notify: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Store path, falling back to the platform data directory
    pub fn store_path(&self) -> PathBuf {
        match &self.store {
            Some(path) => path.clone(),
            None => dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("focus-ring")
                .join("store.json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["focus-ring"]).unwrap();
        assert_eq!(config.address(), "127.0.0.1:25055");
        assert_eq!(config.log_level(), "info");
        assert_eq!(config.player, "paplay");
        assert!(!config.no_sound);
        assert!(config.store_path().ends_with("focus-ring/store.json"));
    }

    #[test]
    fn test_overrides() {
        let config = Config::try_parse_from([
            "focus-ring",
            "-p",
            "9000",
            "--store",
            "/tmp/pomo.json",
            "--no-notify",
            "-v",
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.store_path(), PathBuf::from("/tmp/pomo.json"));
        assert!(config.no_notify);
        assert_eq!(config.log_level(), "debug");
    }
}
