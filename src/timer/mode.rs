//! Interval modes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which kind of interval is counting down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Work,
    Break,
}

impl Mode {
    /// Notification text shown when an interval of this mode ends
    pub fn completion_message(&self) -> &'static str {
        match self {
            Mode::Work => "Session completed! Take a break.",
            Mode::Break => "Break is over! Time to focus.",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Work => f.write_str("Work"),
            Mode::Break => f.write_str("Break"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_work() {
        assert_eq!(Mode::default(), Mode::Work);
        assert_eq!(Mode::Break.to_string(), "Break");
    }

    #[test]
    fn test_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Mode::Break).unwrap(), "\"break\"");
    }
}
