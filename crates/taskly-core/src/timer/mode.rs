use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Every fourth completed focus session earns a long break.
pub const LONG_BREAK_INTERVAL: u32 = 4;

/// Minutes credited to `focus_minutes` for one completed focus session.
pub const FOCUS_SESSION_MINUTES: u64 = 25;

/// Points awarded for one completed focus session.
pub const FOCUS_SESSION_POINTS: u64 = 15;

/// The three fixed countdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerMode {
    Focus,
    ShortBreak,
    LongBreak,
}

impl TimerMode {
    pub const ALL: [TimerMode; 3] = [TimerMode::Focus, TimerMode::ShortBreak, TimerMode::LongBreak];

    /// Full countdown length in seconds.
    pub fn duration_secs(self) -> u64 {
        match self {
            TimerMode::Focus => 25 * 60,
            TimerMode::ShortBreak => 5 * 60,
            TimerMode::LongBreak => 15 * 60,
        }
    }

    pub fn is_break(self) -> bool {
        !matches!(self, TimerMode::Focus)
    }

    /// Kebab-case name used on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            TimerMode::Focus => "focus",
            TimerMode::ShortBreak => "short-break",
            TimerMode::LongBreak => "long-break",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimerMode::Focus => "Focus",
            TimerMode::ShortBreak => "Short Break",
            TimerMode::LongBreak => "Long Break",
        }
    }

    /// Break that follows the `sessions_completed`-th focus session.
    pub fn break_after(sessions_completed: u32) -> TimerMode {
        if sessions_completed > 0 && sessions_completed % LONG_BREAK_INTERVAL == 0 {
            TimerMode::LongBreak
        } else {
            TimerMode::ShortBreak
        }
    }
}

impl Default for TimerMode {
    fn default() -> Self {
        TimerMode::Focus
    }
}

impl fmt::Display for TimerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimerMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "focus" => Ok(TimerMode::Focus),
            "short-break" | "shortbreak" | "short" => Ok(TimerMode::ShortBreak),
            "long-break" | "longbreak" | "long" => Ok(TimerMode::LongBreak),
            _ => Err(ValidationError::InvalidMode(s.to_string())),
        }
    }
}
