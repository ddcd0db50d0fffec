use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{TimerMode, TimerState};

/// Every state change in the system produces an Event.
/// Front-ends print or render them; nothing reads them back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        mode: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerTick {
        mode: TimerMode,
        remaining_secs: u64,
    },
    TimerCompleted {
        finished: TimerMode,
        next: TimerMode,
        sessions_completed: u32,
        skipped: bool,
        at: DateTime<Utc>,
    },
    ModeChanged {
        mode: TimerMode,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    PointsAwarded {
        points: u64,
        total: u64,
        at: DateTime<Utc>,
    },
    LevelUp {
        level: u32,
        name: String,
        at: DateTime<Utc>,
    },
    StreakUpdated {
        streak: u32,
        best_streak: u32,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        mode: TimerMode,
        remaining_secs: u64,
        total_secs: u64,
        progress: f64,
        sessions_completed: u32,
        at: DateTime<Utc>,
    },
    DataReset {
        keys_removed: usize,
        at: DateTime<Utc>,
    },
}
