//! The persisted gamification record.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::level::level_for;
use crate::error::ValidationError;

/// Points, level, streaks and activity counters.
///
/// `level` is derived from `points` and can only change through
/// [`StatsRecord::award_points`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatsRecord {
    points: u64,
    level: u32,
    pub(super) streak: u32,
    pub(super) best_streak: u32,
    pub(super) last_active_date: Option<NaiveDate>,
    completed_task_count: u64,
    pomodoro_session_count: u64,
    focus_minutes: u64,
    /// Completion-type events per weekday, Sunday first.
    weekly_activity: [u64; 7],
}

impl Default for StatsRecord {
    fn default() -> Self {
        Self {
            points: 0,
            level: 1,
            streak: 0,
            best_streak: 0,
            last_active_date: None,
            completed_task_count: 0,
            pomodoro_session_count: 0,
            focus_minutes: 0,
            weekly_activity: [0; 7],
        }
    }
}

impl StatsRecord {
    pub fn points(&self) -> u64 {
        self.points
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn best_streak(&self) -> u32 {
        self.best_streak
    }

    pub fn last_active_date(&self) -> Option<NaiveDate> {
        self.last_active_date
    }

    pub fn completed_task_count(&self) -> u64 {
        self.completed_task_count
    }

    pub fn pomodoro_session_count(&self) -> u64 {
        self.pomodoro_session_count
    }

    pub fn focus_minutes(&self) -> u64 {
        self.focus_minutes
    }

    pub fn weekly_activity(&self) -> &[u64; 7] {
        &self.weekly_activity
    }

    /// Add `n` points and recompute the level.
    ///
    /// Returns the new level when it changed. Every call awards; callers
    /// must call once per qualifying event.
    pub fn award_points(&mut self, n: u64) -> Result<Option<u32>, ValidationError> {
        if n == 0 {
            return Err(ValidationError::ZeroPoints);
        }
        let before = self.level;
        self.points = self.points.saturating_add(n);
        self.level = level_for(self.points);
        if self.level != before {
            info!(level = self.level, points = self.points, "level up");
            Ok(Some(self.level))
        } else {
            Ok(None)
        }
    }

    pub fn record_task_completed(&mut self) {
        self.completed_task_count += 1;
    }

    pub fn record_focus_session(&mut self, minutes: u64) {
        self.pomodoro_session_count += 1;
        self.focus_minutes += minutes;
    }

    /// Count one completion-type event on `weekday`.
    pub fn record_weekday(&mut self, weekday: Weekday) {
        self.weekly_activity[weekday.num_days_from_sunday() as usize] += 1;
    }

    pub fn record_weekday_of(&mut self, date: NaiveDate) {
        self.record_weekday(date.weekday());
    }

    /// Restore derived fields after loading a record from storage.
    pub fn normalized(mut self) -> Self {
        self.level = level_for(self.points);
        self.best_streak = self.best_streak.max(self.streak);
        self
    }
}
