//! Seams to the outside world: toasts, the completion tone, the view and
//! the wall clock.

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::timer::TimerMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// Fire-and-forget toast surface.
pub trait Notifier {
    fn notify(&mut self, message: &str, severity: Severity);
}

#[derive(Debug, Error)]
#[error("tone failed: {0}")]
pub struct ToneError(pub String);

/// Short completion sound. Best effort; callers log and continue on error.
pub trait Tone {
    fn play(&mut self) -> Result<(), ToneError>;
}

/// Update hooks for whatever renders the state. All default to no-ops.
pub trait ViewHooks {
    fn on_tick(&mut self, _remaining_secs: u64, _mode: TimerMode) {}
    fn on_mode_change(&mut self, _mode: TimerMode) {}
    fn on_level_up(&mut self, _level: u32) {}
}

pub trait Clock {
    fn now(&self) -> DateTime<Local>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Local>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Notifier for Silent {
    fn notify(&mut self, _message: &str, _severity: Severity) {}
}

impl Tone for Silent {
    fn play(&mut self) -> Result<(), ToneError> {
        Ok(())
    }
}

impl ViewHooks for Silent {}
