//! Timer engine implementation.
//!
//! A single-mode countdown. The engine owns at most one [`TickHandle`]; the
//! timer is running exactly when that handle exists. Every path out of
//! `Running` goes through `stop_ticking`, so no scheduled run outlives the
//! state that started it.
//!
//! ## State Transitions
//!
//! ```text
//! Idle(mode, full) -> Running(mode, r) -> tick -> Running(mode, r - 1)
//!                  -> ... -> expiry -> complete -> Idle(next, full)
//! Running -> pause -> Idle(mode, r)
//! Running -> reset -> Idle(mode, full)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let (ticker, mut ticks) = TokioTicker::channel();
//! let mut engine = TimerEngine::new(ticker);
//! engine.start();
//! while let Some(id) = ticks.recv().await {
//!     if let Tick::Expired(done) = engine.tick(id) { /* apply effects */ }
//! }
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::mode::TimerMode;
use super::ticker::{TickHandle, TickId, TickScheduler};
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
}

/// Outcome of delivering one tick.
#[derive(Debug, Clone, PartialEq)]
pub enum Tick {
    /// The id did not match the live run.
    Ignored,
    /// One second counted down.
    Counted { mode: TimerMode, remaining_secs: u64 },
    /// The countdown reached zero and the session completed.
    Expired(Completion),
}

/// Result of a finished countdown, natural or skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    pub finished: TimerMode,
    pub next: TimerMode,
    /// Focus sessions completed by this engine, including this one.
    pub sessions_completed: u32,
    pub skipped: bool,
    pub at: DateTime<Utc>,
}

impl Completion {
    pub fn was_focus(&self) -> bool {
        self.finished == TimerMode::Focus
    }
}

/// Core timer engine.
pub struct TimerEngine {
    mode: TimerMode,
    remaining_secs: u64,
    sessions_completed: u32,
    scheduler: Box<dyn TickScheduler>,
    ticker: Option<TickHandle>,
    next_tick_id: u64,
}

impl TimerEngine {
    /// Create an idle engine in focus mode with the full focus duration.
    pub fn new(scheduler: impl TickScheduler + 'static) -> Self {
        Self {
            mode: TimerMode::Focus,
            remaining_secs: TimerMode::Focus.duration_secs(),
            sessions_completed: 0,
            scheduler: Box::new(scheduler),
            ticker: None,
            next_tick_id: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        if self.ticker.is_some() {
            TimerState::Running
        } else {
            TimerState::Idle
        }
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn sessions_completed(&self) -> u32 {
        self.sessions_completed
    }

    /// Id of the live tick run, if running.
    pub fn active_tick(&self) -> Option<TickId> {
        self.ticker.as_ref().map(TickHandle::id)
    }

    /// 0.0 .. 1.0 progress within the current mode.
    pub fn progress(&self) -> f64 {
        let total = self.mode.duration_secs();
        if total == 0 {
            return 0.0;
        }
        1.0 - (self.remaining_secs as f64 / total as f64)
    }

    /// Position inside the current four-session cycle.
    pub fn cycle_position(&self) -> u32 {
        self.sessions_completed % super::mode::LONG_BREAK_INTERVAL
    }

    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state(),
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            total_secs: self.mode.duration_secs(),
            progress: self.progress(),
            sessions_completed: self.sessions_completed,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Switch mode. Stops any running countdown and refills the duration.
    pub fn set_mode(&mut self, mode: TimerMode) -> Event {
        self.stop_ticking();
        self.mode = mode;
        self.remaining_secs = mode.duration_secs();
        Event::ModeChanged {
            mode,
            duration_secs: self.remaining_secs,
            at: Utc::now(),
        }
    }

    pub fn start(&mut self) -> Option<Event> {
        if self.ticker.is_some() {
            return None;
        }
        self.next_tick_id += 1;
        let id = TickId(self.next_tick_id);
        self.ticker = Some(self.scheduler.schedule(id));
        debug!(%id, mode = %self.mode, remaining = self.remaining_secs, "timer started");
        Some(Event::TimerStarted {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.stop_ticking() {
            return None;
        }
        Some(Event::TimerPaused {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    pub fn toggle(&mut self) -> Option<Event> {
        if self.is_running() {
            self.pause()
        } else {
            self.start()
        }
    }

    pub fn reset(&mut self) -> Event {
        self.stop_ticking();
        self.remaining_secs = self.mode.duration_secs();
        Event::TimerReset {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        }
    }

    /// Finish the current countdown now, as if it had expired.
    pub fn skip(&mut self) -> Completion {
        self.finish(true)
    }

    /// Deliver one tick. Ticks from a cancelled run are ignored.
    pub fn tick(&mut self, id: TickId) -> Tick {
        if self.active_tick() != Some(id) {
            debug!(%id, live = ?self.active_tick(), "dropping ghost tick");
            return Tick::Ignored;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            return Tick::Expired(self.finish(false));
        }
        Tick::Counted {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn finish(&mut self, skipped: bool) -> Completion {
        self.stop_ticking();
        let finished = self.mode;
        let next = if finished == TimerMode::Focus {
            self.sessions_completed += 1;
            TimerMode::break_after(self.sessions_completed)
        } else {
            TimerMode::Focus
        };
        self.set_mode(next);
        info!(
            %finished,
            %next,
            sessions = self.sessions_completed,
            skipped,
            "timer session complete"
        );
        Completion {
            finished,
            next,
            sessions_completed: self.sessions_completed,
            skipped,
            at: Utc::now(),
        }
    }

    /// Cancel the live tick run. Returns whether one was live.
    fn stop_ticking(&mut self) -> bool {
        match self.ticker.take() {
            Some(handle) => {
                handle.cancel();
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for TimerEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerEngine")
            .field("mode", &self.mode)
            .field("remaining_secs", &self.remaining_secs)
            .field("sessions_completed", &self.sessions_completed)
            .field("ticker", &self.ticker)
            .finish()
    }
}
