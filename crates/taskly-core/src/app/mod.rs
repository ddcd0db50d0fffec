//! The owned application state.
//!
//! [`App`] composes the timer engine, the stats record, the task/note/habit
//! collections and the store, and applies the cross-cutting side effects
//! (points, streaks, toasts, tone, view hooks) of every user action. There is
//! exactly one per running process and it is passed around explicitly.

mod ports;

pub use ports::{Clock, FixedClock, Notifier, Severity, Silent, SystemClock, Tone, ToneError, ViewHooks};

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;
use crate::events::Event;
use crate::habit::HabitList;
use crate::note::{NoteBook, NoteDraft, NoteSave};
use crate::stats::{tier, StatsRecord};
use crate::storage::{Config, Storage, HABITS_KEY, NOTES_KEY, STATS_KEY, TASKS_KEY};
use crate::task::{TaskDraft, TaskList, TaskPatch, TaskToggle};
use crate::timer::{Completion, Tick, TickId, TimerEngine, TimerMode, FOCUS_SESSION_MINUTES, FOCUS_SESSION_POINTS};

pub const TASK_CREATED_POINTS: u64 = 5;
pub const TASK_COMPLETED_POINTS: u64 = 10;
pub const NOTE_CREATED_POINTS: u64 = 3;
pub const HABIT_CHECKED_POINTS: u64 = 5;

/// Everything the user has, as written by `data export`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    pub tasks: TaskList,
    pub notes: NoteBook,
    pub habits: HabitList,
    pub stats: StatsRecord,
    pub export_date: DateTime<Local>,
}

pub struct AppBuilder {
    storage: Storage,
    timer: TimerEngine,
    config: Config,
    notifier: Box<dyn Notifier>,
    tone: Box<dyn Tone>,
    view: Box<dyn ViewHooks>,
    clock: Box<dyn Clock>,
}

impl AppBuilder {
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    pub fn tone(mut self, tone: impl Tone + 'static) -> Self {
        self.tone = Box::new(tone);
        self
    }

    pub fn view(mut self, view: impl ViewHooks + 'static) -> Self {
        self.view = Box::new(view);
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Load persisted records (defaults when absent) and assemble the app.
    pub fn build(self) -> Result<App> {
        let stats = self
            .storage
            .load_or_default::<StatsRecord>(STATS_KEY)?
            .normalized();
        let tasks = self.storage.load_or_default(TASKS_KEY)?;
        let notes = self.storage.load_or_default(NOTES_KEY)?;
        let habits = self.storage.load_or_default(HABITS_KEY)?;
        Ok(App {
            storage: self.storage,
            config: self.config,
            stats,
            tasks,
            notes,
            habits,
            timer: self.timer,
            notifier: self.notifier,
            tone: self.tone,
            view: self.view,
            clock: self.clock,
        })
    }
}

pub struct App {
    storage: Storage,
    config: Config,
    stats: StatsRecord,
    tasks: TaskList,
    notes: NoteBook,
    habits: HabitList,
    timer: TimerEngine,
    notifier: Box<dyn Notifier>,
    tone: Box<dyn Tone>,
    view: Box<dyn ViewHooks>,
    clock: Box<dyn Clock>,
}

impl App {
    /// Start building an app over `storage`. Collaborators default to
    /// [`Silent`] and [`SystemClock`].
    pub fn builder(storage: Storage, timer: TimerEngine) -> AppBuilder {
        AppBuilder {
            storage,
            timer,
            config: Config::default(),
            notifier: Box::new(Silent),
            tone: Box::new(Silent),
            view: Box::new(Silent),
            clock: Box::new(SystemClock),
        }
    }

    pub fn timer(&self) -> &TimerEngine {
        &self.timer
    }

    pub fn stats(&self) -> &StatsRecord {
        &self.stats
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    pub fn notes(&self) -> &NoteBook {
        &self.notes
    }

    pub fn habits(&self) -> &HabitList {
        &self.habits
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn now(&self) -> DateTime<Local> {
        self.clock.now()
    }

    // ── Timer ────────────────────────────────────────────────────────

    pub fn start_timer(&mut self) -> Option<Event> {
        self.timer.start()
    }

    pub fn pause_timer(&mut self) -> Option<Event> {
        self.timer.pause()
    }

    pub fn toggle_timer(&mut self) -> Option<Event> {
        self.timer.toggle()
    }

    pub fn reset_timer(&mut self) -> Event {
        let event = self.timer.reset();
        self.view.on_tick(self.timer.remaining_secs(), self.timer.mode());
        event
    }

    pub fn set_mode(&mut self, mode: TimerMode) -> Event {
        let event = self.timer.set_mode(mode);
        self.view.on_mode_change(mode);
        event
    }

    /// Deliver a scheduler tick. Ghost ticks produce no events.
    pub fn tick(&mut self, id: TickId) -> Result<Vec<Event>> {
        match self.timer.tick(id) {
            Tick::Ignored => Ok(Vec::new()),
            Tick::Counted { mode, remaining_secs } => {
                self.view.on_tick(remaining_secs, mode);
                Ok(vec![Event::TimerTick { mode, remaining_secs }])
            }
            Tick::Expired(completion) => self.on_completion(completion),
        }
    }

    /// Complete the current session now with full completion effects.
    pub fn skip_timer(&mut self) -> Result<Vec<Event>> {
        let completion = self.timer.skip();
        self.on_completion(completion)
    }

    /// Apply the side effects of a finished session.
    ///
    /// The engine has already moved to the next mode. A failed stats write is
    /// returned after every other effect has run; nothing is rolled back.
    fn on_completion(&mut self, completion: Completion) -> Result<Vec<Event>> {
        let mut events = vec![Event::TimerCompleted {
            finished: completion.finished,
            next: completion.next,
            sessions_completed: completion.sessions_completed,
            skipped: completion.skipped,
            at: completion.at,
        }];

        if completion.was_focus() {
            let today = self.clock.today();
            self.stats.record_focus_session(FOCUS_SESSION_MINUTES);
            self.stats.record_weekday_of(today);
            self.award(FOCUS_SESSION_POINTS, &mut events)?;
            self.toast("Focus session complete! Take a break.", Severity::Success);
        } else {
            self.toast("Break over. Time to focus!", Severity::Info);
        }

        self.play_tone();
        self.view.on_mode_change(completion.next);
        events.push(Event::ModeChanged {
            mode: completion.next,
            duration_secs: completion.next.duration_secs(),
            at: completion.at,
        });

        if completion.was_focus() {
            self.persist_stats()?;
        }
        Ok(events)
    }

    fn play_tone(&mut self) {
        if !self.config.sound.tone_enabled {
            return;
        }
        if let Err(e) = self.tone.play() {
            warn!(error = %e, "completion tone failed");
        }
    }

    fn toast(&mut self, message: &str, severity: Severity) {
        if self.config.notifications.enabled {
            self.notifier.notify(message, severity);
        }
    }

    /// Award points; on a level change, notify the view and the user.
    fn award(&mut self, points: u64, events: &mut Vec<Event>) -> Result<()> {
        let level_up = self.stats.award_points(points)?;
        let at = Utc::now();
        events.push(Event::PointsAwarded {
            points,
            total: self.stats.points(),
            at,
        });
        if let Some(level) = level_up {
            let name = tier(level).name;
            self.view.on_level_up(level);
            self.toast(&format!("Level up! You reached level {level}: {name}"), Severity::Success);
            events.push(Event::LevelUp {
                level,
                name: name.to_string(),
                at,
            });
        }
        Ok(())
    }

    fn record_activity(&mut self, events: &mut Vec<Event>) {
        let today = self.clock.today();
        if self.stats.record_activity(today) {
            events.push(Event::StreakUpdated {
                streak: self.stats.streak(),
                best_streak: self.stats.best_streak(),
                at: Utc::now(),
            });
        }
    }

    /// Write the stats record. Callers may retry after a failed write.
    pub fn persist_stats(&mut self) -> Result<()> {
        self.storage.save(STATS_KEY, &self.stats)
    }

    fn persist_tasks(&mut self) -> Result<()> {
        self.storage.save(TASKS_KEY, &self.tasks)
    }

    fn persist_notes(&mut self) -> Result<()> {
        self.storage.save(NOTES_KEY, &self.notes)
    }

    fn persist_habits(&mut self) -> Result<()> {
        self.storage.save(HABITS_KEY, &self.habits)
    }

    // ── Tasks ────────────────────────────────────────────────────────

    /// Add a task. Returns its id and the events raised.
    pub fn add_task(&mut self, title: &str, draft: TaskDraft) -> Result<(String, Vec<Event>)> {
        let now = self.clock.now();
        let id = self.tasks.add(title, draft, now)?.id.clone();
        let mut events = Vec::new();
        self.award(TASK_CREATED_POINTS, &mut events)?;
        self.persist_tasks()?;
        self.persist_stats()?;
        Ok((id, events))
    }

    pub fn toggle_task(&mut self, id: &str) -> Result<(TaskToggle, Vec<Event>)> {
        let now = self.clock.now();
        let toggle = self.tasks.toggle(id, now)?;
        let mut events = Vec::new();
        if toggle.completed {
            self.stats.record_task_completed();
            self.stats.record_weekday_of(now.date_naive());
            self.award(TASK_COMPLETED_POINTS, &mut events)?;
            self.record_activity(&mut events);
            self.toast(&format!("Task completed! +{TASK_COMPLETED_POINTS} points"), Severity::Success);
            self.persist_stats()?;
        }
        self.persist_tasks()?;
        Ok((toggle, events))
    }

    pub fn update_task(&mut self, id: &str, patch: TaskPatch) -> Result<()> {
        self.tasks.update(id, patch)?;
        self.persist_tasks()
    }

    pub fn delete_task(&mut self, id: &str) -> Result<()> {
        let task = self.tasks.delete(id)?;
        info!(id = %task.id, "task deleted");
        self.persist_tasks()
    }

    pub fn add_subtask(&mut self, id: &str, title: &str) -> Result<()> {
        self.tasks.add_subtask(id, title)?;
        self.persist_tasks()
    }

    pub fn toggle_subtask(&mut self, id: &str, index: usize) -> Result<bool> {
        let done = self.tasks.toggle_subtask(id, index)?;
        self.persist_tasks()?;
        Ok(done)
    }

    pub fn delete_subtask(&mut self, id: &str, index: usize) -> Result<()> {
        self.tasks.delete_subtask(id, index)?;
        self.persist_tasks()
    }

    // ── Notes ────────────────────────────────────────────────────────

    pub fn save_note(&mut self, id: Option<&str>, draft: NoteDraft) -> Result<(NoteSave, Vec<Event>)> {
        let saved = self.notes.save(id, draft, self.clock.today())?;
        let mut events = Vec::new();
        match &saved {
            NoteSave::Discarded => return Ok((saved, events)),
            NoteSave::Created(_) => {
                self.award(NOTE_CREATED_POINTS, &mut events)?;
                self.persist_stats()?;
            }
            NoteSave::Updated => {}
        }
        self.persist_notes()?;
        Ok((saved, events))
    }

    pub fn toggle_pin(&mut self, id: &str) -> Result<bool> {
        let pinned = self.notes.toggle_pin(id)?;
        self.persist_notes()?;
        Ok(pinned)
    }

    pub fn delete_note(&mut self, id: &str) -> Result<()> {
        self.notes.delete(id)?;
        self.persist_notes()
    }

    // ── Habits ───────────────────────────────────────────────────────

    pub fn add_habit(&mut self, name: &str, emoji: Option<&str>, goal: u32) -> Result<String> {
        let id = self.habits.add(name, emoji, goal, self.clock.today())?.id.clone();
        self.persist_habits()?;
        Ok(id)
    }

    /// Check or uncheck today. Checking awards points and counts toward the streak.
    pub fn check_habit(&mut self, id: &str) -> Result<(bool, Vec<Event>)> {
        let checked = self.habits.toggle(id, self.clock.today())?;
        let mut events = Vec::new();
        if checked {
            self.award(HABIT_CHECKED_POINTS, &mut events)?;
            self.record_activity(&mut events);
            self.persist_stats()?;
        }
        self.persist_habits()?;
        Ok((checked, events))
    }

    pub fn delete_habit(&mut self, id: &str) -> Result<()> {
        self.habits.delete(id)?;
        self.persist_habits()
    }

    // ── Data ─────────────────────────────────────────────────────────

    pub fn export(&self) -> ExportBundle {
        ExportBundle {
            tasks: self.tasks.clone(),
            notes: self.notes.clone(),
            habits: self.habits.clone(),
            stats: self.stats.clone(),
            export_date: self.clock.now(),
        }
    }

    /// Delete every persisted record and return to first-launch defaults.
    ///
    /// Preferences return to their defaults in memory; the caller owns the
    /// config file and saves [`App::config`] afterwards. The timer's
    /// in-process session count is left alone.
    pub fn reset_all(&mut self) -> Result<Event> {
        let keys_removed = self.storage.clear()?;
        self.stats = StatsRecord::default();
        self.tasks = TaskList::new();
        self.notes = NoteBook::new();
        self.habits = HabitList::new();
        self.config = Config::default();
        info!(keys_removed, "all data reset");
        Ok(Event::DataReset {
            keys_removed,
            at: Utc::now(),
        })
    }
}
