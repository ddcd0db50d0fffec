//! # Taskly Core Library
//!
//! This library provides the core logic for Taskly, a local-first personal
//! productivity tool: tasks, notes, habits, a pomodoro timer, ambient sounds
//! and a small gamification layer. Everything is available through the
//! standalone `taskly` CLI, which is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a countdown state machine driven by an owned,
//!   cancellable tick handle. Ticks from a cancelled run are ignored.
//! - **Stats**: points, levels, streaks and achievements in one persisted record
//! - **Storage**: a key/value [`Store`] (SQLite or in-memory) with typed JSON
//!   records, plus TOML configuration
//! - **App**: the explicitly owned composition that applies side effects
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`StatsRecord`]: Gamification state
//! - [`App`]: Owned application state and side-effect routing
//! - [`Storage`]: Namespaced record persistence
//! - [`Config`]: Application configuration management

pub mod ambient;
pub mod app;
pub mod error;
pub mod events;
pub mod habit;
pub mod note;
pub mod stats;
pub mod storage;
pub mod task;
pub mod timer;

pub use ambient::{AmbientPlayer, AmbientSound, AudioBackend};
pub use app::{App, AppBuilder, Clock, ExportBundle, FixedClock, Notifier, Severity, SystemClock, Tone, ToneError, ViewHooks};
pub use error::{ConfigError, CoreError, Result, StorageError, ValidationError};
pub use events::Event;
pub use habit::{Habit, HabitList};
pub use note::{Note, NoteBook, NoteDraft, NoteSave};
pub use stats::{Achievement, AchievementStatus, Level, LevelProgress, StatsRecord};
pub use storage::{Config, MemoryStore, SqliteStore, Storage, Store};
pub use task::{Priority, Recurrence, Task, TaskDraft, TaskFilter, TaskList, TaskPatch};
pub use timer::{TickId, TimerEngine, TimerMode, TimerState, TokioTicker};
