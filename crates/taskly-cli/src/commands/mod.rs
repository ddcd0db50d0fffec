pub mod ambient;
pub mod config;
pub mod data;
pub mod habit;
pub mod note;
pub mod stats;
pub mod task;
pub mod timer;

use std::io::Write;

use taskly_core::app::{AppBuilder, Notifier, Severity, Tone, ToneError};
use taskly_core::timer::TickScheduler;
use taskly_core::{App, Config, Event, Storage, TimerEngine, TokioTicker};
use tracing::info;

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Toasts on stderr, completion tone as the terminal bell.
pub struct Terminal;

impl Notifier for Terminal {
    fn notify(&mut self, message: &str, severity: Severity) {
        let tag = match severity {
            Severity::Info => "info",
            Severity::Success => "done",
            Severity::Error => "error",
        };
        info!(?severity, text = message, "notification");
        eprintln!("[{tag}] {message}");
    }
}

impl Tone for Terminal {
    fn play(&mut self) -> Result<(), ToneError> {
        let mut err = std::io::stderr();
        err.write_all(b"\x07")
            .and_then(|()| err.flush())
            .map_err(|e| ToneError(e.to_string()))
    }
}

/// App over the default store with terminal collaborators.
pub fn app_builder(ticker: impl TickScheduler + 'static) -> Result<AppBuilder, Box<dyn std::error::Error>> {
    let storage = Storage::open_default()?;
    let config = Config::load()?;
    Ok(App::builder(storage, TimerEngine::new(ticker))
        .config(config)
        .notifier(Terminal)
        .tone(Terminal))
}

/// App for one-shot commands; the timer is never started.
pub fn open_app() -> Result<App, Box<dyn std::error::Error>> {
    let (ticker, _rx) = TokioTicker::channel();
    Ok(app_builder(ticker)?.build()?)
}

pub fn print_json<T: serde::Serialize>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print the events worth showing after a one-shot command.
pub fn print_events(events: &[Event]) -> CmdResult {
    for event in events {
        match event {
            Event::TimerTick { .. } => {}
            other => println!("{}", serde_json::to_string(other)?),
        }
    }
    Ok(())
}
