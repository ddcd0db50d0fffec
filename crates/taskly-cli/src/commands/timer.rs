use std::io::Write;

use clap::Subcommand;
use taskly_core::app::ViewHooks;
use taskly_core::{Event, TimerMode, TokioTicker};

use super::{app_builder, open_app, print_events, print_json, CmdResult};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run the countdown in the foreground (Ctrl-C pauses and exits)
    Run {
        /// Mode to start in (focus, short-break, long-break)
        #[arg(long)]
        mode: Option<TimerMode>,
        /// Sessions to complete before exiting
        #[arg(long, default_value = "1")]
        cycles: u32,
    },
    /// Complete one session immediately
    Skip {
        /// Mode of the session to complete
        #[arg(long, default_value = "focus")]
        mode: TimerMode,
    },
    /// Print the fixed mode durations as JSON
    Durations,
}

/// Redraws a single status line on stderr.
struct Progress;

impl ViewHooks for Progress {
    fn on_tick(&mut self, remaining_secs: u64, mode: TimerMode) {
        let mut err = std::io::stderr();
        let _ = write!(
            err,
            "\r{:<12} {:02}:{:02}",
            mode.label(),
            remaining_secs / 60,
            remaining_secs % 60
        );
        let _ = err.flush();
    }

    fn on_mode_change(&mut self, mode: TimerMode) {
        eprintln!("\rnext: {}", mode.label());
    }

    fn on_level_up(&mut self, level: u32) {
        eprintln!("\rlevel {level} reached");
    }
}

pub fn run(action: TimerAction) -> CmdResult {
    match action {
        TimerAction::Run { mode, cycles } => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .enable_io()
                .build()?;
            runtime.block_on(run_foreground(mode, cycles.max(1)))
        }
        TimerAction::Skip { mode } => {
            let mut app = open_app()?;
            app.set_mode(mode);
            let events = app.skip_timer()?;
            print_events(&events)
        }
        TimerAction::Durations => {
            let durations: serde_json::Map<String, serde_json::Value> = TimerMode::ALL
                .iter()
                .map(|m| (m.as_str().to_string(), m.duration_secs().into()))
                .collect();
            print_json(&durations)
        }
    }
}

async fn run_foreground(mode: Option<TimerMode>, cycles: u32) -> CmdResult {
    let (ticker, mut ticks) = TokioTicker::channel();
    let mut app = app_builder(ticker)?.view(Progress).build()?;
    if let Some(mode) = mode {
        app.set_mode(mode);
    }

    let mut completed = 0;
    if let Some(event) = app.start_timer() {
        println!("{}", serde_json::to_string(&event)?);
    }
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    loop {
        tokio::select! {
            id = ticks.recv() => {
                let Some(id) = id else { break };
                for event in app.tick(id)? {
                    match event {
                        Event::TimerTick { .. } => {}
                        Event::TimerCompleted { .. } => {
                            completed += 1;
                            println!("{}", serde_json::to_string(&event)?);
                        }
                        other => println!("{}", serde_json::to_string(&other)?),
                    }
                }
                if completed >= cycles {
                    break;
                }
                if !app.timer().is_running() {
                    app.start_timer();
                }
            }
            _ = &mut ctrl_c => {
                if let Some(event) = app.pause_timer() {
                    eprintln!();
                    println!("{}", serde_json::to_string(&event)?);
                }
                break;
            }
        }
    }
    Ok(())
}
