//! Integration tests for the timer driven by real tokio ticks.
//!
//! Time is paused, so the runtime auto-advances whenever every task is idle
//! and a full 25 minute session runs instantly.

use std::time::Duration;

use taskly_core::{App, Event, Storage, TimerEngine, TimerMode, TokioTicker};
use tokio::time::timeout;

fn app() -> (App, tokio::sync::mpsc::UnboundedReceiver<taskly_core::TickId>) {
    let (ticker, rx) = TokioTicker::channel();
    let app = App::builder(Storage::in_memory(), TimerEngine::new(ticker))
        .build()
        .unwrap();
    (app, rx)
}

#[tokio::test(start_paused = true)]
async fn test_focus_session_runs_to_completion() {
    let (mut app, mut rx) = app();
    app.start_timer().unwrap();

    let mut ticks = 0u64;
    let completed = loop {
        let id = rx.recv().await.unwrap();
        let events = app.tick(id).unwrap();
        if let Some(done) = events.iter().find(|e| matches!(e, Event::TimerCompleted { .. })) {
            break done.clone();
        }
        ticks += 1;
    };

    assert_eq!(ticks, TimerMode::Focus.duration_secs() - 1);
    assert!(matches!(
        completed,
        Event::TimerCompleted {
            finished: TimerMode::Focus,
            next: TimerMode::ShortBreak,
            sessions_completed: 1,
            skipped: false,
            ..
        }
    ));
    assert!(!app.timer().is_running());
    assert_eq!(app.timer().remaining_secs(), 300);
    assert_eq!(app.stats().pomodoro_session_count(), 1);
    assert_eq!(app.stats().focus_minutes(), 25);
}

#[tokio::test(start_paused = true)]
async fn test_pause_stops_ticks_and_resume_continues() {
    let (mut app, mut rx) = app();
    app.start_timer().unwrap();
    for _ in 0..10 {
        let id = rx.recv().await.unwrap();
        app.tick(id).unwrap();
    }
    assert_eq!(app.timer().remaining_secs(), 1490);

    app.pause_timer().unwrap();
    // Nothing delivered after a pause may move the countdown.
    while let Ok(Some(id)) = timeout(Duration::from_secs(5), rx.recv()).await {
        assert!(app.tick(id).unwrap().is_empty());
    }
    assert_eq!(app.timer().remaining_secs(), 1490);

    app.start_timer().unwrap();
    let id = rx.recv().await.unwrap();
    app.tick(id).unwrap();
    assert_eq!(app.timer().remaining_secs(), 1489);
}

#[tokio::test(start_paused = true)]
async fn test_mode_switch_mid_run_discards_old_ticks() {
    let (mut app, mut rx) = app();
    app.start_timer().unwrap();
    let stale = rx.recv().await.unwrap();
    app.tick(stale).unwrap();

    app.set_mode(TimerMode::LongBreak);
    app.start_timer().unwrap();
    assert!(app.tick(stale).unwrap().is_empty());
    assert_eq!(app.timer().remaining_secs(), 900);

    let fresh = rx.recv().await.unwrap();
    assert_ne!(fresh, stale);
    app.tick(fresh).unwrap();
    assert_eq!(app.timer().remaining_secs(), 899);
}

#[tokio::test(start_paused = true)]
async fn test_reset_restores_full_duration() {
    let (mut app, mut rx) = app();
    app.set_mode(TimerMode::ShortBreak);
    app.start_timer().unwrap();
    for _ in 0..3 {
        let id = rx.recv().await.unwrap();
        app.tick(id).unwrap();
    }
    app.reset_timer();
    assert_eq!(app.timer().remaining_secs(), 300);
    assert!(!app.timer().is_running());
}
