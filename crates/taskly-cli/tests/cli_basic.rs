//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own temp data directory.

mod common;

use common::{assert_contains, created_id, parse_json, run_cli_failure, run_cli_success, spawn_cli};
use serde_json::Value;

#[test]
fn test_task_lifecycle() {
    let home = tempfile::tempdir().unwrap();
    let home = home.path();

    let out = run_cli_success(home, &["task", "add", "Write tests", "--priority", "high"]);
    let id = created_id(&out);

    let listed: Vec<Value> = parse_json(&run_cli_success(home, &["task", "list", "--json"]));
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["priority"], "high");

    let out = run_cli_success(home, &["task", "done", &id]);
    assert_contains(&out, "Task completed");

    let open: Vec<Value> = parse_json(&run_cli_success(home, &["task", "list", "--json"]));
    assert!(open.is_empty());
    let done: Vec<Value> = parse_json(&run_cli_success(home, &["task", "list", "--filter", "completed", "--json"]));
    assert_eq!(done.len(), 1);

    let stats: Value = parse_json(&run_cli_success(home, &["stats", "show"]));
    assert_eq!(stats["stats"]["points"], 15);
    assert_eq!(stats["stats"]["completedTaskCount"], 1);
    assert_eq!(stats["stats"]["streak"], 1);
}

#[test]
fn test_subtasks() {
    let home = tempfile::tempdir().unwrap();
    let home = home.path();
    let id = created_id(&run_cli_success(home, &["task", "add", "Pack"]));

    run_cli_success(home, &["task", "subtask-add", &id, "socks"]);
    let out = run_cli_success(home, &["task", "subtask-toggle", &id, "0"]);
    assert_contains(&out, "done");

    let listed: Vec<Value> = parse_json(&run_cli_success(home, &["task", "list", "--json"]));
    assert_eq!(listed[0]["subtasks"][0]["done"], true);
    run_cli_failure(home, &["task", "subtask-toggle", &id, "5"]);
}

#[test]
fn test_empty_title_rejected() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli_failure(home.path(), &["task", "add", "   "]);
    assert_eq!(code, 1);
    assert_contains(&stderr, "error:");
}

#[test]
fn test_timer_skip_awards_focus_session() {
    let home = tempfile::tempdir().unwrap();
    let home = home.path();

    let out = run_cli_success(home, &["timer", "skip"]);
    assert_contains(&out, "\"type\":\"timer_completed\"");
    assert_contains(&out, "\"next\":\"short_break\"");

    let stats: Value = parse_json(&run_cli_success(home, &["stats", "show"]));
    assert_eq!(stats["stats"]["pomodoroSessionCount"], 1);
    assert_eq!(stats["stats"]["focusMinutes"], 25);
    assert_eq!(stats["stats"]["points"], 15);
}

#[test]
fn test_timer_skip_break_leaves_stats() {
    let home = tempfile::tempdir().unwrap();
    let home = home.path();

    let out = run_cli_success(home, &["timer", "skip", "--mode", "short-break"]);
    assert_contains(&out, "\"next\":\"focus\"");
    let stats: Value = parse_json(&run_cli_success(home, &["stats", "show"]));
    assert_eq!(stats["stats"]["points"], 0);
}

#[test]
fn test_invalid_mode_rejected() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, _) = run_cli_failure(home.path(), &["timer", "skip", "--mode", "nap"]);
    assert_contains(&stderr, "nap");
}

#[test]
fn test_timer_durations() {
    let home = tempfile::tempdir().unwrap();
    let durations: Value = parse_json(&run_cli_success(home.path(), &["timer", "durations"]));
    assert_eq!(durations["focus"], 1500);
    assert_eq!(durations["short-break"], 300);
    assert_eq!(durations["long-break"], 900);
}

#[test]
fn test_notes_and_habits() {
    let home = tempfile::tempdir().unwrap();
    let home = home.path();

    let note = created_id(&run_cli_success(home, &["note", "add", "Ideas", "--content", "more tests"]));
    run_cli_success(home, &["note", "pin", &note]);
    let notes: Vec<Value> = parse_json(&run_cli_success(home, &["note", "list", "--json"]));
    assert_eq!(notes[0]["pinned"], true);

    let habit = created_id(&run_cli_success(home, &["habit", "add", "Read", "--emoji", "📖"]));
    let out = run_cli_success(home, &["habit", "check", &habit]);
    assert_contains(&out, "checked");

    let stats: Value = parse_json(&run_cli_success(home, &["stats", "show"]));
    assert_eq!(stats["stats"]["points"], 3 + 5);
}

#[test]
fn test_stats_tables() {
    let home = tempfile::tempdir().unwrap();
    let home = home.path();

    let levels: Vec<Value> = parse_json(&run_cli_success(home, &["stats", "levels"]));
    assert_eq!(levels.len(), 7);
    assert_eq!(levels[1]["minPoints"], 100);

    let achievements: Vec<Value> = parse_json(&run_cli_success(home, &["stats", "achievements"]));
    assert!(achievements.iter().all(|a| a["unlocked"] == false));

    let weekly: Value = parse_json(&run_cli_success(home, &["stats", "weekly"]));
    assert_eq!(weekly.as_object().unwrap().len(), 7);
}

#[test]
fn test_config_roundtrip() {
    let home = tempfile::tempdir().unwrap();
    let home = home.path();

    assert_eq!(run_cli_success(home, &["config", "get", "theme"]).trim(), "dark");
    run_cli_success(home, &["config", "set", "ambient.volume", "35"]);
    assert_eq!(run_cli_success(home, &["config", "get", "ambient.volume"]).trim(), "35");
    run_cli_failure(home, &["config", "set", "ambient.volume", "loud"]);
    run_cli_failure(home, &["config", "get", "no.such.key"]);

    run_cli_success(home, &["config", "reset"]);
    assert_eq!(run_cli_success(home, &["config", "get", "ambient.volume"]).trim(), "60");
}

#[test]
fn test_export_and_reset() {
    let home = tempfile::tempdir().unwrap();
    let home = home.path();
    run_cli_success(home, &["task", "add", "Keep me"]);

    let out_file = home.join("export.json");
    run_cli_success(home, &["data", "export", "--out", out_file.to_str().unwrap()]);
    let exported: Value = parse_json(&std::fs::read_to_string(&out_file).unwrap());
    assert_eq!(exported["tasks"][0]["title"], "Keep me");
    assert!(exported["exportDate"].is_string());

    run_cli_failure(home, &["data", "reset"]);
    let out = run_cli_success(home, &["data", "reset", "--yes"]);
    assert_contains(&out, "data_reset");

    let tasks: Vec<Value> = parse_json(&run_cli_success(home, &["task", "list", "--json"]));
    assert!(tasks.is_empty());
}

#[test]
fn test_reset_restores_default_settings() {
    let home = tempfile::tempdir().unwrap();
    let home = home.path();
    run_cli_success(home, &["config", "set", "theme", "light"]);
    run_cli_success(home, &["config", "set", "sound.tone_enabled", "false"]);

    run_cli_success(home, &["data", "reset", "--yes"]);
    assert_eq!(run_cli_success(home, &["config", "get", "theme"]).trim(), "dark");
    assert_eq!(run_cli_success(home, &["config", "get", "sound.tone_enabled"]).trim(), "true");
}

#[test]
fn test_ambient_list() {
    let home = tempfile::tempdir().unwrap();
    let listed: Value = parse_json(&run_cli_success(home.path(), &["ambient", "list"]));
    assert_eq!(listed["volume"], 60);
    assert_eq!(listed["sounds"].as_array().unwrap().len(), 3);
    assert_eq!(listed["player"], "mpv");
}

#[test]
fn test_ambient_volume_is_clamped_and_stored() {
    let home = tempfile::tempdir().unwrap();
    let home = home.path();
    let out: Value = parse_json(&run_cli_success(home, &["ambient", "volume", "150"]));
    assert_eq!(out["volume"], 100);
    assert_eq!(run_cli_success(home, &["config", "get", "ambient.volume"]).trim(), "100");
}

#[test]
fn test_ambient_play_fails_when_no_source_starts() {
    let home = tempfile::tempdir().unwrap();
    let missing = home.path().join("no-such-player");
    let (stdout, stderr, code) = run_cli_failure(
        home.path(),
        &["ambient", "play", "rain", "--player", missing.to_str().unwrap(), "--duration", "1"],
    );
    assert_eq!(code, 1);
    assert!(stdout.is_empty());
    assert_contains(&stderr, "every source failed");
}

#[test]
fn test_ambient_play_rejects_unknown_sound() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, _) = run_cli_failure(home.path(), &["ambient", "play", "thunder"]);
    assert_contains(&stderr, "thunder");
}

#[cfg(unix)]
#[test]
fn test_timer_run_interrupt_pauses_after_ticks() {
    let home = tempfile::tempdir().unwrap();
    let child = spawn_cli(home.path(), &["timer", "run"]);
    std::thread::sleep(std::time::Duration::from_millis(2500));

    let status = std::process::Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .unwrap();
    assert!(status.success());

    let output = child.wait_with_output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "timer run failed: {}", String::from_utf8_lossy(&output.stderr));
    assert_contains(&stdout, "\"type\":\"timer_started\"");
    assert_contains(&stdout, "\"type\":\"timer_paused\"");
}

#[test]
fn test_completions() {
    let home = tempfile::tempdir().unwrap();
    let out = run_cli_success(home.path(), &["completions", "bash"]);
    assert_contains(&out, "taskly");
}
