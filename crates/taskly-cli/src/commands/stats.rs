use clap::Subcommand;
use serde_json::json;
use taskly_core::stats::{evaluate_achievements, LEVELS};
use taskly_core::LevelProgress;

use super::{open_app, print_json, CmdResult};

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Subcommand)]
pub enum StatsAction {
    /// The full stats record with level progress
    Show,
    /// The level threshold table
    Levels,
    /// Achievements and whether each is unlocked
    Achievements,
    /// Completions per weekday
    Weekly,
}

pub fn run(action: StatsAction) -> CmdResult {
    match action {
        StatsAction::Show => {
            let app = open_app()?;
            let stats = app.stats();
            let counts = app.tasks().counts(app.now().date_naive());
            print_json(&json!({
                "stats": stats,
                "progress": LevelProgress::for_points(stats.points()),
                "tasks": counts,
            }))
        }
        StatsAction::Levels => {
            let levels: Vec<_> = LEVELS
                .iter()
                .enumerate()
                .map(|(i, tier)| json!({ "level": i + 1, "name": tier.name, "minPoints": tier.min_points }))
                .collect();
            print_json(&levels)
        }
        StatsAction::Achievements => {
            let app = open_app()?;
            print_json(&evaluate_achievements(app.stats()))
        }
        StatsAction::Weekly => {
            let app = open_app()?;
            let weekly: serde_json::Map<String, serde_json::Value> = WEEKDAYS
                .iter()
                .zip(app.stats().weekly_activity())
                .map(|(day, n)| (day.to_string(), (*n).into()))
                .collect();
            print_json(&weekly)
        }
    }
}
