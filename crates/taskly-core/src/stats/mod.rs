//! Gamification state: points, levels, streaks, achievements.

pub mod achievement;
pub mod level;
mod record;
mod streak;

pub use achievement::{evaluate as evaluate_achievements, Achievement, AchievementStatus, ACHIEVEMENTS};
pub use level::{level_for, tier, Level, LevelProgress, LEVELS};
pub use record::StatsRecord;
