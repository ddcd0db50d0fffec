use serde::Serialize;

/// One tier of the level table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Level {
    pub min_points: u64,
    pub name: &'static str,
}

/// Ascending point thresholds. Level `n` is `LEVELS[n - 1]`.
pub const LEVELS: [Level; 7] = [
    Level { min_points: 0, name: "Beginner" },
    Level { min_points: 100, name: "Learner" },
    Level { min_points: 300, name: "Producer" },
    Level { min_points: 600, name: "Professional" },
    Level { min_points: 1000, name: "Expert" },
    Level { min_points: 1500, name: "Master" },
    Level { min_points: 2500, name: "Legend" },
];

/// 1-based level for a point total, scanning from the highest threshold down.
pub fn level_for(points: u64) -> u32 {
    LEVELS
        .iter()
        .rposition(|tier| points >= tier.min_points)
        .map(|idx| idx as u32 + 1)
        .unwrap_or(1)
}

/// Tier for a 1-based level, clamped to the table.
pub fn tier(level: u32) -> &'static Level {
    let idx = (level.max(1) as usize - 1).min(LEVELS.len() - 1);
    &LEVELS[idx]
}

/// Progress toward the next tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelProgress {
    pub level: u32,
    pub name: &'static str,
    pub points: u64,
    /// Threshold of the next tier; equals the current one at the top.
    pub next_min_points: u64,
    /// 0.0 .. 100.0
    pub percent: f64,
}

impl LevelProgress {
    pub fn for_points(points: u64) -> Self {
        let level = level_for(points);
        let current = tier(level);
        let next = LEVELS.get(level as usize).unwrap_or(current);
        let percent = if next.min_points == current.min_points {
            100.0
        } else {
            let span = (next.min_points - current.min_points) as f64;
            (points - current.min_points) as f64 / span * 100.0
        };
        Self {
            level,
            name: current.name,
            points,
            next_min_points: next.min_points,
            percent,
        }
    }
}
