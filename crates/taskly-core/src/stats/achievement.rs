use serde::Serialize;

use super::record::StatsRecord;

/// A badge unlocked by a threshold on the stats record.
#[derive(Clone, Copy)]
pub struct Achievement {
    pub id: &'static str,
    pub icon: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    unlocked: fn(&StatsRecord) -> bool,
}

impl Achievement {
    pub fn is_unlocked(&self, stats: &StatsRecord) -> bool {
        (self.unlocked)(stats)
    }
}

pub const ACHIEVEMENTS: [Achievement; 6] = [
    Achievement {
        id: "first_task",
        icon: "🎯",
        name: "First Task",
        description: "Complete your first task",
        unlocked: |s| s.completed_task_count() >= 1,
    },
    Achievement {
        id: "ten_tasks",
        icon: "🔟",
        name: "10 Tasks",
        description: "Complete 10 tasks",
        unlocked: |s| s.completed_task_count() >= 10,
    },
    Achievement {
        id: "streak_3",
        icon: "🔥",
        name: "3-Day Streak",
        description: "Stay active 3 days in a row",
        unlocked: |s| s.streak() >= 3,
    },
    Achievement {
        id: "streak_7",
        icon: "💪",
        name: "Full Week",
        description: "Stay active 7 days in a row",
        unlocked: |s| s.streak() >= 7,
    },
    Achievement {
        id: "pomo_5",
        icon: "🍅",
        name: "5 Sessions",
        description: "Complete 5 pomodoro sessions",
        unlocked: |s| s.pomodoro_session_count() >= 5,
    },
    Achievement {
        id: "focus_hour",
        icon: "⏰",
        name: "Focus Hour",
        description: "Accumulate 60 minutes of focus",
        unlocked: |s| s.focus_minutes() >= 60,
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AchievementStatus {
    pub id: &'static str,
    pub icon: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub unlocked: bool,
}

/// Every achievement with its current unlock state, in table order.
pub fn evaluate(stats: &StatsRecord) -> Vec<AchievementStatus> {
    ACHIEVEMENTS
        .iter()
        .map(|a| AchievementStatus {
            id: a.id,
            icon: a.icon,
            name: a.name,
            description: a.description,
            unlocked: a.is_unlocked(stats),
        })
        .collect()
}
