//! Daily habits with a per-habit completion log.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, Result, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub name: String,
    #[serde(default = "default_emoji")]
    pub emoji: String,
    #[serde(default = "default_goal")]
    pub goal: u32,
    /// Days the habit was checked off.
    #[serde(default)]
    pub log: Vec<NaiveDate>,
    pub created_at: NaiveDate,
}

fn default_emoji() -> String {
    "📚".into()
}

fn default_goal() -> u32 {
    1
}

impl Habit {
    pub fn done_on(&self, day: NaiveDate) -> bool {
        self.log.contains(&day)
    }

    /// Consecutive checked days ending today. Zero if today is unchecked.
    pub fn streak(&self, today: NaiveDate) -> u32 {
        let mut streak = 0;
        let mut day = Some(today);
        while let Some(d) = day.filter(|d| self.done_on(*d)) {
            streak += 1;
            day = d.pred_opt();
        }
        streak
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitList {
    habits: Vec<Habit>,
}

impl HabitList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[Habit] {
        &self.habits
    }

    pub fn get(&self, id: &str) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == id)
    }

    /// Append a habit. A goal of zero is stored as one.
    pub fn add(&mut self, name: &str, emoji: Option<&str>, goal: u32, today: NaiveDate) -> Result<&Habit> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyTitle.into());
        }
        self.habits.push(Habit {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            emoji: emoji
                .map(str::to_string)
                .filter(|e| !e.is_empty())
                .unwrap_or_else(default_emoji),
            goal: goal.max(1),
            log: Vec::new(),
            created_at: today,
        });
        Ok(&self.habits[self.habits.len() - 1])
    }

    /// Check or uncheck `today`. Returns true when the habit became checked.
    pub fn toggle(&mut self, id: &str, today: NaiveDate) -> Result<bool> {
        let habit = self
            .habits
            .iter_mut()
            .find(|h| h.id == id)
            .ok_or_else(|| CoreError::not_found("habit", id))?;
        match habit.log.iter().position(|d| *d == today) {
            Some(idx) => {
                habit.log.remove(idx);
                Ok(false)
            }
            None => {
                habit.log.push(today);
                Ok(true)
            }
        }
    }

    pub fn delete(&mut self, id: &str) -> Result<Habit> {
        let idx = self
            .habits
            .iter()
            .position(|h| h.id == id)
            .ok_or_else(|| CoreError::not_found("habit", id))?;
        Ok(self.habits.remove(idx))
    }
}
