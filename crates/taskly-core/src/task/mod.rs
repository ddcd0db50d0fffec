//! Task list with priorities, due dates, subtasks and recurrence.
//!
//! The list itself never touches points or streaks; [`crate::App`] applies
//! those when it calls [`TaskList::toggle`].

mod recurrence;

pub use recurrence::Recurrence;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, Result, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn is_important(self) -> bool {
        matches!(self, Priority::High | Priority::Urgent)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        };
        f.write_str(s)
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "urgent" => Ok(Priority::Urgent),
            other => Err(ValidationError::InvalidValue {
                field: "priority".into(),
                message: format!("unknown priority '{other}'"),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub title: String,
    #[serde(default)]
    pub done: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub due_time: Option<NaiveTime>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub recurrence: Recurrence,
    /// Weekday numbers (0 = Sunday) for `Recurrence::Custom`.
    #[serde(default)]
    pub custom_days: Vec<u8>,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Local>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Local>>,
}

/// Optional fields for a new task.
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub notes: String,
    pub due_date: Option<NaiveDate>,
    pub due_time: Option<NaiveTime>,
    pub priority: Priority,
    pub recurrence: Recurrence,
    pub custom_days: Vec<u8>,
}

/// Edits applied by [`TaskList::update`]. `None` leaves a field alone.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub notes: Option<String>,
    pub due_date: Option<Option<NaiveDate>>,
    pub due_time: Option<Option<NaiveTime>>,
    pub priority: Option<Priority>,
    pub recurrence: Option<Recurrence>,
}

impl Task {
    fn new(title: String, draft: TaskDraft, now: DateTime<Local>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            notes: draft.notes.trim().to_string(),
            due_date: draft.due_date,
            due_time: draft.due_time,
            priority: draft.priority,
            recurrence: draft.recurrence,
            custom_days: draft.custom_days,
            subtasks: Vec::new(),
            completed: false,
            created_at: now,
            completed_at: None,
        }
    }

    pub fn is_due_on(&self, day: NaiveDate) -> bool {
        self.due_date == Some(day)
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < today)
    }

    pub fn completed_on(&self, day: NaiveDate) -> bool {
        self.completed && self.completed_at.is_some_and(|at| at.date_naive() == day)
    }

    /// `(done, total)` subtasks.
    pub fn subtask_progress(&self) -> (usize, usize) {
        let done = self.subtasks.iter().filter(|s| s.done).count();
        (done, self.subtasks.len())
    }

    /// Fresh open copy due on the next occurrence, if the task recurs.
    fn next_occurrence(&self, today: NaiveDate) -> Option<Task> {
        let base = self.due_date.unwrap_or(today);
        let due = self.recurrence.next_date(base)?;
        let mut next = self.clone();
        next.id = Uuid::new_v4().to_string();
        next.completed = false;
        next.completed_at = None;
        next.due_date = Some(due);
        for subtask in &mut next.subtasks {
            subtask.done = false;
        }
        Some(next)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskFilter {
    /// Every open task.
    All,
    Today,
    /// Open, dated after today.
    Upcoming,
    /// Open, high or urgent priority.
    Important,
    Completed,
}

impl FromStr for TaskFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(TaskFilter::All),
            "today" => Ok(TaskFilter::Today),
            "upcoming" => Ok(TaskFilter::Upcoming),
            "important" => Ok(TaskFilter::Important),
            "completed" => Ok(TaskFilter::Completed),
            other => Err(ValidationError::InvalidValue {
                field: "filter".into(),
                message: format!("unknown filter '{other}'"),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskCounts {
    pub open: usize,
    pub due_today: usize,
    pub completed_today: usize,
    pub total: usize,
}

/// Result of toggling a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskToggle {
    pub completed: bool,
    /// Id of the next occurrence created for a recurring task.
    pub spawned: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| CoreError::not_found("task", id))
    }

    /// Add a task at the front of the list.
    pub fn add(&mut self, title: &str, draft: TaskDraft, now: DateTime<Local>) -> Result<&Task> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle.into());
        }
        self.tasks.insert(0, Task::new(title.to_string(), draft, now));
        Ok(&self.tasks[0])
    }

    /// Flip completion. Completing a recurring task appends its next occurrence.
    pub fn toggle(&mut self, id: &str, now: DateTime<Local>) -> Result<TaskToggle> {
        let task = self.get_mut(id)?;
        task.completed = !task.completed;
        task.completed_at = task.completed.then_some(now);
        if !task.completed {
            return Ok(TaskToggle {
                completed: false,
                spawned: None,
            });
        }

        let next = task.next_occurrence(now.date_naive());
        let spawned = next.as_ref().map(|t| t.id.clone());
        if let Some(next) = next {
            self.tasks.push(next);
        }
        Ok(TaskToggle {
            completed: true,
            spawned,
        })
    }

    pub fn update(&mut self, id: &str, patch: TaskPatch) -> Result<()> {
        if let Some(title) = &patch.title {
            if title.trim().is_empty() {
                return Err(ValidationError::EmptyTitle.into());
            }
        }
        let task = self.get_mut(id)?;
        if let Some(title) = patch.title {
            task.title = title.trim().to_string();
        }
        if let Some(notes) = patch.notes {
            task.notes = notes.trim().to_string();
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = due_date;
        }
        if let Some(due_time) = patch.due_time {
            task.due_time = due_time;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(recurrence) = patch.recurrence {
            task.recurrence = recurrence;
        }
        Ok(())
    }

    pub fn delete(&mut self, id: &str) -> Result<Task> {
        let idx = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| CoreError::not_found("task", id))?;
        Ok(self.tasks.remove(idx))
    }

    pub fn add_subtask(&mut self, id: &str, title: &str) -> Result<()> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle.into());
        }
        self.get_mut(id)?.subtasks.push(Subtask {
            title: title.to_string(),
            done: false,
        });
        Ok(())
    }

    pub fn toggle_subtask(&mut self, id: &str, index: usize) -> Result<bool> {
        let subtask = self
            .get_mut(id)?
            .subtasks
            .get_mut(index)
            .ok_or_else(|| CoreError::not_found("subtask", format!("{id}#{index}")))?;
        subtask.done = !subtask.done;
        Ok(subtask.done)
    }

    pub fn delete_subtask(&mut self, id: &str, index: usize) -> Result<Subtask> {
        let task = self.get_mut(id)?;
        if index >= task.subtasks.len() {
            return Err(CoreError::not_found("subtask", format!("{id}#{index}")));
        }
        Ok(task.subtasks.remove(index))
    }

    pub fn filter(&self, filter: TaskFilter, today: NaiveDate) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| match filter {
                TaskFilter::All => !t.completed,
                TaskFilter::Today => !t.completed && t.is_due_on(today),
                TaskFilter::Upcoming => !t.completed && t.due_date.is_some_and(|d| d > today),
                TaskFilter::Important => !t.completed && t.priority.is_important(),
                TaskFilter::Completed => t.completed,
            })
            .collect()
    }

    pub fn counts(&self, today: NaiveDate) -> TaskCounts {
        TaskCounts {
            open: self.tasks.iter().filter(|t| !t.completed).count(),
            due_today: self
                .tasks
                .iter()
                .filter(|t| !t.completed && t.is_due_on(today))
                .count(),
            completed_today: self.tasks.iter().filter(|t| t.completed_on(today)).count(),
            total: self.tasks.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn add_trims_and_prepends() {
        let mut list = TaskList::new();
        list.add("first", TaskDraft::default(), at(2024, 1, 1)).unwrap();
        let second = list.add("  second  ", TaskDraft::default(), at(2024, 1, 1)).unwrap();
        assert_eq!(second.title, "second");
        assert_eq!(list.as_slice()[0].title, "second");
    }

    #[test]
    fn add_rejects_blank_title() {
        let mut list = TaskList::new();
        let err = list.add("   ", TaskDraft::default(), at(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::EmptyTitle)));
    }

    #[test]
    fn toggle_twice_reopens() {
        let mut list = TaskList::new();
        let id = list.add("t", TaskDraft::default(), at(2024, 1, 1)).unwrap().id.clone();
        assert!(list.toggle(&id, at(2024, 1, 2)).unwrap().completed);
        assert!(list.get(&id).unwrap().completed_at.is_some());
        assert!(!list.toggle(&id, at(2024, 1, 2)).unwrap().completed);
        assert!(list.get(&id).unwrap().completed_at.is_none());
    }

    #[test]
    fn completing_recurring_task_spawns_next_occurrence() {
        let mut list = TaskList::new();
        let draft = TaskDraft {
            due_date: Some(date("2024-01-05")),
            recurrence: Recurrence::Weekdays,
            ..TaskDraft::default()
        };
        let id = list.add("standup", draft, at(2024, 1, 1)).unwrap().id.clone();
        list.add_subtask(&id, "notes").unwrap();
        list.toggle_subtask(&id, 0).unwrap();

        let toggle = list.toggle(&id, at(2024, 1, 5)).unwrap();
        let spawned = list.get(toggle.spawned.as_deref().unwrap()).unwrap();
        assert_eq!(spawned.due_date, Some(date("2024-01-08")));
        assert!(!spawned.completed);
        assert!(!spawned.subtasks[0].done);
        assert_ne!(spawned.id, id);
        assert_eq!(list.as_slice().last().unwrap().id, spawned.id);
    }

    #[test]
    fn undated_recurring_task_advances_from_today() {
        let mut list = TaskList::new();
        let draft = TaskDraft {
            recurrence: Recurrence::Daily,
            ..TaskDraft::default()
        };
        let id = list.add("water plants", draft, at(2024, 3, 1)).unwrap().id.clone();
        let toggle = list.toggle(&id, at(2024, 3, 10)).unwrap();
        let spawned = list.get(toggle.spawned.as_deref().unwrap()).unwrap();
        assert_eq!(spawned.due_date, Some(date("2024-03-11")));
    }

    #[test]
    fn filters_partition_open_tasks() {
        let today = date("2024-05-10");
        let mut list = TaskList::new();
        let due_today = TaskDraft {
            due_date: Some(today),
            ..TaskDraft::default()
        };
        let later = TaskDraft {
            due_date: Some(date("2024-05-20")),
            priority: Priority::Urgent,
            ..TaskDraft::default()
        };
        let overdue = TaskDraft {
            due_date: Some(date("2024-05-01")),
            ..TaskDraft::default()
        };
        list.add("today", due_today, at(2024, 5, 1)).unwrap();
        list.add("later", later, at(2024, 5, 1)).unwrap();
        let late_id = list.add("late", overdue, at(2024, 5, 1)).unwrap().id.clone();

        assert_eq!(list.filter(TaskFilter::All, today).len(), 3);
        assert_eq!(list.filter(TaskFilter::Today, today)[0].title, "today");
        assert_eq!(list.filter(TaskFilter::Upcoming, today)[0].title, "later");
        assert_eq!(list.filter(TaskFilter::Important, today)[0].title, "later");
        assert!(list.get(&late_id).unwrap().is_overdue(today));
        assert!(list.filter(TaskFilter::Completed, today).is_empty());
    }

    #[test]
    fn counts_track_completion_day() {
        let mut list = TaskList::new();
        let id = list.add("a", TaskDraft::default(), at(2024, 1, 1)).unwrap().id.clone();
        list.add("b", TaskDraft::default(), at(2024, 1, 1)).unwrap();
        list.toggle(&id, at(2024, 1, 2)).unwrap();

        let counts = list.counts(date("2024-01-02"));
        assert_eq!(counts.open, 1);
        assert_eq!(counts.completed_today, 1);
        assert_eq!(counts.total, 2);
        assert_eq!(list.counts(date("2024-01-03")).completed_today, 0);
    }

    #[test]
    fn update_and_delete() {
        let mut list = TaskList::new();
        let id = list.add("draft", TaskDraft::default(), at(2024, 1, 1)).unwrap().id.clone();
        list.update(
            &id,
            TaskPatch {
                title: Some("final".into()),
                priority: Some(Priority::High),
                due_date: Some(Some(date("2024-02-01"))),
                ..TaskPatch::default()
            },
        )
        .unwrap();
        let task = list.get(&id).unwrap();
        assert_eq!(task.title, "final");
        assert_eq!(task.priority, Priority::High);

        assert!(list.update(&id, TaskPatch { title: Some(" ".into()), ..Default::default() }).is_err());
        assert_eq!(list.delete(&id).unwrap().title, "final");
        assert!(matches!(list.delete(&id), Err(CoreError::NotFound { .. })));
    }

    #[test]
    fn subtask_index_out_of_range_is_not_found() {
        let mut list = TaskList::new();
        let id = list.add("t", TaskDraft::default(), at(2024, 1, 1)).unwrap().id.clone();
        assert!(list.toggle_subtask(&id, 0).is_err());
        list.add_subtask(&id, "one").unwrap();
        assert_eq!(list.get(&id).unwrap().subtask_progress(), (0, 1));
        assert!(list.toggle_subtask(&id, 0).unwrap());
        assert_eq!(list.delete_subtask(&id, 0).unwrap().title, "one");
    }

    #[test]
    fn serializes_as_plain_array() {
        let mut list = TaskList::new();
        list.add("t", TaskDraft::default(), at(2024, 1, 1)).unwrap();
        let json = serde_json::to_value(&list).unwrap();
        assert!(json.is_array());
        let back: TaskList = serde_json::from_value(json).unwrap();
        assert_eq!(back, list);
    }
}
