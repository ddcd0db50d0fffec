use chrono::{NaiveDate, NaiveTime};
use clap::Subcommand;
use taskly_core::{Priority, Recurrence, Task, TaskDraft, TaskFilter, TaskPatch};

use super::{open_app, print_events, print_json, CmdResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task
    Add {
        /// Task title
        title: String,
        /// Free-form notes
        #[arg(long, default_value = "")]
        notes: String,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<NaiveDate>,
        /// Due time (HH:MM)
        #[arg(long, value_parser = parse_time)]
        time: Option<NaiveTime>,
        /// low, medium, high or urgent
        #[arg(long, default_value = "low")]
        priority: Priority,
        /// none, daily, weekdays, weekly or monthly
        #[arg(long, default_value = "none")]
        repeat: Recurrence,
    },
    /// List tasks
    List {
        /// all (open), today, upcoming, important or completed
        #[arg(long, default_value = "all")]
        filter: TaskFilter,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit a task
    Edit {
        /// Task ID
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        /// Due date (YYYY-MM-DD)
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<NaiveDate>,
        /// Remove the due date and time
        #[arg(long)]
        clear_due: bool,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long)]
        repeat: Option<Recurrence>,
    },
    /// Toggle a task between done and open
    Done {
        /// Task ID
        id: String,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
    /// Add a subtask
    SubtaskAdd {
        /// Parent task ID
        id: String,
        /// Subtask title
        title: String,
    },
    /// Toggle a subtask
    SubtaskToggle {
        /// Parent task ID
        id: String,
        /// Zero-based subtask index
        index: usize,
    },
    /// Delete a subtask
    SubtaskDelete {
        /// Parent task ID
        id: String,
        /// Zero-based subtask index
        index: usize,
    },
}

fn parse_time(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, "%H:%M").map_err(|e| format!("expected HH:MM: {e}"))
}

fn print_task_line(task: &Task, today: NaiveDate) {
    let mark = if task.completed { "x" } else { " " };
    let mut line = format!("[{mark}] {}  {}", task.id, task.title);
    if let Some(due) = task.due_date {
        line.push_str(&format!("  due {due}"));
        if task.is_overdue(today) {
            line.push_str(" (overdue)");
        }
    }
    if task.priority.is_important() {
        line.push_str(&format!("  !{}", task.priority));
    }
    let (done, total) = task.subtask_progress();
    if total > 0 {
        line.push_str(&format!("  {done}/{total}"));
    }
    println!("{line}");
}

pub fn run(action: TaskAction) -> CmdResult {
    let mut app = open_app()?;

    match action {
        TaskAction::Add {
            title,
            notes,
            due,
            time,
            priority,
            repeat,
        } => {
            let draft = TaskDraft {
                notes,
                due_date: due,
                due_time: time,
                priority,
                recurrence: repeat,
                ..TaskDraft::default()
            };
            let (id, events) = app.add_task(&title, draft)?;
            println!("Task created: {id}");
            print_events(&events)?;
        }
        TaskAction::List { filter, json } => {
            let today = app.now().date_naive();
            let tasks = app.tasks().filter(filter, today);
            if json {
                print_json(&tasks)?;
            } else if tasks.is_empty() {
                println!("No tasks.");
            } else {
                for task in tasks {
                    print_task_line(task, today);
                }
            }
        }
        TaskAction::Edit {
            id,
            title,
            notes,
            due,
            clear_due,
            priority,
            repeat,
        } => {
            let patch = TaskPatch {
                title,
                notes,
                due_date: if clear_due { Some(None) } else { due.map(Some) },
                due_time: clear_due.then_some(None),
                priority,
                recurrence: repeat,
            };
            app.update_task(&id, patch)?;
            println!("Task updated: {id}");
        }
        TaskAction::Done { id } => {
            let (toggle, events) = app.toggle_task(&id)?;
            if toggle.completed {
                println!("Task completed: {id}");
            } else {
                println!("Task reopened: {id}");
            }
            if let Some(next) = toggle.spawned {
                println!("Next occurrence: {next}");
            }
            print_events(&events)?;
        }
        TaskAction::Delete { id } => {
            app.delete_task(&id)?;
            println!("Task deleted: {id}");
        }
        TaskAction::SubtaskAdd { id, title } => {
            app.add_subtask(&id, &title)?;
            println!("Subtask added to {id}");
        }
        TaskAction::SubtaskToggle { id, index } => {
            let done = app.toggle_subtask(&id, index)?;
            println!("Subtask {index} {}", if done { "done" } else { "open" });
        }
        TaskAction::SubtaskDelete { id, index } => {
            app.delete_subtask(&id, index)?;
            println!("Subtask {index} deleted from {id}");
        }
    }
    Ok(())
}
