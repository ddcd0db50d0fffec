use clap::Subcommand;

use super::{open_app, print_events, print_json, CmdResult};

#[derive(Subcommand)]
pub enum HabitAction {
    /// Add a habit
    Add {
        /// Habit name
        name: String,
        #[arg(long)]
        emoji: Option<String>,
        /// Daily goal
        #[arg(long, default_value = "1")]
        goal: u32,
    },
    /// List habits with today's state and streak
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check or uncheck a habit for today
    Check {
        /// Habit ID
        id: String,
    },
    /// Delete a habit
    Delete {
        /// Habit ID
        id: String,
    },
}

pub fn run(action: HabitAction) -> CmdResult {
    let mut app = open_app()?;

    match action {
        HabitAction::Add { name, emoji, goal } => {
            let id = app.add_habit(&name, emoji.as_deref(), goal)?;
            println!("Habit created: {id}");
        }
        HabitAction::List { json } => {
            let habits = app.habits().as_slice();
            if json {
                return print_json(&habits);
            }
            if habits.is_empty() {
                println!("No habits.");
            }
            let today = app.now().date_naive();
            for habit in habits {
                let mark = if habit.done_on(today) { "x" } else { " " };
                println!(
                    "[{mark}] {}  {} {}  streak {}",
                    habit.id,
                    habit.emoji,
                    habit.name,
                    habit.streak(today)
                );
            }
        }
        HabitAction::Check { id } => {
            let (checked, events) = app.check_habit(&id)?;
            println!("Habit {}: {id}", if checked { "checked" } else { "unchecked" });
            print_events(&events)?;
        }
        HabitAction::Delete { id } => {
            app.delete_habit(&id)?;
            println!("Habit deleted: {id}");
        }
    }
    Ok(())
}
