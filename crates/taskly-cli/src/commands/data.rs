use std::path::PathBuf;

use clap::Subcommand;

use super::{open_app, print_events, CmdResult};

#[derive(Subcommand)]
pub enum DataAction {
    /// Export tasks, notes, habits and stats as JSON
    Export {
        /// Write to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Delete all stored data and restore default settings
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(action: DataAction) -> CmdResult {
    let mut app = open_app()?;

    match action {
        DataAction::Export { out } => {
            let json = serde_json::to_string_pretty(&app.export())?;
            match out {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    println!("Exported to {}", path.display());
                }
                None => println!("{json}"),
            }
        }
        DataAction::Reset { yes } => {
            if !yes {
                return Err("refusing to delete all data without --yes".into());
            }
            let event = app.reset_all()?;
            app.config().save()?;
            print_events(&[event])?;
        }
    }
    Ok(())
}
