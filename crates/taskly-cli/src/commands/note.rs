use clap::Subcommand;
use taskly_core::{NoteDraft, NoteSave};

use super::{open_app, print_events, print_json, CmdResult};

#[derive(Subcommand)]
pub enum NoteAction {
    /// Add a note
    Add {
        /// Note title
        title: String,
        /// Note body
        #[arg(long, default_value = "")]
        content: String,
        /// Colour tag
        #[arg(long, default_value = "default")]
        color: String,
        /// Pin the note
        #[arg(long)]
        pin: bool,
    },
    /// List notes, pinned first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Toggle pinning
    Pin {
        /// Note ID
        id: String,
    },
    /// Delete a note
    Delete {
        /// Note ID
        id: String,
    },
}

pub fn run(action: NoteAction) -> CmdResult {
    let mut app = open_app()?;

    match action {
        NoteAction::Add {
            title,
            content,
            color,
            pin,
        } => {
            let draft = NoteDraft {
                title,
                content,
                color,
                pinned: pin,
            };
            match app.save_note(None, draft)? {
                (NoteSave::Created(id), events) => {
                    println!("Note created: {id}");
                    print_events(&events)?;
                }
                (_, _) => println!("Empty note discarded."),
            }
        }
        NoteAction::List { json } => {
            let notes = app.notes().sorted();
            if json {
                print_json(&notes)?;
            } else if notes.is_empty() {
                println!("No notes.");
            } else {
                for note in notes {
                    let pin = if note.pinned { "*" } else { " " };
                    println!("{pin} {}  {}  ({})", note.id, note.title, note.created_at);
                }
            }
        }
        NoteAction::Pin { id } => {
            let pinned = app.toggle_pin(&id)?;
            println!("Note {}: {id}", if pinned { "pinned" } else { "unpinned" });
        }
        NoteAction::Delete { id } => {
            app.delete_note(&id)?;
            println!("Note deleted: {id}");
        }
    }
    Ok(())
}
