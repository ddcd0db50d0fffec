//! Free-form notes with colour and pinning.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub pinned: bool,
    pub created_at: NaiveDate,
}

fn default_color() -> String {
    "default".into()
}

#[derive(Debug, Clone)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub color: String,
    pub pinned: bool,
}

impl Default for NoteDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            color: default_color(),
            pinned: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteSave {
    Created(String),
    Updated,
    /// Title and content were both empty; nothing stored.
    Discarded,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteBook {
    notes: Vec<Note>,
}

impl NoteBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Note> {
        self.notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| CoreError::not_found("note", id))
    }

    /// Create a note (`id = None`) or overwrite an existing one.
    pub fn save(&mut self, id: Option<&str>, draft: NoteDraft, today: NaiveDate) -> Result<NoteSave> {
        let title = draft.title.trim().to_string();
        let content = draft.content.trim().to_string();
        if title.is_empty() && content.is_empty() {
            return Ok(NoteSave::Discarded);
        }

        match id {
            Some(id) => {
                let note = self.get_mut(id)?;
                note.title = title;
                note.content = content;
                note.color = draft.color;
                note.pinned = draft.pinned;
                Ok(NoteSave::Updated)
            }
            None => {
                let id = Uuid::new_v4().to_string();
                self.notes.insert(
                    0,
                    Note {
                        id: id.clone(),
                        title,
                        content,
                        color: draft.color,
                        pinned: draft.pinned,
                        created_at: today,
                    },
                );
                Ok(NoteSave::Created(id))
            }
        }
    }

    pub fn toggle_pin(&mut self, id: &str) -> Result<bool> {
        let note = self.get_mut(id)?;
        note.pinned = !note.pinned;
        Ok(note.pinned)
    }

    pub fn delete(&mut self, id: &str) -> Result<Note> {
        let idx = self
            .notes
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| CoreError::not_found("note", id))?;
        Ok(self.notes.remove(idx))
    }

    /// Pinned notes first, otherwise in stored order.
    pub fn sorted(&self) -> Vec<&Note> {
        let mut notes: Vec<&Note> = self.notes.iter().collect();
        notes.sort_by_key(|n| !n.pinned);
        notes
    }
}
