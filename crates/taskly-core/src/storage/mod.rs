mod config;
pub mod database;
pub mod memory;

pub use config::{AmbientConfig, Config, NotificationsConfig, SoundConfig, Theme};
pub use database::SqliteStore;
pub use memory::{FaultSwitch, MemoryStore};

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::error::{Result, StorageError};

/// Prefix applied to every key written by [`Storage`].
pub const NAMESPACE: &str = "taskly_";

pub const STATS_KEY: &str = "stats";
pub const TASKS_KEY: &str = "tasks";
pub const NOTES_KEY: &str = "notes";
pub const HABITS_KEY: &str = "habits";

/// Raw key/value backend. Values are opaque strings.
pub trait Store {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn delete(&mut self, key: &str) -> Result<(), StorageError>;
    fn keys(&self) -> Result<Vec<String>, StorageError>;
}

/// Namespaced, JSON-typed access on top of a [`Store`].
pub struct Storage {
    store: Box<dyn Store>,
}

impl Storage {
    pub fn new(store: impl Store + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    /// SQLite store at `<data_dir>/taskly.db`.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(SqliteStore::open()?))
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    fn namespaced(key: &str) -> String {
        format!("{NAMESPACE}{key}")
    }

    /// Load a record. Unreadable records are logged and treated as absent.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.store.read(&Self::namespaced(key))? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key, error = %e, "ignoring unreadable record");
                Ok(None)
            }
        }
    }

    pub fn load_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T> {
        Ok(self.load(key)?.unwrap_or_default())
    }

    pub fn save<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value).map_err(|source| StorageError::Serialize {
            key: key.to_string(),
            source,
        })?;
        self.store.write(&Self::namespaced(key), &json)?;
        Ok(())
    }

    /// Delete every namespaced key. Returns how many were removed.
    pub fn clear(&mut self) -> Result<usize> {
        let keys: Vec<String> = self
            .store
            .keys()?
            .into_iter()
            .filter(|k| k.starts_with(NAMESPACE))
            .collect();
        for key in &keys {
            self.store.delete(key)?;
        }
        Ok(keys.len())
    }
}

/// Returns the Taskly data directory, creating it if needed.
///
/// `TASKLY_HOME` overrides the location. Otherwise `~/.config/taskly`, or
/// `~/.config/taskly-dev` when `TASKLY_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("TASKLY_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("TASKLY_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("taskly-dev")
            } else {
                base_dir.join("taskly")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
