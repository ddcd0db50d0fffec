//! In-process key/value store.
//!
//! Clones share the same map, so a test can keep a clone to inspect what
//! the application wrote.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use super::Store;
use crate::error::StorageError;

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
    fail_writes: Arc<AtomicBool>,
}

/// Makes a [`MemoryStore`] reject writes and deletes while engaged.
#[derive(Debug, Clone)]
pub struct FaultSwitch(Arc<AtomicBool>);

impl FaultSwitch {
    pub fn engage(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn release(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fault_switch() -> (Self, FaultSwitch) {
        let store = Self::default();
        let switch = FaultSwitch(Arc::clone(&store.fail_writes));
        (store, switch)
    }

    fn check_writable(&self, key: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::WriteRejected(key.to_string()));
        }
        Ok(())
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>, StorageError> {
        self.entries
            .lock()
            .map_err(|_| StorageError::QueryFailed("memory store poisoned".into()))
    }
}

impl Store for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_writable(key)?;
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StorageError> {
        self.check_writable(key)?;
        self.entries()?.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.entries()?.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_entries() {
        let mut store = MemoryStore::new();
        let probe = store.clone();
        store.write("k", "v").unwrap();
        assert_eq!(probe.read("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn fault_switch_rejects_writes_until_released() {
        let (mut store, switch) = MemoryStore::with_fault_switch();
        switch.engage();
        assert!(matches!(
            store.write("k", "v"),
            Err(StorageError::WriteRejected(_))
        ));
        switch.release();
        store.write("k", "v").unwrap();
        assert!(store.delete("k").is_ok());
        assert!(store.read("k").unwrap().is_none());
    }
}
