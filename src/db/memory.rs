// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory store for tests and ephemeral sessions.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::db::{KeyValueStore, StoreError};

/// In-memory key-value store. Clones share the same map.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    entries: Option<Arc<Mutex<HashMap<String, String>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: Some(Arc::new(Mutex::new(HashMap::new()))),
        }
    }

    /// Create an unavailable store (offline mode).
    ///
    /// All operations will return an error if called.
    pub fn new_offline() -> Self {
        Self { entries: None }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, StoreError> {
        let entries = self
            .entries
            .as_ref()
            .ok_or_else(|| StoreError::Unavailable("store offline".to_string()))?;
        entries
            .lock()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.lock()?.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_entries() {
        let store = MemoryStore::new();
        let other = store.clone();

        store.set("workouts", "[]").unwrap();
        assert_eq!(other.get("workouts").unwrap().as_deref(), Some("[]"));

        other.clear().unwrap();
        assert_eq!(store.get("workouts").unwrap(), None);
    }

    #[test]
    fn test_offline_store_errors() {
        let store = MemoryStore::new_offline();
        assert!(matches!(
            store.get("workouts"),
            Err(StoreError::Unavailable(_))
        ));
        assert!(store.set("workouts", "[]").is_err());
    }
}
