//! Memory Store Module
//!
//! In-process document store usable wherever a [`Store`] is expected.
//! Expiry is checked on read; nothing runs in the background.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::store::{Store, StoredEntry};

// == Memory Store ==
/// Thread-safe in-memory document store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, StoredEntry>>,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, StoredEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // == Length ==
    /// Returns the number of documents held, expired ones included until read.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    // == Is Empty ==
    /// Returns true if the store holds no documents.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl Store for MemoryStore {
    fn fetch(&self, key: &str) -> StoreResult<Value> {
        let mut entries = self.lock();

        match entries.get(key) {
            Some(entry) if !entry.is_expired() => return Ok(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                debug!(key, "Dropped expired document on read");
            }
            None => {}
        }

        Err(StoreError::NotFound(key.to_string()))
    }

    fn store(&self, key: &str, value: Value, ttl_seconds: i64) -> StoreResult<()> {
        let mut entries = self.lock();

        // An already-expired write leaves nothing behind
        if ttl_seconds < 0 {
            entries.remove(key);
        } else {
            entries.insert(key.to_string(), StoredEntry::new(value, ttl_seconds));
        }

        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        match self.lock().remove(key) {
            Some(entry) if !entry.is_expired() => Ok(()),
            _ => Err(StoreError::NotFound(key.to_string())),
        }
    }

    fn exists(&self, key: &str) -> bool {
        self.lock()
            .get(key)
            .is_some_and(|entry| !entry.is_expired())
    }

    fn flush_all(&self) -> bool {
        self.lock().clear();
        true
    }
}
