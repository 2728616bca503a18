//! MemTable implementation
//!
//! BTreeMap-based memtable with RwLock for concurrency.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use crate::types::{Key, Value};

/// In-memory table holding the current state of every key
#[derive(Debug, Default)]
pub struct MemTable {
    data: RwLock<BTreeMap<Key, Value>>,
}

impl MemTable {
    /// Create a new empty MemTable
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a value by key (read lock)
    pub fn get(&self, key: &Key) -> Option<Value> {
        self.data.read().get(key).cloned()
    }

    /// Insert or overwrite a value (write lock). Returns the previous value.
    pub fn set(&self, key: Key, value: Value) -> Option<Value> {
        self.data.write().insert(key, value)
    }

    /// Remove a key (write lock). Removing an absent key is not an error.
    pub fn delete(&self, key: &Key) -> Option<Value> {
        self.data.write().remove(key)
    }

    /// Number of live keys
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    /// Snapshot of all keys, in order
    pub fn keys(&self) -> Vec<Key> {
        self.data.read().keys().cloned().collect()
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.data.write().clear();
    }
}
