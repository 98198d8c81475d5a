//! In-memory cache backend.
//!
//! Keeps entries in plain maps for the lifetime of the process. Nothing is
//! serialized and nothing survives a restart, which makes this the fallback
//! when no durable medium is available, and the side table the durable
//! backend uses for non-persistent groups.

use std::collections::HashMap;

use super::engine::{EntryStore, StoreBackend};
use super::entry::Entry;
use crate::config::Settings;

/// In-memory cache backend.
pub type MemoryBackend = StoreBackend<MemoryStore>;

/// Entries grouped by cache group, then composite key.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    groups: HashMap<String, HashMap<String, Entry>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of entries (including expired ones not yet purged).
    pub fn len(&self) -> usize {
        self.groups.values().map(HashMap::len).sum()
    }

    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EntryStore for MemoryStore {
    fn read(&mut self, group: &str, key: &str) -> Option<Entry> {
        self.groups.get(group)?.get(key).cloned()
    }

    fn write(&mut self, group: &str, key: &str, entry: Entry) -> bool {
        self.groups
            .entry(group.to_string())
            .or_default()
            .insert(key.to_string(), entry);
        true
    }

    fn delete(&mut self, group: &str, key: &str) -> bool {
        self.groups
            .get_mut(group)
            .is_some_and(|entries| entries.remove(key).is_some())
    }

    fn clear(&mut self) {
        self.groups.clear();
    }
}

impl StoreBackend<MemoryStore> {
    /// Creates an empty in-memory backend.
    ///
    /// Its requirements are always met.
    pub fn memory(settings: &Settings) -> Self {
        Self::new(MemoryStore::new(), settings)
    }
}
