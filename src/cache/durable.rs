//! Durable cache backend.
//!
//! Persists entries as JSON text in a [`StorageMedium`], under keys of the form
//! `{namespace}:{group}:{composite_key}`. Values under the namespace that do not
//! decode to an entry are treated as corrupt: they read as a miss and the slot
//! is deleted. Keys outside the namespace are never read, written or flushed.
//!
//! Groups marked non-persistent bypass the medium and live in an in-memory
//! side table for the lifetime of the backend.

use tracing::{debug, warn};

use super::engine::{EntryStore, StoreBackend};
use super::entry::Entry;
use super::keyspace::NonPersistentGroups;
use super::medium::StorageMedium;
use super::memory::MemoryStore;
use crate::config::Settings;
use crate::constants::DEFAULT_NAMESPACE;
use crate::error::{Error, Result};

/// Durable cache backend over a storage medium.
pub type DurableBackend<M> = StoreBackend<DurableStore<M>>;

/// Entry store that encodes entries into a text medium.
#[derive(Debug)]
pub struct DurableStore<M> {
    medium: M,
    namespace: String,
    non_persistent: NonPersistentGroups,
    side_table: MemoryStore,
}

impl<M: StorageMedium> DurableStore<M> {
    /// Creates a store writing under the default `wpCache` namespace.
    pub fn new(medium: M) -> Self {
        Self {
            medium,
            namespace: DEFAULT_NAMESPACE.to_string(),
            non_persistent: NonPersistentGroups::default(),
            side_table: MemoryStore::new(),
        }
    }

    /// Uses a different key namespace in the medium.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn medium(&self) -> &M {
        &self.medium
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Medium key for an entry.
    pub fn storage_key(&self, group: &str, key: &str) -> String {
        format!("{}:{group}:{key}", self.namespace)
    }

    fn owns(&self, storage_key: &str) -> bool {
        storage_key
            .strip_prefix(self.namespace.as_str())
            .is_some_and(|rest| rest.starts_with(':'))
    }

    fn encode(entry: &Entry) -> Result<String> {
        serde_json::to_string(entry).map_err(Error::from)
    }

    /// Decodes stored text, purging the slot if it is not a valid entry.
    fn decode(&self, storage_key: &str, text: &str) -> Option<Entry> {
        match serde_json::from_str::<Entry>(text).map_err(Error::from) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(key = storage_key, error = %e, "Purging corrupt cache entry");
                self.remove_quietly(storage_key);
                None
            },
        }
    }

    fn remove_quietly(&self, storage_key: &str) {
        if let Err(e) = self.medium.remove_item(storage_key) {
            warn!(key = storage_key, error = %e, "Failed to remove cache item");
        }
    }

    /// Owned keys in the medium, or none if it cannot be enumerated.
    fn owned_keys(&self) -> Vec<String> {
        match self.medium.keys() {
            Ok(keys) => keys.into_iter().filter(|key| self.owns(key)).collect(),
            Err(e) => {
                warn!(error = %e, "Failed to enumerate storage keys");
                Vec::new()
            },
        }
    }

    /// Deletes expired and corrupt entries under the namespace.
    ///
    /// Returns the number of slots removed.
    pub fn sweep(&mut self, now: i64) -> usize {
        let mut removed = 0;

        for key in self.owned_keys() {
            let text = match self.medium.get_item(&key) {
                Ok(Some(text)) => text,
                Ok(None) => continue,
                Err(e) => {
                    warn!(key = %key, error = %e, "Failed to read cache item during sweep");
                    continue;
                },
            };

            match self.decode(&key, &text) {
                Some(entry) if entry.is_expired(now) => {
                    self.remove_quietly(&key);
                    removed += 1;
                },
                Some(_) => {},
                None => removed += 1,
            }
        }

        removed
    }
}

impl<M: StorageMedium> EntryStore for DurableStore<M> {
    fn read(&mut self, group: &str, key: &str) -> Option<Entry> {
        if self.non_persistent.contains(group) {
            return self.side_table.read(group, key);
        }

        let storage_key = self.storage_key(group, key);
        match self.medium.get_item(&storage_key) {
            Ok(Some(text)) => self.decode(&storage_key, &text),
            Ok(None) => None,
            Err(e) => {
                warn!(key = %storage_key, error = %e, "Failed to read cache item");
                None
            },
        }
    }

    fn write(&mut self, group: &str, key: &str, entry: Entry) -> bool {
        if self.non_persistent.contains(group) {
            return self.side_table.write(group, key, entry);
        }

        let storage_key = self.storage_key(group, key);
        let text = match Self::encode(&entry) {
            Ok(text) => text,
            Err(e) => {
                warn!(key = %storage_key, error = %e, "Failed to encode cache entry");
                return false;
            },
        };

        match self.medium.set_item(&storage_key, &text) {
            Ok(()) => true,
            Err(e) => {
                warn!(key = %storage_key, error = %e, "Failed to write cache item");
                false
            },
        }
    }

    fn delete(&mut self, group: &str, key: &str) -> bool {
        if self.non_persistent.contains(group) {
            return self.side_table.delete(group, key);
        }

        let storage_key = self.storage_key(group, key);
        match self.medium.remove_item(&storage_key) {
            Ok(()) => true,
            Err(e) => {
                warn!(key = %storage_key, error = %e, "Failed to remove cache item");
                false
            },
        }
    }

    fn clear(&mut self) {
        self.side_table.clear();

        let keys = self.owned_keys();
        for key in &keys {
            self.remove_quietly(key);
        }
        debug!(namespace = %self.namespace, removed = keys.len(), "Flushed durable cache");
    }

    fn is_available(&self) -> bool {
        self.medium.is_available()
    }

    fn add_non_persistent_groups(&mut self, groups: &[String]) {
        self.non_persistent.add(groups);
    }

    fn has_lifecycle(&self) -> bool {
        true
    }

    fn init(&mut self, now: i64) {
        let removed = self.sweep(now);
        debug!(namespace = %self.namespace, removed, "Swept durable cache");
    }

    fn close(&mut self) {
        self.side_table.clear();
    }
}

impl<M: StorageMedium> StoreBackend<DurableStore<M>> {
    /// Creates a durable backend over `medium` using the default namespace.
    ///
    /// Its requirements are met while the medium reports itself available.
    pub fn durable(medium: M, settings: &Settings) -> Self {
        Self::new(DurableStore::new(medium), settings)
    }
}
