//! Shared key/value semantics over a raw entry store.
//!
//! [`StoreBackend`] implements the whole [`CacheBackend`] contract (composite
//! keys, expiration, add/replace exclusivity, clamped arithmetic) on top of an
//! [`EntryStore`], which only has to read, write and delete entries. Both
//! shipped backends are `StoreBackend`s; a new storage strategy only needs a
//! new `EntryStore`.

use std::sync::Arc;

use serde_json::{Number, Value};
use tracing::debug;

use super::backend::{CacheBackend, Lifecycle};
use super::clock::{Clock, SystemClock};
use super::entry::Entry;
use super::keyspace::Keyspace;
use crate::config::Settings;

/// Raw storage primitive addressed by group and composite key.
pub trait EntryStore: Send + 'static {
    /// Reads the entry stored under `key` in `group`, expired or not.
    ///
    /// Stores that decode entries must delete undecodable slots and report
    /// them as missing.
    fn read(&mut self, group: &str, key: &str) -> Option<Entry>;

    /// Writes an entry, returning `false` if the medium refused the write.
    fn write(&mut self, group: &str, key: &str, entry: Entry) -> bool;

    /// Deletes an entry.
    ///
    /// Callers read the slot first, so stores need not re-check presence.
    /// Returns `false` if the medium refused the delete.
    fn delete(&mut self, group: &str, key: &str) -> bool;

    /// Deletes every entry owned by this store.
    fn clear(&mut self);

    /// Whether the underlying medium is usable. Must not have side effects.
    fn is_available(&self) -> bool {
        true
    }

    /// Routes the given groups away from persistent storage.
    ///
    /// Stores that never persist have nothing to do here.
    fn add_non_persistent_groups(&mut self, _groups: &[String]) {}

    /// Whether [`EntryStore::init`] and [`EntryStore::close`] do anything.
    fn has_lifecycle(&self) -> bool {
        false
    }

    fn init(&mut self, _now: i64) {}

    fn close(&mut self) {}
}

/// A cache backend built from an [`EntryStore`].
pub struct StoreBackend<S> {
    store: S,
    keyspace: Keyspace,
    clock: Arc<dyn Clock>,
}

impl<S: EntryStore> StoreBackend<S> {
    /// Wraps `store`, starting in the scope named by `settings`.
    pub fn new(store: S, settings: &Settings) -> Self {
        Self {
            store,
            keyspace: Keyspace::new(settings),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the time source used for expiration.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn keyspace(&self) -> &Keyspace {
        &self.keyspace
    }

    /// Checks whether a live entry exists, purging it if it has expired.
    pub fn exists(&mut self, key: &str, group: &str) -> bool {
        let composite = self.keyspace.composite_key(key, group);
        self.live(group, &composite).is_some()
    }

    /// Reads a live entry, deleting it if it has expired.
    fn live(&mut self, group: &str, composite: &str) -> Option<Entry> {
        let entry = self.store.read(group, composite)?;
        if entry.is_expired(self.clock.now()) {
            self.store.delete(group, composite);
            debug!(group, key = composite, "Removed expired cache entry");
            return None;
        }
        Some(entry)
    }

    fn adjust(&mut self, key: &str, delta: i64, group: &str) -> Option<Number> {
        let composite = self.keyspace.composite_key(key, group);
        let mut entry = self.live(group, &composite)?;
        let value = entry.adjust(delta);

        if self.store.write(group, &composite, entry) {
            Some(value)
        } else {
            None
        }
    }
}

impl<S: EntryStore> CacheBackend for StoreBackend<S> {
    fn add(&mut self, key: &str, data: Value, group: &str, expire: i64) -> bool {
        if self.exists(key, group) {
            return false;
        }
        self.set(key, data, group, expire)
    }

    fn replace(&mut self, key: &str, data: Value, group: &str, expire: i64) -> bool {
        if !self.exists(key, group) {
            return false;
        }
        self.set(key, data, group, expire)
    }

    fn set(&mut self, key: &str, data: Value, group: &str, expire: i64) -> bool {
        let composite = self.keyspace.composite_key(key, group);
        let entry = Entry::new(data, expire, self.clock.now());
        self.store.write(group, &composite, entry)
    }

    fn get(&mut self, key: &str, group: &str) -> Option<Value> {
        let composite = self.keyspace.composite_key(key, group);
        self.live(group, &composite).map(|entry| entry.data)
    }

    fn remove(&mut self, key: &str, group: &str) -> bool {
        let composite = self.keyspace.composite_key(key, group);
        if self.live(group, &composite).is_none() {
            return false;
        }
        self.store.delete(group, &composite)
    }

    fn flush(&mut self) -> bool {
        self.store.clear();
        true
    }

    fn incr(&mut self, key: &str, offset: i64, group: &str) -> Option<Number> {
        self.adjust(key, offset, group)
    }

    fn decr(&mut self, key: &str, offset: i64, group: &str) -> Option<Number> {
        self.adjust(key, 0i64.saturating_sub(offset), group)
    }

    fn switch_to_site(&mut self, site_id: u64) -> bool {
        self.keyspace.switch_to_site(site_id);
        true
    }

    fn switch_to_network(&mut self, network_id: u64) -> bool {
        self.keyspace.switch_to_network(network_id);
        true
    }

    fn add_network_groups(&mut self, groups: &[String]) {
        self.keyspace.add_network_groups(groups);
    }

    fn add_global_groups(&mut self, groups: &[String]) {
        self.keyspace.add_global_groups(groups);
    }

    fn add_non_persistent_groups(&mut self, groups: &[String]) {
        self.store.add_non_persistent_groups(groups);
    }

    fn check_requirements(&self) -> bool {
        self.store.is_available()
    }

    fn lifecycle(&mut self) -> Option<&mut dyn Lifecycle> {
        if self.store.has_lifecycle() {
            Some(self)
        } else {
            None
        }
    }
}

impl<S: EntryStore> Lifecycle for StoreBackend<S> {
    fn init(&mut self) {
        let now = self.clock.now();
        self.store.init(now);
    }

    fn close(&mut self) {
        self.store.close();
    }
}
