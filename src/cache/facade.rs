//! Cache facade and backend registry.
//!
//! [`Cache`] is the single entry point callers use. It owns every registered
//! backend, keeps them ranked by priority and forwards each operation to the
//! active one.
//!
//! # Selection
//!
//! Backends are tried in ascending priority order (lower number first), and in
//! registration order within one priority. The first backend whose
//! requirements are met becomes active. Selection re-runs on registration
//! whenever nothing is active yet or the new backend outranks the active one,
//! so a preferred backend registered late still takes over.
//!
//! # Example
//!
//! ```ignore
//! use cachet::{Cache, MemoryMedium, Settings};
//! use serde_json::json;
//!
//! let mut cache = Cache::with_storage(Settings::default(), MemoryMedium::new());
//! cache.set("greeting", json!("hello"), None, cachet::HOUR_IN_SECONDS);
//! assert_eq!(cache.get("greeting", None), Some(json!("hello")));
//! ```

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde_json::{Number, Value};
use tracing::{debug, info, warn};

use super::backend::CacheBackend;
use super::engine::StoreBackend;
use super::keyspace::GroupList;
use super::medium::StorageMedium;
use super::numeric::Numeric;
use crate::config::Settings;
use crate::constants::{
    DEFAULT_GROUP, DEFAULT_PRIORITY, DURABLE_IDENTIFIER, DURABLE_PRIORITY, MEMORY_IDENTIFIER,
    MEMORY_PRIORITY,
};
use crate::error::{Error, Result};

/// A registered backend and its ranking.
struct Registered {
    identifier: String,
    backend: Box<dyn CacheBackend>,
}

/// Position of a backend: priority bucket and index within it.
type Slot = (i64, usize);

/// Pluggable key/value cache.
pub struct Cache {
    settings: Settings,
    implementations: BTreeMap<i64, Vec<Registered>>,
    active: Option<Slot>,
    /// Set once the missing-backend warning has been logged.
    warned: bool,
    site_id: u64,
    network_id: u64,
}

fn group_or_default(group: Option<&str>) -> &str {
    match group {
        Some(group) if !group.is_empty() => group,
        _ => DEFAULT_GROUP,
    }
}

impl Cache {
    /// Creates a cache with no backends.
    ///
    /// Every operation fails until a backend is registered.
    pub fn new(settings: Settings) -> Self {
        Self {
            site_id: settings.site_id,
            network_id: settings.network_id,
            settings,
            implementations: BTreeMap::new(),
            active: None,
            warned: false,
        }
    }

    /// Creates a cache with the two built-in backends registered.
    ///
    /// The durable backend over `medium` is preferred; the in-memory backend
    /// takes over when the medium is unavailable.
    pub fn with_storage<M: StorageMedium>(settings: Settings, medium: M) -> Self {
        let durable = StoreBackend::durable(medium, &settings);
        let memory = StoreBackend::memory(&settings);

        let mut cache = Self::new(settings);
        cache.insert(DURABLE_IDENTIFIER.to_string(), Box::new(durable), DURABLE_PRIORITY);
        cache.insert(MEMORY_IDENTIFIER.to_string(), Box::new(memory), MEMORY_PRIORITY);
        cache
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Registers a backend under a unique identifier.
    ///
    /// `priority` defaults to 10; lower numbers are preferred. May switch the
    /// active backend before returning.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateImplementation`] if the identifier is taken.
    /// Nothing is registered in that case.
    pub fn register_implementation<B: CacheBackend>(
        &mut self,
        identifier: impl Into<String>,
        backend: B,
        priority: impl Into<Option<i64>>,
    ) -> Result<()> {
        let identifier = identifier.into();
        let priority = priority.into().unwrap_or(DEFAULT_PRIORITY);

        if self
            .registered()
            .any(|(existing, _)| existing == identifier)
        {
            warn!(identifier = %identifier, "Cache implementation already registered");
            return Err(Error::duplicate_implementation(identifier));
        }

        self.insert(identifier, Box::new(backend), priority);
        Ok(())
    }

    fn insert(&mut self, identifier: String, backend: Box<dyn CacheBackend>, priority: i64) {
        debug!(identifier = %identifier, priority, "Registering cache implementation");
        self.implementations
            .entry(priority)
            .or_default()
            .push(Registered {
                identifier,
                backend,
            });

        let outranks_active = self.active.is_none_or(|(active, _)| active > priority);
        if outranks_active {
            self.select();
        }
    }

    /// Registered identifiers with their priorities, in selection order.
    pub fn implementations(&self) -> Vec<(&str, i64)> {
        self.registered().collect()
    }

    fn registered(&self) -> impl Iterator<Item = (&str, i64)> {
        self.implementations.iter().flat_map(|(priority, bucket)| {
            bucket
                .iter()
                .map(move |registered| (registered.identifier.as_str(), *priority))
        })
    }

    /// Identifier of the active backend, if any.
    pub fn active_implementation(&self) -> Option<&str> {
        let (priority, index) = self.active?;
        self.implementations
            .get(&priority)?
            .get(index)
            .map(|registered| registered.identifier.as_str())
    }

    fn slot_mut(&mut self, (priority, index): Slot) -> Option<&mut Registered> {
        self.implementations.get_mut(&priority)?.get_mut(index)
    }

    /// Activates the best backend whose requirements are met.
    fn select(&mut self) {
        let candidate = self.implementations.iter().find_map(|(priority, bucket)| {
            bucket
                .iter()
                .position(|registered| registered.backend.check_requirements())
                .map(|index| (*priority, index))
        });

        let Some(next) = candidate else {
            debug!("No cache implementation meets its requirements");
            return;
        };

        if self.active != Some(next) {
            if let Some(previous) = self.active
                && let Some(registered) = self.slot_mut(previous)
                && let Some(lifecycle) = registered.backend.lifecycle()
            {
                lifecycle.close();
            }

            self.active = Some(next);
            let (site_id, network_id) = (self.site_id, self.network_id);
            if let Some(registered) = self.slot_mut(next) {
                // Carry the current scope over to the new backend
                registered.backend.switch_to_site(site_id);
                registered.backend.switch_to_network(network_id);
                if let Some(lifecycle) = registered.backend.lifecycle() {
                    lifecycle.init();
                }
                info!(
                    identifier = %registered.identifier,
                    priority = next.0,
                    "Activated cache implementation"
                );
            }
        }

        self.warned = false;
    }

    /// Logs the missing-backend warning once per episode.
    fn warn_missing(&mut self) {
        if self.warned {
            return;
        }
        warn!("{}", self.settings.i18n.no_implementation_set);
        self.warned = true;
    }

    fn backend(&mut self) -> Option<&mut Box<dyn CacheBackend>> {
        let Some(slot) = self.active else {
            self.warn_missing();
            return None;
        };
        self.slot_mut(slot).map(|registered| &mut registered.backend)
    }

    /// Adds data unless a live entry already exists for the key and group.
    pub fn add<'g>(
        &mut self,
        key: &str,
        data: impl Into<Value>,
        group: impl Into<Option<&'g str>>,
        expire: impl Into<Numeric>,
    ) -> bool {
        let group = group_or_default(group.into());
        let expire = expire.into().resolve(0);
        let Some(backend) = self.backend() else {
            return false;
        };
        backend.add(key, data.into(), group, expire)
    }

    /// Replaces data only if a live entry exists for the key and group.
    pub fn replace<'g>(
        &mut self,
        key: &str,
        data: impl Into<Value>,
        group: impl Into<Option<&'g str>>,
        expire: impl Into<Numeric>,
    ) -> bool {
        let group = group_or_default(group.into());
        let expire = expire.into().resolve(0);
        let Some(backend) = self.backend() else {
            return false;
        };
        backend.replace(key, data.into(), group, expire)
    }

    /// Stores data, overwriting any existing entry.
    ///
    /// `expire` is in seconds from now; 0 means the entry never expires.
    pub fn set<'g>(
        &mut self,
        key: &str,
        data: impl Into<Value>,
        group: impl Into<Option<&'g str>>,
        expire: impl Into<Numeric>,
    ) -> bool {
        let group = group_or_default(group.into());
        let expire = expire.into().resolve(0);
        let Some(backend) = self.backend() else {
            return false;
        };
        backend.set(key, data.into(), group, expire)
    }

    /// Returns the cached data, or `None` on a miss.
    pub fn get<'g>(&mut self, key: &str, group: impl Into<Option<&'g str>>) -> Option<Value> {
        let group = group_or_default(group.into());
        self.backend()?.get(key, group)
    }

    /// Returns the cached data decoded as `T`.
    ///
    /// Data that does not decode as `T` counts as a miss; the entry is kept.
    pub fn get_as<'g, T: DeserializeOwned>(
        &mut self,
        key: &str,
        group: impl Into<Option<&'g str>>,
    ) -> Option<T> {
        let value = self.get(key, group)?;
        match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                debug!(key, error = %e, "Cached value has an unexpected shape");
                None
            },
        }
    }

    /// Removes the entry for the key and group.
    pub fn remove<'g>(&mut self, key: &str, group: impl Into<Option<&'g str>>) -> bool {
        let group = group_or_default(group.into());
        let Some(backend) = self.backend() else {
            return false;
        };
        backend.remove(key, group)
    }

    /// Removes every entry held by the active backend.
    pub fn flush(&mut self) -> bool {
        let Some(backend) = self.backend() else {
            return false;
        };
        backend.flush()
    }

    /// Increments a numeric entry, returning the new value.
    ///
    /// `offset` defaults to 1. Results never go below zero.
    pub fn incr<'g>(
        &mut self,
        key: &str,
        offset: impl Into<Numeric>,
        group: impl Into<Option<&'g str>>,
    ) -> Option<Number> {
        let offset = offset.into().resolve(1);
        let group = group_or_default(group.into());
        self.backend()?.incr(key, offset, group)
    }

    /// Decrements a numeric entry, returning the new value.
    ///
    /// `offset` defaults to 1. Results never go below zero.
    pub fn decr<'g>(
        &mut self,
        key: &str,
        offset: impl Into<Numeric>,
        group: impl Into<Option<&'g str>>,
    ) -> Option<Number> {
        let offset = offset.into().resolve(1);
        let group = group_or_default(group.into());
        self.backend()?.decr(key, offset, group)
    }

    /// Switches the site used for site-scoped groups.
    ///
    /// Always succeeds without touching the backend on single-site installs or
    /// when `site_id` is already current.
    pub fn switch_to_site(&mut self, site_id: u64) -> bool {
        if !self.settings.is_multisite || site_id == self.site_id {
            return true;
        }
        let Some(backend) = self.backend() else {
            return false;
        };
        let switched = backend.switch_to_site(site_id);
        if switched {
            self.site_id = site_id;
        }
        switched
    }

    /// Switches the network used for network groups.
    ///
    /// Same short-circuit rules as [`Cache::switch_to_site`].
    pub fn switch_to_network(&mut self, network_id: u64) -> bool {
        if !self.settings.is_multisite || network_id == self.network_id {
            return true;
        }
        let Some(backend) = self.backend() else {
            return false;
        };
        let switched = backend.switch_to_network(network_id);
        if switched {
            self.network_id = network_id;
        }
        switched
    }

    /// Marks groups as shared by all sites of the current network.
    pub fn add_network_groups(&mut self, groups: impl Into<GroupList>) {
        let groups = groups.into();
        if let Some(backend) = self.backend() {
            backend.add_network_groups(groups.as_slice());
        }
    }

    /// Marks groups as shared by all sites and networks.
    pub fn add_global_groups(&mut self, groups: impl Into<GroupList>) {
        let groups = groups.into();
        if let Some(backend) = self.backend() {
            backend.add_global_groups(groups.as_slice());
        }
    }

    /// Keeps groups out of persistent storage.
    pub fn add_non_persistent_groups(&mut self, groups: impl Into<GroupList>) {
        let groups = groups.into();
        if let Some(backend) = self.backend() {
            backend.add_non_persistent_groups(groups.as_slice());
        }
    }

    /// Runs the active backend's init hook, if it has one.
    pub fn init(&mut self) {
        if let Some(backend) = self.backend()
            && let Some(lifecycle) = backend.lifecycle()
        {
            lifecycle.init();
        }
    }

    /// Runs the active backend's close hook, if it has one.
    pub fn close(&mut self) {
        if let Some(backend) = self.backend()
            && let Some(lifecycle) = backend.lifecycle()
        {
            lifecycle.close();
        }
    }
}
