//! Backend trait for the cache facade.
//!
//! Defines the capability set every cache backend must provide. The facade
//! only ever talks to backends through this trait, so a new storage strategy
//! can be registered without touching the facade.

use serde_json::{Number, Value};

/// Capability set of a cache backend.
///
/// Arguments arrive already normalized by the facade: `group` is never empty,
/// `expire` is whole seconds from now (0 for no expiry) and `offset` is a plain
/// integer.
///
/// Most backends should not implement this directly but wrap an
/// [`EntryStore`](super::EntryStore) in a [`StoreBackend`](super::StoreBackend),
/// which supplies key namespacing, expiration and clamping.
///
/// # Example
///
/// ```ignore
/// use cachet::{Cache, Settings, StoreBackend};
///
/// let settings = Settings::default();
/// let mut cache = Cache::new(settings.clone());
/// cache.register_implementation("variableStorage", StoreBackend::memory(&settings), 100)?;
/// ```
pub trait CacheBackend: Send + 'static {
    /// Stores `data` unless a live entry already exists.
    fn add(&mut self, key: &str, data: Value, group: &str, expire: i64) -> bool;

    /// Stores `data` only if a live entry already exists.
    fn replace(&mut self, key: &str, data: Value, group: &str, expire: i64) -> bool;

    /// Stores `data` unconditionally.
    fn set(&mut self, key: &str, data: Value, group: &str, expire: i64) -> bool;

    /// Returns a copy of the live payload, deleting the entry if it has expired.
    fn get(&mut self, key: &str, group: &str) -> Option<Value>;

    /// Deletes a live entry. Returns `false` if there was none.
    fn remove(&mut self, key: &str, group: &str) -> bool;

    /// Deletes every entry owned by this backend.
    fn flush(&mut self) -> bool;

    /// Adds `offset` to a live numeric entry, clamping at zero.
    fn incr(&mut self, key: &str, offset: i64, group: &str) -> Option<Number>;

    /// Subtracts `offset` from a live numeric entry, clamping at zero.
    fn decr(&mut self, key: &str, offset: i64, group: &str) -> Option<Number>;

    fn switch_to_site(&mut self, site_id: u64) -> bool;

    fn switch_to_network(&mut self, network_id: u64) -> bool;

    fn add_network_groups(&mut self, groups: &[String]);

    fn add_global_groups(&mut self, groups: &[String]);

    fn add_non_persistent_groups(&mut self, groups: &[String]);

    /// Probes whether the backend can run in this environment.
    ///
    /// Must be free of side effects; it is called before `init` and may be
    /// called any number of times.
    fn check_requirements(&self) -> bool;

    /// Optional init/close hooks.
    ///
    /// Backends without lifecycle needs keep the default `None`.
    fn lifecycle(&mut self) -> Option<&mut dyn Lifecycle> {
        None
    }
}

/// Hooks run when a backend becomes active or is replaced.
pub trait Lifecycle {
    fn init(&mut self);

    fn close(&mut self);
}
