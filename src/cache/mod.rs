//! Key/value cache with pluggable, prioritized backends.
//!
//! The [`Cache`] facade forwards every operation to the best available
//! backend. Two backends ship with the crate:
//!
//! - **DurableBackend**: JSON entries in a [`StorageMedium`] (preferred)
//! - **MemoryBackend**: process-lifetime maps (fallback)
//!
//! Both are [`StoreBackend`]s and share one implementation of composite keys,
//! expiration and clamped arithmetic.
//!
//! # Custom Backends
//!
//! Implement [`EntryStore`] for a new storage primitive and wrap it in a
//! `StoreBackend`, or implement [`CacheBackend`] directly for full control:
//!
//! ```ignore
//! use cachet::{Cache, EntryStore, Settings, StoreBackend};
//!
//! struct SessionStore { /* ... */ }
//! impl EntryStore for SessionStore { /* ... */ }
//!
//! let settings = Settings::default();
//! let mut cache = Cache::new(settings.clone());
//! cache.register_implementation("session", StoreBackend::new(SessionStore::new(), &settings), 50)?;
//! ```

mod backend;
mod clock;
mod durable;
mod engine;
mod entry;
mod facade;
mod keyspace;
pub mod medium;
mod memory;
mod numeric;

#[cfg(test)]
mod tests;

pub use backend::{CacheBackend, Lifecycle};
pub use clock::{Clock, ManualClock, SystemClock};
pub use durable::{DurableBackend, DurableStore};
pub use engine::{EntryStore, StoreBackend};
pub use entry::Entry;
pub use facade::Cache;
pub use keyspace::{GroupList, Keyspace};
pub use medium::StorageMedium;
pub use memory::{MemoryBackend, MemoryStore};
pub use numeric::Numeric;
