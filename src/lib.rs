//! Pluggable in-process key/value cache.
//!
//! `cachet` presents one cache API while storage is delegated to the best
//! registered backend whose requirements are met. Entries live in groups;
//! groups are scoped to the current site by default, or shared across a
//! network or globally, so one cache can serve several tenants.
//!
//! ```ignore
//! use cachet::{Cache, MemoryMedium, Settings, HOUR_IN_SECONDS};
//! use serde_json::json;
//!
//! let mut cache = Cache::with_storage(Settings::default(), MemoryMedium::new());
//!
//! cache.add_global_groups("options");
//! cache.set("siteurl", json!("https://example.org"), "options", HOUR_IN_SECONDS);
//! cache.set("views", 1, "stats", 0);
//! cache.incr("views", None, "stats");
//! ```

pub mod cache;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;

pub use cache::medium::MemoryMedium;
#[cfg(feature = "redb")]
pub use cache::medium::RedbMedium;
pub use cache::{
    Cache, CacheBackend, Clock, DurableBackend, DurableStore, Entry, EntryStore, GroupList,
    Lifecycle, ManualClock, MemoryBackend, MemoryStore, Numeric, StorageMedium, StoreBackend,
    SystemClock,
};
pub use config::Settings;
pub use constants::{
    DAY_IN_SECONDS, HOUR_IN_SECONDS, MINUTE_IN_SECONDS, WEEK_IN_SECONDS, YEAR_IN_SECONDS,
};
pub use error::{Error, Result};
pub use serde_json::Value;
