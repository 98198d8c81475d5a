//! Storage media for the durable backend.
//!
//! A medium is a flat string-to-string table in the style of the browser's
//! `localStorage`: the durable backend encodes entries as text and stores them
//! under namespaced keys. Supported media:
//!
//! - **MemoryMedium**: shared in-process table (tests, embedding, hosts that
//!   bridge their own storage)
//! - **RedbMedium**: file-backed table that survives restarts (`redb` feature)

mod memory;
#[cfg(feature = "redb")]
mod redb;

pub use memory::MemoryMedium;
#[cfg(feature = "redb")]
pub use redb::RedbMedium;

use crate::error::Result;

/// Flat text key/value storage used by the durable backend.
pub trait StorageMedium: Send + 'static {
    /// Probes whether the medium can be read and written right now.
    ///
    /// Must not modify stored data.
    fn is_available(&self) -> bool;

    /// Returns the text stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium refuses the write (unavailable, full).
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    fn remove_item(&self, key: &str) -> Result<()>;

    /// Lists every key in the medium, including keys other code owns.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    fn keys(&self) -> Result<Vec<String>>;
}
