//! In-process storage medium.
//!
//! Provides a `localStorage`-like string table using DashMap. Clones share the
//! same table, so one handle can be given to a durable backend while another
//! inspects or seeds the raw storage.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashMap;

use super::StorageMedium;
use crate::error::{Error, Result};

/// Shared in-memory text table.
///
/// The medium can be switched off with [`MemoryMedium::set_available`] to
/// emulate hosts where storage is disabled, and given a byte quota to emulate
/// a full storage area.
#[derive(Debug, Clone)]
pub struct MemoryMedium {
    items: Arc<DashMap<String, String>>,
    available: Arc<AtomicBool>,
    quota: Option<usize>,
}

impl Default for MemoryMedium {
    fn default() -> Self {
        Self {
            items: Arc::new(DashMap::new()),
            available: Arc::new(AtomicBool::new(true)),
            quota: None,
        }
    }
}

impl MemoryMedium {
    /// Creates an empty, available medium without a quota.
    pub fn new() -> Self {
        Self::default()
    }

    /// Limits the total size of keys plus values, in bytes.
    #[must_use]
    pub fn with_quota(mut self, bytes: usize) -> Self {
        self.quota = Some(bytes);
        self
    }

    /// Marks the medium as usable or unusable for every clone.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Returns the number of stored items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.items
            .iter()
            .filter(|item| item.key() != key)
            .map(|item| item.key().len() + item.value().len())
            .sum()
    }

    fn ensure_available(&self) -> Result<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(Error::unavailable("memory medium disabled"))
        }
    }
}

impl StorageMedium for MemoryMedium {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.ensure_available()?;
        Ok(self.items.get(key).map(|item| item.value().clone()))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.ensure_available()?;

        if let Some(quota) = self.quota
            && self.used_bytes_without(key) + key.len() + value.len() > quota
        {
            return Err(Error::storage(key, "quota exceeded"));
        }

        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.ensure_available()?;
        self.items.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        self.ensure_available()?;
        Ok(self.items.iter().map(|item| item.key().clone()).collect())
    }
}
