//! Redb-backed storage medium.
//!
//! Gives the durable backend a real persistent store outside a browser: the
//! text table lives in a single redb database file and survives restarts.

use anyhow::Context;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use std::path::Path;
use std::sync::Arc;

use super::StorageMedium;
use crate::error::{Error, Result};

/// Table holding the medium's text items.
pub(crate) const ITEMS_TABLE: TableDefinition<'static, &'static str, &'static str> =
    TableDefinition::new("items");

/// File-backed text table.
///
/// `RedbMedium` is `Clone`; clones share the open database.
#[derive(Clone)]
pub struct RedbMedium {
    db: Arc<Database>,
}

impl RedbMedium {
    /// Opens or creates a redb database at the given path.
    ///
    /// Creates parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory cannot be created
    /// - Database file cannot be opened or created (permissions, disk full, etc.)
    /// - Initialization transaction fails to begin or commit
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create storage directory: {}", parent.display())
            })?;
        }

        let db = Database::create(path)
            .with_context(|| format!("Failed to open storage database: {}", path.display()))?;

        // Create the table up front so reads never see a missing table
        let write_txn = db
            .begin_write()
            .context("Failed to begin initialization transaction")?;
        {
            let _table = write_txn
                .open_table(ITEMS_TABLE)
                .context("Failed to initialize items table")?;
        }
        write_txn
            .commit()
            .context("Failed to commit initialization transaction")?;

        Ok(Self { db: Arc::new(db) })
    }
}

impl StorageMedium for RedbMedium {
    fn is_available(&self) -> bool {
        self.db
            .begin_read()
            .is_ok_and(|txn| txn.open_table(ITEMS_TABLE).is_ok())
    }

    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let read_txn = self.db.begin_read().map_err(|e| Error::storage(key, e))?;
        let table = read_txn
            .open_table(ITEMS_TABLE)
            .map_err(|e| Error::storage(key, e))?;

        let item = table.get(key).map_err(|e| Error::storage(key, e))?;
        Ok(item.map(|guard| guard.value().to_string()))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let write_txn = self.db.begin_write().map_err(|e| Error::storage(key, e))?;
        {
            let mut table = write_txn
                .open_table(ITEMS_TABLE)
                .map_err(|e| Error::storage(key, e))?;
            table
                .insert(key, value)
                .map_err(|e| Error::storage(key, e))?;
        }
        write_txn.commit().map_err(|e| Error::storage(key, e))
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let write_txn = self.db.begin_write().map_err(|e| Error::storage(key, e))?;
        {
            let mut table = write_txn
                .open_table(ITEMS_TABLE)
                .map_err(|e| Error::storage(key, e))?;
            table.remove(key).map_err(|e| Error::storage(key, e))?;
        }
        write_txn.commit().map_err(|e| Error::storage(key, e))
    }

    fn keys(&self) -> Result<Vec<String>> {
        let read_txn = self.db.begin_read().map_err(|e| Error::storage("*", e))?;
        let table = read_txn
            .open_table(ITEMS_TABLE)
            .map_err(|e| Error::storage("*", e))?;

        let mut keys = Vec::new();
        for item in table.iter().map_err(|e| Error::storage("*", e))? {
            let (key, _) = item.map_err(|e| Error::storage("*", e))?;
            keys.push(key.value().to_string());
        }
        Ok(keys)
    }
}
