//! Durable backend: a single redb file holding one row per slot.

use crate::core::persistence::error::PersistenceError;
use crate::core::persistence::{Persistence, Slot};
use crate::types::Config;
use redb::{ReadableDatabase, ReadableTable, TableDefinition};
use tracing::debug;

/// State table: slot key → JSON document
const STATE_TABLE: TableDefinition<&str, &str> = TableDefinition::new("state");

pub struct RedbPersistence {
    db: redb::Database,
}

impl RedbPersistence {
    /// Creates or opens the database file under the configured data directory.
    pub fn open(config: &Config) -> Result<Self, PersistenceError> {
        std::fs::create_dir_all(&config.base_path)?;

        let db = redb::Database::create(config.db_path())?;

        // Initialize tables
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(STATE_TABLE)?;
        }
        write_txn.commit()?;

        debug!(path = %config.db_path().display(), "opened redb persistence");
        Ok(Self { db })
    }
}

impl Persistence for RedbPersistence {
    fn load(&self, slot: Slot) -> Result<Option<String>, PersistenceError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(STATE_TABLE)?;

        Ok(table.get(slot.key())?.map(|guard| guard.value().to_string()))
    }

    /// Each save is its own committed write transaction.
    fn save(&mut self, slot: Slot, value: &str) -> Result<(), PersistenceError> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(STATE_TABLE)?;
            table.insert(slot.key(), value)?;
        }
        write_txn.commit()?;
        Ok(())
    }
}
