//! Load/save interface over the three independently keyed values a gallery
//! persists, plus an in-memory backend.

use std::collections::HashMap;
use std::fmt;

pub mod db;

pub mod error {
    use super::Slot;
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum PersistenceError {
        #[error("Database error: {0}")]
        Redb(#[from] redb::DatabaseError),

        #[error("Table error: {0}")]
        TableError(#[from] redb::TableError),

        #[error("Storage error: {0}")]
        StorageError(#[from] redb::StorageError),

        #[error("Transaction error: {0}")]
        TransactionError(#[from] redb::TransactionError),

        #[error("Commit error: {0}")]
        CommitError(#[from] redb::CommitError),

        #[error("IO error: {0}")]
        Io(#[from] std::io::Error),

        #[error("Quota exceeded writing {slot}: {size} bytes exceeds {quota} bytes")]
        QuotaExceeded {
            slot: Slot,
            size: usize,
            quota: usize,
        },
    }
}

use error::PersistenceError;

/// One independently addressable persisted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Mapping username → user record.
    Users,
    /// Sequence of image records in upload order.
    Images,
    /// Active username, or `null`.
    CurrentUser,
}

impl Slot {
    pub const ALL: [Slot; 3] = [Slot::Users, Slot::Images, Slot::CurrentUser];

    pub fn key(self) -> &'static str {
        match self {
            Slot::Users => "users",
            Slot::Images => "images",
            Slot::CurrentUser => "currentUser",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Backing medium for a [`Store`](crate::core::Store).
///
/// Values are JSON documents. A `save` replaces the whole value of a slot and
/// must be all-or-nothing.
pub trait Persistence {
    /// Returns `None` if the slot has never been written.
    fn load(&self, slot: Slot) -> Result<Option<String>, PersistenceError>;

    fn save(&mut self, slot: Slot, value: &str) -> Result<(), PersistenceError>;
}

impl<P: Persistence + ?Sized> Persistence for Box<P> {
    fn load(&self, slot: Slot) -> Result<Option<String>, PersistenceError> {
        (**self).load(slot)
    }

    fn save(&mut self, slot: Slot, value: &str) -> Result<(), PersistenceError> {
        (**self).save(slot, value)
    }
}

/// Non-durable backend with an optional total size quota, in the manner of
/// browser local storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryPersistence {
    values: HashMap<Slot, String>,
    quota: Option<usize>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limits the summed length of all stored values to `quota` bytes.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            values: HashMap::new(),
            quota: Some(quota),
        }
    }

    /// Bytes currently stored across all slots.
    pub fn used(&self) -> usize {
        self.values.values().map(String::len).sum()
    }
}

impl Persistence for MemoryPersistence {
    fn load(&self, slot: Slot) -> Result<Option<String>, PersistenceError> {
        Ok(self.values.get(&slot).cloned())
    }

    fn save(&mut self, slot: Slot, value: &str) -> Result<(), PersistenceError> {
        if let Some(quota) = self.quota {
            let others: usize = self
                .values
                .iter()
                .filter(|(s, _)| **s != slot)
                .map(|(_, v)| v.len())
                .sum();
            let size = others + value.len();
            if size > quota {
                return Err(PersistenceError::QuotaExceeded { slot, size, quota });
            }
        }

        self.values.insert(slot, value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests;
