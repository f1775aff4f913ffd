//! The unit table's persistent backing store.

use std::path::Path;

use pm0_core::UnitModel;
use sled::transaction::{ConflictableTransactionError, TransactionError};

use crate::error::StorageError;

/// A handle to the daemon's persisted unit records.
///
/// One record per unit, keyed by the unit's id (big-endian encoded, so
/// iteration order matches id order; `load_all` relies on this only
/// incidentally since the supervisor itself makes no ordering
/// guarantee — the CLI sorts by id on display).
#[derive(Clone)]
pub struct Db {
    tree: sled::Db,
}

fn key_for(id: u64) -> [u8; 8] {
    id.to_be_bytes()
}

impl Db {
    /// Open (creating if absent) the sled database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let tree = sled::open(path)?;
        Ok(Self { tree })
    }

    /// Reserve a new, durable, monotonically increasing id. Calling
    /// this and then never persisting a record under it is harmless —
    /// ids are not required to be contiguous, only unique and stable.
    pub fn reserve_id(&self) -> Result<u64, StorageError> {
        Ok(self.tree.generate_id()?)
    }

    /// Persist (insert or overwrite) a unit record.
    pub fn save(&self, model: &UnitModel) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(model)?;
        self.tree.insert(key_for(model.id), bytes)?;
        self.tree.flush()?;
        Ok(())
    }

    /// Load a single unit record.
    pub fn load(&self, id: u64) -> Result<Option<UnitModel>, StorageError> {
        match self.tree.get(key_for(id))? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Load every persisted unit record, in id order.
    pub fn load_all(&self) -> Result<Vec<UnitModel>, StorageError> {
        let mut out = Vec::new();
        for entry in self.tree.iter() {
            let (_, bytes) = entry?;
            out.push(serde_json::from_slice(&bytes)?);
        }
        Ok(out)
    }

    /// Remove a unit record. Absent ids are a no-op (callers check
    /// presence in the unit table first).
    pub fn delete(&self, id: u64) -> Result<(), StorageError> {
        self.tree.remove(key_for(id))?;
        self.tree.flush()?;
        Ok(())
    }

    /// Atomically bump `restarts_count` and return the updated record,
    /// or `None` if the unit no longer has a persisted record (deleted
    /// out from under a concurrent restart).
    pub fn increment_restarts(&self, id: u64) -> Result<Option<UnitModel>, StorageError> {
        let result = self
            .tree
            .transaction(|tx| {
                let Some(bytes) = tx.get(key_for(id))? else {
                    return Ok(None);
                };
                let mut model: UnitModel = serde_json::from_slice(&bytes).map_err(|e| {
                    ConflictableTransactionError::Abort(StorageError::Serde(e))
                })?;
                model.restarts_count += 1;
                let encoded = serde_json::to_vec(&model).map_err(|e| {
                    ConflictableTransactionError::Abort(StorageError::Serde(e))
                })?;
                tx.insert(&key_for(id), encoded)?;
                Ok(Some(model))
            })
            .map_err(|e: TransactionError<StorageError>| StorageError::from(e))?;
        self.tree.flush()?;
        Ok(result)
    }
}

#[cfg(test)]
#[path = "db_tests.rs"]
mod tests;
