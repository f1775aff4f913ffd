//! Storage error taxonomy.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Db(#[from] sled::Error),

    #[error("database transaction error: {0}")]
    Transaction(String),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl<E: std::fmt::Display> From<sled::transaction::TransactionError<E>> for StorageError {
    fn from(e: sled::transaction::TransactionError<E>) -> Self {
        StorageError::Transaction(e.to_string())
    }
}
