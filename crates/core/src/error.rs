//! Error taxonomy shared across the daemon.

use thiserror::Error;

/// Errors produced by supervisor operations and the storage layer.
///
/// `NotFound` / `InvalidArgument` / `Internal` map directly onto the
/// RPC status codes a unary call returns; inside a bulk stream they are
/// instead carried in-band as a plain `error: String` field on the
/// per-id response element.
#[derive(Debug, Error)]
pub enum Pm0Error {
    #[error("unit {0} not found")]
    NotFound(u64),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Internal(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Pm0Error {
    /// Render this error the way a bulk-stream element embeds it: a
    /// plain message, independent of which variant produced it.
    pub fn as_message(&self) -> String {
        self.to_string()
    }
}
