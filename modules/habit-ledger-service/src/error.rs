//! Error taxonomy for ledger operations.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    /// Malformed input: bad calendar date or empty habit name.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Delete target absent, either never created or already removed
    /// by a concurrent delete.
    #[error("habit not found")]
    NotFound,

    /// Backing store unreachable or failed mid-query.
    #[error("storage error: {0}")]
    Store(#[from] rusqlite::Error),
}

pub type LedgerResult<T> = Result<T, LedgerError>;
