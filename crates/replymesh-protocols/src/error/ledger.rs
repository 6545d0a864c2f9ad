//! Usage ledger errors.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// The backing store failed to read or write. Retryable; the record is
    /// never left partially written.
    #[error("Ledger persistence failed: {0}")]
    Persistence(String),
}
