//! Error types for the tallybook ledger core
//!
//! Four error kinds cover everything the core can report: malformed input,
//! operations that are illegal in the current state, exchange-file I/O, and
//! snapshot persistence failures. All of them propagate to the immediate
//! caller; the core never swallows an error.

use thiserror::Error;

use crate::models::Money;

/// The main error type for ledger operations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Malformed or out-of-range input (blank names, non-positive amounts,
    /// account bindings that violate the kind's rules)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Valid input that is illegal in the current state (insufficient funds,
    /// account still referenced, transaction not found)
    #[error("Operation error: {0}")]
    Operation(String),

    /// Exchange file open/read/write failures and schema mismatches
    #[error("I/O error: {0}")]
    Io(String),

    /// Snapshot records that are unwritable, unreadable, or corrupt
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl LedgerError {
    /// Create an "account not found" operation error
    pub fn account_not_found(identifier: impl std::fmt::Display) -> Self {
        Self::Operation(format!("account not found: {}", identifier))
    }

    /// Create a "transaction not found" operation error
    pub fn transaction_not_found(identifier: impl std::fmt::Display) -> Self {
        Self::Operation(format!("transaction not found: {}", identifier))
    }

    /// Create an "insufficient funds" operation error
    pub fn insufficient_funds(account: &str, needed: Money, available: Money) -> Self {
        Self::Operation(format!(
            "insufficient funds in account '{}': need {}, have {}",
            account, needed, available
        ))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is an operation error
    pub fn is_operation(&self) -> bool {
        matches!(self, Self::Operation(_))
    }

    /// Check if this is an I/O error
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_))
    }

    /// Check if this is a persistence error
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<csv::Error> for LedgerError {
    fn from(err: csv::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Result type alias for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
