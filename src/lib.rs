//! Tallybook - Single-user financial ledger
//!
//! This library keeps a person's accounts and money flows in one ledger
//! aggregate. Incomes, expenses, and movements between accounts are stored
//! as typed records in per-kind containers, and every mutation goes through
//! a consistency engine that validates and applies balance effects
//! atomically, so account balances and stored records never disagree.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `error`: Custom error types
//! - `models`: Core data models (money, identities, accounts, transactions)
//! - `ledger`: The ledger aggregate and its consistency engine
//! - `exchange`: Comma-delimited import/export of transactions
//! - `snapshot`: Whole-ledger JSON persistence with atomic writes
//!
//! # Example
//!
//! ```rust,ignore
//! use tallybook::{Ledger, SnapshotStore};
//! use tallybook::ledger::Gender;
//!
//! let store = SnapshotStore::open_default()?;
//! let ledger = store
//!     .load("Dana")?
//!     .unwrap_or_else(|| Ledger::new("Dana", 34, Gender::Other));
//! ```

pub mod error;
pub mod exchange;
pub mod ledger;
pub mod models;
pub mod snapshot;

pub use error::{LedgerError, LedgerResult};
pub use ledger::Ledger;
pub use snapshot::SnapshotStore;
