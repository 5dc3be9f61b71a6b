//! Core data models for the ledger
//!
//! This module contains the data structures of the domain: money, identities,
//! accounts, transactions, and the nested transaction container.

pub mod account;
pub mod container;
pub mod ids;
pub mod money;
pub mod transaction;

pub use account::{Account, AccountKind, MAX_ACCOUNT_NAME_LEN};
pub use container::{Flatten, TransactionContainer, TransactionNode};
pub use ids::{AccountId, IdSequence, TransactionId};
pub use money::Money;
pub use transaction::{Transaction, TransactionKind, TransactionType};
