//! The user aggregate and its consistency engine
//!
//! A [`Ledger`] owns one user's accounts, one transaction container per
//! kind, the set of known category labels, and the identity sequences. All
//! balance mutation happens through the operations in this module, which
//! keep the stored records and the account balances consistent: money is
//! never silently created or destroyed.
//!
//! The engine is single-threaded and synchronous. Every operation runs to
//! completion before the caller proceeds; callers sharing a ledger across
//! threads must serialize access with one mutex around it.

mod accounts;
mod transactions;

pub use accounts::AccountUpdate;
pub use transactions::{TransactionQuery, TransactionUpdate};

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{
    Account, AccountId, IdSequence, TransactionContainer, TransactionType,
};

/// Category of person owning the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Female,
    Male,
    #[default]
    Other,
}

impl Gender {
    /// Parse a gender from a string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "female" => Some(Self::Female),
            "male" => Some(Self::Male),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Female => write!(f, "Female"),
            Self::Male => write!(f, "Male"),
            Self::Other => write!(f, "Other"),
        }
    }
}

/// One user's accounts and transactions
///
/// The whole aggregate is serializable; a snapshot is nothing more than this
/// structure written out and read back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    name: String,
    age: u8,
    gender: Gender,
    accounts: Vec<Account>,
    incomes: TransactionContainer,
    expenses: TransactionContainer,
    movements: TransactionContainer,
    categories: BTreeSet<String>,
    account_ids: IdSequence,
    transaction_ids: IdSequence,
}

impl Ledger {
    /// Create an empty ledger for a user
    pub fn new(name: impl Into<String>, age: u8, gender: Gender) -> Self {
        Self {
            name: name.into(),
            age,
            gender,
            accounts: Vec::new(),
            incomes: TransactionContainer::new(),
            expenses: TransactionContainer::new(),
            movements: TransactionContainer::new(),
            categories: BTreeSet::new(),
            account_ids: IdSequence::new(),
            transaction_ids: IdSequence::new(),
        }
    }

    /// The user's name (also the snapshot key)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The user's age
    pub fn age(&self) -> u8 {
        self.age
    }

    /// The user's gender
    pub fn gender(&self) -> Gender {
        self.gender
    }

    /// All accounts, in creation order
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// Look up an account by identity
    pub fn account(&self, id: AccountId) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }

    /// Look up an account by display name (case-insensitive)
    pub fn account_by_name(&self, name: &str) -> Option<&Account> {
        let needle = name.to_lowercase();
        self.accounts
            .iter()
            .find(|a| a.name.to_lowercase() == needle)
    }

    /// The container holding records of the given type
    pub fn container(&self, transaction_type: TransactionType) -> &TransactionContainer {
        match transaction_type {
            TransactionType::Income => &self.incomes,
            TransactionType::Expense => &self.expenses,
            TransactionType::Movement => &self.movements,
        }
    }

    /// Known category labels, collected from created transactions
    ///
    /// Used for input suggestion only; categories are never validated
    /// against this set.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(String::as_str)
    }

    pub(crate) fn account_mut(&mut self, id: AccountId) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|a| a.id == id)
    }

    pub(crate) fn container_mut(
        &mut self,
        transaction_type: TransactionType,
    ) -> &mut TransactionContainer {
        match transaction_type {
            TransactionType::Income => &mut self.incomes,
            TransactionType::Expense => &mut self.expenses,
            TransactionType::Movement => &mut self.movements,
        }
    }

    pub(crate) fn register_category(&mut self, category: &str) {
        let category = category.trim();
        if !category.is_empty() {
            self.categories.insert(category.to_string());
        }
    }
}
