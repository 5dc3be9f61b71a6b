//! Transaction model
//!
//! A transaction is an immutable-identity record of one of three kinds.
//! The kind is a tagged variant carrying only the account bindings valid
//! for it, so a record can never hold an account it should not have.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AccountId, TransactionId};
use super::money::Money;

/// The three kinds of transactions, without their account bindings
///
/// Used wherever only the discriminant matters: container addressing,
/// listing filters, and the exchange format's Type column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
    Movement,
}

impl TransactionType {
    /// Parse a type from its exchange-format label (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "INCOME" => Some(Self::Income),
            "EXPENSE" => Some(Self::Expense),
            "MOVEMENT" => Some(Self::Movement),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "INCOME"),
            Self::Expense => write!(f, "EXPENSE"),
            Self::Movement => write!(f, "MOVEMENT"),
        }
    }
}

/// A transaction kind with its account bindings
///
/// The stored kind and the balance delta applied for it always match; the
/// ledger never mutates one without the other. A Movement binds two distinct
/// accounts and both of its legs are applied together or not at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money entering the ledger from outside
    Income { target: AccountId },
    /// Money leaving the ledger
    Expense { source: AccountId },
    /// Money moving between two accounts
    Movement {
        source: AccountId,
        target: AccountId,
    },
}

impl TransactionKind {
    /// Build an income bound to its target account
    pub fn income(target: AccountId) -> Self {
        Self::Income { target }
    }

    /// Build an expense bound to its source account
    pub fn expense(source: AccountId) -> Self {
        Self::Expense { source }
    }

    /// Build a movement between two accounts
    pub fn movement(source: AccountId, target: AccountId) -> Self {
        Self::Movement { source, target }
    }

    /// The account this kind draws from, if any
    pub fn source(&self) -> Option<AccountId> {
        match self {
            Self::Income { .. } => None,
            Self::Expense { source } => Some(*source),
            Self::Movement { source, .. } => Some(*source),
        }
    }

    /// The account this kind pays into, if any
    pub fn target(&self) -> Option<AccountId> {
        match self {
            Self::Income { target } => Some(*target),
            Self::Expense { .. } => None,
            Self::Movement { target, .. } => Some(*target),
        }
    }

    /// The discriminant without account bindings
    pub fn transaction_type(&self) -> TransactionType {
        match self {
            Self::Income { .. } => TransactionType::Income,
            Self::Expense { .. } => TransactionType::Expense,
            Self::Movement { .. } => TransactionType::Movement,
        }
    }

    /// Check whether this kind references the given account as an endpoint
    pub fn references(&self, id: AccountId) -> bool {
        self.source() == Some(id) || self.target() == Some(id)
    }
}

/// A financial transaction
///
/// Identity and amount are fixed for the record's lifetime; amounts are
/// strictly positive, with direction encoded by the kind. Records are
/// constructed only by the ledger operations so the balance effect is
/// applied exactly once per record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier, monotonically assigned
    pub id: TransactionId,

    /// Amount, strictly positive
    pub amount: Money,

    /// Free-form category label
    pub category: String,

    /// Free-form note
    pub reason: String,

    /// Transaction date
    pub date: NaiveDate,

    /// Kind with account bindings
    pub kind: TransactionKind,
}

impl Transaction {
    /// Create a new record (identities come from the ledger's sequence)
    pub(crate) fn new(
        id: TransactionId,
        amount: Money,
        category: impl Into<String>,
        reason: impl Into<String>,
        date: NaiveDate,
        kind: TransactionKind,
    ) -> Self {
        Self {
            id,
            amount,
            category: category.into(),
            reason: reason.into(),
            date,
            kind,
        }
    }

    /// Validate the record's invariants
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        Self::validate_effect(self.amount, &self.kind)
    }

    /// Validate an amount/kind pairing before a record exists
    ///
    /// The single home of the record-level rules; `validate` and the
    /// ledger's effect checking both route through it.
    pub fn validate_effect(
        amount: Money,
        kind: &TransactionKind,
    ) -> Result<(), TransactionValidationError> {
        if !amount.is_positive() {
            return Err(TransactionValidationError::NonPositiveAmount(amount));
        }

        if let TransactionKind::Movement { source, target } = *kind {
            if source == target {
                return Err(TransactionValidationError::SameAccountMovement(source));
            }
        }

        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.date.format("%Y-%m-%d"),
            self.kind.transaction_type(),
            self.amount,
            self.category
        )
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    NonPositiveAmount(Money),
    SameAccountMovement(AccountId),
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount(amount) => {
                write!(f, "amount must be positive, got {}", amount)
            }
            Self::SameAccountMovement(id) => {
                write!(f, "movement source and target are the same account ({})", id)
            }
        }
    }
}

impl std::error::Error for TransactionValidationError {}
