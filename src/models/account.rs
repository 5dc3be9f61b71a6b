//! Account model
//!
//! A named balance-holding entity. Balances are mutated only by the ledger
//! operations, as the side effect of a transaction change or an explicit
//! modify; nothing else in the crate touches them.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::AccountId;
use super::money::Money;

/// Maximum length of an account display name
pub const MAX_ACCOUNT_NAME_LEN: usize = 60;

/// Category of a financial account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    /// Bank account
    #[default]
    Bank,
    /// Investment account
    Investment,
    /// Cash/wallet
    Cash,
}

impl AccountKind {
    /// Parse an account kind from a string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bank" => Some(Self::Bank),
            "investment" => Some(Self::Investment),
            "cash" => Some(Self::Cash),
            _ => None,
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bank => write!(f, "Bank"),
            Self::Investment => write!(f, "Investment"),
            Self::Cash => write!(f, "Cash"),
        }
    }
}

/// A financial account
///
/// The identity is assigned on creation and never changes. The balance may
/// dip below zero only as an intermediate artifact of reversing a previously
/// applied transaction; creation and explicit modification reject negative
/// balances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier
    pub id: AccountId,

    /// Display name (e.g., "Main Checking")
    pub name: String,

    /// Current balance
    pub balance: Money,

    /// Kind of account
    pub kind: AccountKind,
}

impl Account {
    /// Create a new account (identities come from the ledger's sequence)
    pub(crate) fn new(
        id: AccountId,
        name: impl Into<String>,
        balance: Money,
        kind: AccountKind,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            balance,
            kind,
        }
    }

    /// Validate the account's name rules
    pub fn validate(&self) -> Result<(), AccountValidationError> {
        if self.name.trim().is_empty() {
            return Err(AccountValidationError::EmptyName);
        }

        if self.name.len() > MAX_ACCOUNT_NAME_LEN {
            return Err(AccountValidationError::NameTooLong(self.name.len()));
        }

        Ok(())
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) {}", self.name, self.kind, self.balance)
    }
}

/// Validation errors for accounts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountValidationError {
    EmptyName,
    NameTooLong(usize),
}

impl fmt::Display for AccountValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "account name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(
                    f,
                    "account name too long ({} chars, max {})",
                    len, MAX_ACCOUNT_NAME_LEN
                )
            }
        }
    }
}

impl std::error::Error for AccountValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_account(name: &str) -> Account {
        Account::new(
            AccountId::from_raw(1),
            name,
            Money::from_cents(100000),
            AccountKind::Bank,
        )
    }

    #[test]
    fn test_validation() {
        assert!(test_account("Main Checking").validate().is_ok());

        assert_eq!(
            test_account("   ").validate(),
            Err(AccountValidationError::EmptyName)
        );

        let long_name = "a".repeat(MAX_ACCOUNT_NAME_LEN + 1);
        assert!(matches!(
            test_account(&long_name).validate(),
            Err(AccountValidationError::NameTooLong(_))
        ));
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!(AccountKind::parse("bank"), Some(AccountKind::Bank));
        assert_eq!(AccountKind::parse("CASH"), Some(AccountKind::Cash));
        assert_eq!(
            AccountKind::parse("Investment"),
            Some(AccountKind::Investment)
        );
        assert_eq!(AccountKind::parse("credit"), None);
    }

    #[test]
    fn test_serialization() {
        let account = test_account("Savings");
        let json = serde_json::to_string(&account).unwrap();
        let deserialized: Account = serde_json::from_str(&json).unwrap();
        assert_eq!(account, deserialized);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            format!("{}", test_account("Main")),
            "Main (Bank) $1000.00"
        );
    }
}
