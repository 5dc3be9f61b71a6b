//! Account operations
//!
//! Creation, modification, and deletion of accounts. Deletion policy: an
//! account cannot be removed while any stored transaction still references
//! it as an endpoint; callers must delete or rebind those transactions
//! first. Historical records are never rewritten on account changes.

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Account, AccountId, AccountKind, Money, TransactionType};

use super::Ledger;

/// Optional new values for an account modification
///
/// Unset fields are left as they are.
#[derive(Debug, Clone, Default)]
pub struct AccountUpdate {
    pub name: Option<String>,
    pub kind: Option<AccountKind>,
    pub balance: Option<Money>,
}

impl AccountUpdate {
    /// Create an empty update
    pub fn new() -> Self {
        Self::default()
    }

    /// Rename the account
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Change the account kind
    pub fn kind(mut self, kind: AccountKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Set the balance explicitly
    pub fn balance(mut self, balance: Money) -> Self {
        self.balance = Some(balance);
        self
    }
}

impl Ledger {
    /// Create a new account attached to this ledger
    ///
    /// Fails with a validation error on a blank or overlong name or a
    /// negative initial balance, and with an operation error when the name
    /// is already taken (names must stay unique so the exchange format can
    /// resolve them).
    pub fn create_account(
        &mut self,
        name: &str,
        initial_balance: Money,
        kind: AccountKind,
    ) -> LedgerResult<Account> {
        let name = name.trim();

        if initial_balance.is_negative() {
            return Err(LedgerError::Validation(format!(
                "initial balance cannot be negative, got {}",
                initial_balance
            )));
        }

        if self.account_by_name(name).is_some() {
            return Err(LedgerError::Operation(format!(
                "account name already in use: {}",
                name
            )));
        }

        let id = AccountId::from_raw(self.account_ids.next());
        let account = Account::new(id, name, initial_balance, kind);
        account
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.accounts.push(account.clone());
        Ok(account)
    }

    /// Apply the provided fields of an update to an account
    pub fn modify_account(&mut self, id: AccountId, update: AccountUpdate) -> LedgerResult<Account> {
        if self.account(id).is_none() {
            return Err(LedgerError::account_not_found(id));
        }

        if let Some(balance) = update.balance {
            if balance.is_negative() {
                return Err(LedgerError::Validation(format!(
                    "balance cannot be set negative, got {}",
                    balance
                )));
            }
        }

        if let Some(name) = &update.name {
            let name = name.trim();
            if let Some(existing) = self.account_by_name(name) {
                if existing.id != id {
                    return Err(LedgerError::Operation(format!(
                        "account name already in use: {}",
                        name
                    )));
                }
            }
        }

        // Validate the new name against a copy before touching the account
        if let Some(name) = &update.name {
            let mut candidate = self.account(id).cloned().ok_or_else(|| {
                LedgerError::account_not_found(id)
            })?;
            candidate.name = name.trim().to_string();
            candidate
                .validate()
                .map_err(|e| LedgerError::Validation(e.to_string()))?;
        }

        let account = self
            .account_mut(id)
            .ok_or_else(|| LedgerError::account_not_found(id))?;

        if let Some(name) = update.name {
            account.name = name.trim().to_string();
        }
        if let Some(kind) = update.kind {
            account.kind = kind;
        }
        if let Some(balance) = update.balance {
            account.balance = balance;
        }

        Ok(account.clone())
    }

    /// Detach an account from the ledger
    ///
    /// Fails while any stored transaction still references the account.
    pub fn delete_account(&mut self, id: AccountId) -> LedgerResult<()> {
        if self.account(id).is_none() {
            return Err(LedgerError::account_not_found(id));
        }

        if self.account_is_referenced(id) {
            return Err(LedgerError::Operation(format!(
                "account {} is still referenced by stored transactions",
                id
            )));
        }

        self.accounts.retain(|a| a.id != id);
        Ok(())
    }

    /// Check whether any stored transaction touches the account
    pub fn account_is_referenced(&self, id: AccountId) -> bool {
        [
            TransactionType::Income,
            TransactionType::Expense,
            TransactionType::Movement,
        ]
        .iter()
        .any(|t| self.container(*t).flatten().any(|txn| txn.kind.references(id)))
    }
}
