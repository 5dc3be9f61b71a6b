//! Transaction operations
//!
//! The consistency engine: creating, modifying, and deleting transactions,
//! applying and reversing their balance effects atomically with the stored
//! record. All preconditions are checked before anything is mutated, so a
//! failed operation leaves no observable partial state. A modification is
//! reverse-then-reapply, never an in-place field edit: the original effect
//! is undone, the new values are validated as if creating fresh, and on
//! failure the original effect is re-applied before the error returns.

use chrono::NaiveDate;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    AccountId, Money, Transaction, TransactionId, TransactionKind, TransactionType,
};

use super::Ledger;

/// Optional new values for a transaction modification
///
/// Unset fields retain the original record's values. The kind's variant is
/// fixed; only the account bindings valid for it may be replaced.
#[derive(Debug, Clone, Default)]
pub struct TransactionUpdate {
    pub amount: Option<Money>,
    pub category: Option<String>,
    pub reason: Option<String>,
    pub date: Option<NaiveDate>,
    pub source: Option<AccountId>,
    pub target: Option<AccountId>,
}

impl TransactionUpdate {
    /// Create an empty update
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the amount
    pub fn amount(mut self, amount: Money) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Replace the category label
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Replace the reason note
    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Replace the date
    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Rebind the source account (expenses and movements)
    pub fn source(mut self, source: AccountId) -> Self {
        self.source = Some(source);
        self
    }

    /// Rebind the target account (incomes and movements)
    pub fn target(mut self, target: AccountId) -> Self {
        self.target = Some(target);
        self
    }
}

/// Filter options for listing transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionQuery {
    /// Restrict to one kind
    pub kind: Option<TransactionType>,
    /// Exact category match (case-insensitive)
    pub category: Option<String>,
    /// Minimum amount, inclusive
    pub min_amount: Option<Money>,
    /// Substring match on the reason (case-insensitive)
    pub reason_contains: Option<String>,
}

impl TransactionQuery {
    /// Create an empty query matching every record
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to one kind
    pub fn kind(mut self, kind: TransactionType) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Filter by category
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Filter by minimum amount
    pub fn min_amount(mut self, minimum: Money) -> Self {
        self.min_amount = Some(minimum);
        self
    }

    /// Filter by substring of the reason
    pub fn reason_contains(mut self, text: impl Into<String>) -> Self {
        self.reason_contains = Some(text.into());
        self
    }

    fn matches(&self, txn: &Transaction) -> bool {
        if let Some(category) = &self.category {
            if !txn.category.eq_ignore_ascii_case(category) {
                return false;
            }
        }
        if let Some(minimum) = self.min_amount {
            if txn.amount < minimum {
                return false;
            }
        }
        if let Some(text) = &self.reason_contains {
            if !txn.reason.to_lowercase().contains(&text.to_lowercase()) {
                return false;
            }
        }
        true
    }
}

impl Ledger {
    /// Create a transaction, applying its balance effect
    ///
    /// Validates the amount and account bindings, checks funds for expenses
    /// and movements before any mutation, then applies the balance delta and
    /// appends the record in one step. On failure no balance has been
    /// touched and no record exists.
    pub fn create_transaction(
        &mut self,
        kind: TransactionKind,
        amount: Money,
        category: &str,
        reason: &str,
        date: NaiveDate,
    ) -> LedgerResult<Transaction> {
        self.check_effect(&kind, amount)?;
        self.apply_effect(&kind, amount);

        let id = TransactionId::from_raw(self.transaction_ids.next());
        let txn = Transaction::new(id, amount, category, reason, date, kind);
        self.register_category(category);
        self.container_mut(kind.transaction_type()).add(txn.clone());

        Ok(txn)
    }

    /// Replace a transaction with new values, keeping balances consistent
    ///
    /// The original identity is retired, not reused. If validation of the
    /// new values fails, the reversal is compensated and the pre-call state
    /// is fully restored.
    pub fn modify_transaction(
        &mut self,
        id: TransactionId,
        update: TransactionUpdate,
    ) -> LedgerResult<Transaction> {
        let original = self
            .transaction(id)
            .cloned()
            .ok_or_else(|| LedgerError::transaction_not_found(id))?;

        self.reverse_effect(&original.kind, original.amount);

        let new_amount = update.amount.unwrap_or(original.amount);
        let checked = rebind_kind(&original.kind, &update)
            .and_then(|kind| self.check_effect(&kind, new_amount).map(|_| kind));

        let new_kind = match checked {
            Ok(kind) => kind,
            Err(err) => {
                // Compensate the reversal; the stored record was never touched
                self.apply_effect(&original.kind, original.amount);
                return Err(err);
            }
        };

        self.apply_effect(&new_kind, new_amount);
        self.remove_record(id);

        let new_id = TransactionId::from_raw(self.transaction_ids.next());
        let category = update.category.unwrap_or(original.category);
        let reason = update.reason.unwrap_or(original.reason);
        let date = update.date.unwrap_or(original.date);

        let txn = Transaction::new(new_id, new_amount, category, reason, date, new_kind);
        self.register_category(&txn.category);
        self.container_mut(new_kind.transaction_type()).add(txn.clone());

        Ok(txn)
    }

    /// Delete a transaction, reversing its balance effect
    ///
    /// Fails if the identity is not found in any container, so a record can
    /// never be reversed twice.
    pub fn delete_transaction(&mut self, id: TransactionId) -> LedgerResult<Transaction> {
        let txn = self
            .remove_record(id)
            .ok_or_else(|| LedgerError::transaction_not_found(id))?;

        self.reverse_effect(&txn.kind, txn.amount);
        Ok(txn)
    }

    /// Look up a transaction by identity across all containers
    pub fn transaction(&self, id: TransactionId) -> Option<&Transaction> {
        self.incomes
            .find(id)
            .or_else(|| self.expenses.find(id))
            .or_else(|| self.movements.find(id))
    }

    /// List transactions across all containers, filtered by a query
    ///
    /// Results are in flattened traversal order (incomes, expenses,
    /// movements).
    pub fn transactions(&self, query: &TransactionQuery) -> Vec<&Transaction> {
        let types: Vec<TransactionType> = match query.kind {
            Some(t) => vec![t],
            None => vec![
                TransactionType::Income,
                TransactionType::Expense,
                TransactionType::Movement,
            ],
        };

        let mut out = Vec::new();
        for t in types {
            for txn in self.container(t).flatten() {
                if query.matches(txn) {
                    out.push(txn);
                }
            }
        }
        out
    }

    /// Validate an effect without mutating anything
    ///
    /// Record-level rules live on [`Transaction`]; this adds the checks only
    /// the ledger can make (endpoint existence, funds).
    fn check_effect(&self, kind: &TransactionKind, amount: Money) -> LedgerResult<()> {
        Transaction::validate_effect(amount, kind)
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        if let Some(target) = kind.target() {
            if self.account(target).is_none() {
                return Err(LedgerError::account_not_found(target));
            }
        }

        if let Some(source) = kind.source() {
            let account = self
                .account(source)
                .ok_or_else(|| LedgerError::account_not_found(source))?;
            if account.balance < amount {
                return Err(LedgerError::insufficient_funds(
                    &account.name,
                    amount,
                    account.balance,
                ));
            }
        }

        Ok(())
    }

    /// Apply a checked effect; both legs of a movement or neither
    fn apply_effect(&mut self, kind: &TransactionKind, amount: Money) {
        if let Some(id) = kind.target() {
            if let Some(account) = self.account_mut(id) {
                account.balance += amount;
            }
        }
        if let Some(id) = kind.source() {
            if let Some(account) = self.account_mut(id) {
                account.balance -= amount;
            }
        }
    }

    /// Apply the inverse of a previously applied effect
    fn reverse_effect(&mut self, kind: &TransactionKind, amount: Money) {
        if let Some(id) = kind.target() {
            if let Some(account) = self.account_mut(id) {
                account.balance -= amount;
            }
        }
        if let Some(id) = kind.source() {
            if let Some(account) = self.account_mut(id) {
                account.balance += amount;
            }
        }
    }

    fn remove_record(&mut self, id: TransactionId) -> Option<Transaction> {
        self.incomes
            .remove(id)
            .or_else(|| self.expenses.remove(id))
            .or_else(|| self.movements.remove(id))
    }
}

/// Build the effective kind for a modification
///
/// Providing an account binding the variant does not have is a validation
/// error; the variant itself never changes.
fn rebind_kind(kind: &TransactionKind, update: &TransactionUpdate) -> LedgerResult<TransactionKind> {
    match *kind {
        TransactionKind::Income { target } => {
            if update.source.is_some() {
                return Err(LedgerError::Validation(
                    "an income has no source account to rebind".into(),
                ));
            }
            Ok(TransactionKind::Income {
                target: update.target.unwrap_or(target),
            })
        }
        TransactionKind::Expense { source } => {
            if update.target.is_some() {
                return Err(LedgerError::Validation(
                    "an expense has no target account to rebind".into(),
                ));
            }
            Ok(TransactionKind::Expense {
                source: update.source.unwrap_or(source),
            })
        }
        TransactionKind::Movement { source, target } => Ok(TransactionKind::Movement {
            source: update.source.unwrap_or(source),
            target: update.target.unwrap_or(target),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Gender;
    use crate::models::AccountKind;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, 1).unwrap()
    }

    fn ledger_with_account(balance: i64) -> (Ledger, AccountId) {
        let mut ledger = Ledger::new("Dana", 34, Gender::Other);
        let account = ledger
            .create_account("Main", Money::from_cents(balance), AccountKind::Bank)
            .unwrap();
        (ledger, account.id)
    }

    fn balance(ledger: &Ledger, id: AccountId) -> Money {
        ledger.account(id).unwrap().balance
    }

    #[test]
    fn test_income_expense_delete_modify_scenario() {
        // Main starts at 1000.00
        let (mut ledger, main) = ledger_with_account(100_000);

        // Income 200.00 -> 1200.00
        let income = ledger
            .create_transaction(
                TransactionKind::income(main),
                Money::from_cents(20_000),
                "salary",
                "bonus",
                date(),
            )
            .unwrap();
        assert_eq!(balance(&ledger, main), Money::from_cents(120_000));

        // Expense 150.00 -> 1050.00
        let expense = ledger
            .create_transaction(
                TransactionKind::expense(main),
                Money::from_cents(15_000),
                "groceries",
                "weekly shop",
                date(),
            )
            .unwrap();
        assert_eq!(balance(&ledger, main), Money::from_cents(105_000));

        // Delete the expense -> 1200.00
        ledger.delete_transaction(expense.id).unwrap();
        assert_eq!(balance(&ledger, main), Money::from_cents(120_000));

        // Modify the income to 50.00 -> 1050.00
        let modified = ledger
            .modify_transaction(
                income.id,
                TransactionUpdate::new().amount(Money::from_cents(5_000)),
            )
            .unwrap();
        assert_eq!(balance(&ledger, main), Money::from_cents(105_000));

        // The original identity is retired, not reused
        assert_ne!(modified.id, income.id);
        assert!(modified.id.raw() > income.id.raw());
        assert!(ledger.transaction(income.id).is_none());
        assert_eq!(
            ledger.transaction(modified.id).unwrap().amount,
            Money::from_cents(5_000)
        );
    }

    #[test]
    fn test_insufficient_funds_leaves_no_partial_state() {
        let (mut ledger, main) = ledger_with_account(50_000);

        let err = ledger
            .create_transaction(
                TransactionKind::expense(main),
                Money::from_cents(999_900),
                "rent",
                "",
                date(),
            )
            .unwrap_err();

        assert!(err.is_operation());
        assert_eq!(balance(&ledger, main), Money::from_cents(50_000));
        assert!(ledger.container(TransactionType::Expense).is_empty());
    }

    #[test]
    fn test_movement_applies_both_legs() {
        let (mut ledger, main) = ledger_with_account(100_000);
        let savings = ledger
            .create_account("Savings", Money::zero(), AccountKind::Investment)
            .unwrap();

        ledger
            .create_transaction(
                TransactionKind::movement(main, savings.id),
                Money::from_cents(30_000),
                "savings",
                "monthly",
                date(),
            )
            .unwrap();

        assert_eq!(balance(&ledger, main), Money::from_cents(70_000));
        assert_eq!(balance(&ledger, savings.id), Money::from_cents(30_000));
    }

    #[test]
    fn test_movement_with_insufficient_funds_touches_neither_leg() {
        let (mut ledger, main) = ledger_with_account(10_000);
        let savings = ledger
            .create_account("Savings", Money::from_cents(500), AccountKind::Bank)
            .unwrap();

        let err = ledger
            .create_transaction(
                TransactionKind::movement(main, savings.id),
                Money::from_cents(20_000),
                "savings",
                "",
                date(),
            )
            .unwrap_err();

        assert!(err.is_operation());
        assert_eq!(balance(&ledger, main), Money::from_cents(10_000));
        assert_eq!(balance(&ledger, savings.id), Money::from_cents(500));
    }

    #[test]
    fn test_movement_to_same_account_rejected() {
        let (mut ledger, main) = ledger_with_account(10_000);

        let err = ledger
            .create_transaction(
                TransactionKind::movement(main, main),
                Money::from_cents(1_000),
                "shuffle",
                "",
                date(),
            )
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(balance(&ledger, main), Money::from_cents(10_000));
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        let (mut ledger, main) = ledger_with_account(10_000);

        for cents in [0, -500] {
            let err = ledger
                .create_transaction(
                    TransactionKind::income(main),
                    Money::from_cents(cents),
                    "salary",
                    "",
                    date(),
                )
                .unwrap_err();
            assert!(err.is_validation());
        }
    }

    #[test]
    fn test_engine_surfaces_record_validation_messages() {
        let (mut ledger, main) = ledger_with_account(10_000);

        let err = ledger
            .create_transaction(TransactionKind::income(main), Money::zero(), "salary", "", date())
            .unwrap_err();
        assert!(err.to_string().contains("amount must be positive"));

        let err = ledger
            .create_transaction(
                TransactionKind::movement(main, main),
                Money::from_cents(100),
                "shuffle",
                "",
                date(),
            )
            .unwrap_err();
        assert!(err
            .to_string()
            .contains("movement source and target are the same account"));
    }

    #[test]
    fn test_unknown_account_rejected() {
        let (mut ledger, _main) = ledger_with_account(10_000);

        let err = ledger
            .create_transaction(
                TransactionKind::income(AccountId::from_raw(99)),
                Money::from_cents(1_000),
                "salary",
                "",
                date(),
            )
            .unwrap_err();
        assert!(err.is_operation());
    }

    #[test]
    fn test_create_then_delete_restores_balances() {
        let (mut ledger, main) = ledger_with_account(100_000);
        let savings = ledger
            .create_account("Savings", Money::from_cents(20_000), AccountKind::Bank)
            .unwrap();

        let txn = ledger
            .create_transaction(
                TransactionKind::movement(main, savings.id),
                Money::from_cents(12_345),
                "savings",
                "",
                date(),
            )
            .unwrap();
        ledger.delete_transaction(txn.id).unwrap();

        assert_eq!(balance(&ledger, main), Money::from_cents(100_000));
        assert_eq!(balance(&ledger, savings.id), Money::from_cents(20_000));
    }

    #[test]
    fn test_delete_twice_does_not_reverse_twice() {
        let (mut ledger, main) = ledger_with_account(100_000);

        let txn = ledger
            .create_transaction(
                TransactionKind::income(main),
                Money::from_cents(5_000),
                "salary",
                "",
                date(),
            )
            .unwrap();

        ledger.delete_transaction(txn.id).unwrap();
        let err = ledger.delete_transaction(txn.id).unwrap_err();
        assert!(err.is_operation());
        assert_eq!(balance(&ledger, main), Money::from_cents(100_000));
    }

    #[test]
    fn test_modify_equals_delete_then_recreate() {
        let (mut ledger_a, main_a) = ledger_with_account(100_000);
        let (mut ledger_b, main_b) = ledger_with_account(100_000);

        let txn_a = ledger_a
            .create_transaction(
                TransactionKind::expense(main_a),
                Money::from_cents(10_000),
                "groceries",
                "",
                date(),
            )
            .unwrap();
        ledger_a
            .modify_transaction(
                txn_a.id,
                TransactionUpdate::new().amount(Money::from_cents(25_000)),
            )
            .unwrap();

        let txn_b = ledger_b
            .create_transaction(
                TransactionKind::expense(main_b),
                Money::from_cents(10_000),
                "groceries",
                "",
                date(),
            )
            .unwrap();
        ledger_b.delete_transaction(txn_b.id).unwrap();
        ledger_b
            .create_transaction(
                TransactionKind::expense(main_b),
                Money::from_cents(25_000),
                "groceries",
                "",
                date(),
            )
            .unwrap();

        assert_eq!(balance(&ledger_a, main_a), balance(&ledger_b, main_b));
    }

    #[test]
    fn test_failed_modify_restores_pre_call_state() {
        let (mut ledger, main) = ledger_with_account(50_000);

        let txn = ledger
            .create_transaction(
                TransactionKind::expense(main),
                Money::from_cents(10_000),
                "groceries",
                "weekly shop",
                date(),
            )
            .unwrap();
        assert_eq!(balance(&ledger, main), Money::from_cents(40_000));

        // Raising the expense beyond available funds must fail and restore
        // the original record and balance
        let err = ledger
            .modify_transaction(
                txn.id,
                TransactionUpdate::new().amount(Money::from_cents(999_900)),
            )
            .unwrap_err();
        assert!(err.is_operation());

        assert_eq!(balance(&ledger, main), Money::from_cents(40_000));
        let stored = ledger.transaction(txn.id).unwrap();
        assert_eq!(stored.amount, Money::from_cents(10_000));
        assert_eq!(stored.reason, "weekly shop");
    }

    #[test]
    fn test_modify_rebinds_accounts_within_kind_rules() {
        let (mut ledger, main) = ledger_with_account(100_000);
        let wallet = ledger
            .create_account("Wallet", Money::zero(), AccountKind::Cash)
            .unwrap();

        let txn = ledger
            .create_transaction(
                TransactionKind::income(main),
                Money::from_cents(5_000),
                "salary",
                "",
                date(),
            )
            .unwrap();

        // Move the income's target to the wallet
        let modified = ledger
            .modify_transaction(txn.id, TransactionUpdate::new().target(wallet.id))
            .unwrap();
        assert_eq!(modified.kind, TransactionKind::income(wallet.id));
        assert_eq!(balance(&ledger, main), Money::from_cents(100_000));
        assert_eq!(balance(&ledger, wallet.id), Money::from_cents(5_000));

        // An income has no source to rebind
        let err = ledger
            .modify_transaction(modified.id, TransactionUpdate::new().source(main))
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(balance(&ledger, wallet.id), Money::from_cents(5_000));
    }

    #[test]
    fn test_modify_missing_transaction() {
        let (mut ledger, _main) = ledger_with_account(10_000);
        let err = ledger
            .modify_transaction(TransactionId::from_raw(42), TransactionUpdate::new())
            .unwrap_err();
        assert!(err.is_operation());
    }

    #[test]
    fn test_balance_conservation() {
        let (mut ledger, main) = ledger_with_account(100_000);
        let savings = ledger
            .create_account("Savings", Money::from_cents(50_000), AccountKind::Bank)
            .unwrap();

        ledger
            .create_transaction(
                TransactionKind::income(main),
                Money::from_cents(20_000),
                "salary",
                "",
                date(),
            )
            .unwrap();
        ledger
            .create_transaction(
                TransactionKind::expense(main),
                Money::from_cents(7_500),
                "groceries",
                "",
                date(),
            )
            .unwrap();
        ledger
            .create_transaction(
                TransactionKind::movement(main, savings.id),
                Money::from_cents(30_000),
                "savings",
                "",
                date(),
            )
            .unwrap();

        // Sum of recorded effects touching each account equals the drift
        // from its initial balance
        let mut drift_main = Money::zero();
        let mut drift_savings = Money::zero();
        for txn in ledger.transactions(&TransactionQuery::new()) {
            if txn.kind.target() == Some(main) {
                drift_main += txn.amount;
            }
            if txn.kind.source() == Some(main) {
                drift_main -= txn.amount;
            }
            if txn.kind.target() == Some(savings.id) {
                drift_savings += txn.amount;
            }
            if txn.kind.source() == Some(savings.id) {
                drift_savings -= txn.amount;
            }
        }

        assert_eq!(
            balance(&ledger, main),
            Money::from_cents(100_000) + drift_main
        );
        assert_eq!(
            balance(&ledger, savings.id),
            Money::from_cents(50_000) + drift_savings
        );
    }

    #[test]
    fn test_query_filters() {
        let (mut ledger, main) = ledger_with_account(100_000);

        ledger
            .create_transaction(
                TransactionKind::income(main),
                Money::from_cents(20_000),
                "Salary",
                "January pay",
                date(),
            )
            .unwrap();
        ledger
            .create_transaction(
                TransactionKind::expense(main),
                Money::from_cents(4_000),
                "groceries",
                "corner store",
                date(),
            )
            .unwrap();
        ledger
            .create_transaction(
                TransactionKind::expense(main),
                Money::from_cents(9_000),
                "groceries",
                "market run",
                date(),
            )
            .unwrap();

        let all = ledger.transactions(&TransactionQuery::new());
        assert_eq!(all.len(), 3);

        let expenses = ledger.transactions(&TransactionQuery::new().kind(TransactionType::Expense));
        assert_eq!(expenses.len(), 2);

        let by_category = ledger.transactions(&TransactionQuery::new().category("GROCERIES"));
        assert_eq!(by_category.len(), 2);

        let big = ledger.transactions(&TransactionQuery::new().min_amount(Money::from_cents(9_000)));
        assert_eq!(big.len(), 2);

        let by_reason = ledger.transactions(&TransactionQuery::new().reason_contains("MARKET"));
        assert_eq!(by_reason.len(), 1);

        let combined = ledger.transactions(
            &TransactionQuery::new()
                .kind(TransactionType::Expense)
                .min_amount(Money::from_cents(5_000)),
        );
        assert_eq!(combined.len(), 1);
    }

    #[test]
    fn test_categories_are_registered_for_suggestion() {
        let (mut ledger, main) = ledger_with_account(100_000);

        ledger
            .create_transaction(
                TransactionKind::income(main),
                Money::from_cents(1_000),
                "salary",
                "",
                date(),
            )
            .unwrap();
        ledger
            .create_transaction(
                TransactionKind::expense(main),
                Money::from_cents(1_000),
                "groceries",
                "",
                date(),
            )
            .unwrap();

        let categories: Vec<&str> = ledger.categories().collect();
        assert_eq!(categories, vec!["groceries", "salary"]);
    }
}
