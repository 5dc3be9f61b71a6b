//! CSV import
//!
//! Parses exchange rows and replays each one through the ledger's
//! transaction creation path: full validation, funds checks, and balance
//! side effects all apply. Row-level failures are either logged and skipped
//! or abort the import, per the caller's options. Identities are assigned
//! fresh by the ledger; the TransactionId column is informational only.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::error::{LedgerError, LedgerResult};
use crate::ledger::Ledger;
use crate::models::{AccountId, AccountKind, Money, Transaction, TransactionKind, TransactionType};

use super::{DATE_FORMAT, EXCHANGE_HEADER};

/// Options controlling import behavior
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportOptions {
    /// Create zero-balance Bank accounts for unknown account names
    pub auto_create_missing_accounts: bool,
    /// Log invalid rows and continue instead of aborting the import
    pub skip_invalid_rows: bool,
}

/// Result of a completed import
#[derive(Debug, Clone, Default)]
pub struct ImportOutcome {
    /// Records created through the ledger, in row order
    pub imported: Vec<Transaction>,
    /// One entry per failed row, with its line number
    pub errors: Vec<String>,
}

/// Import transactions from a reader into the ledger
///
/// When `skip_invalid_rows` is false the first failing row aborts the
/// import, but rows imported before it keep their applied balance effects;
/// there is no rollback across rows.
pub fn import_transactions<R: Read>(
    ledger: &mut Ledger,
    reader: R,
    options: &ImportOptions,
) -> LedgerResult<ImportOutcome> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| LedgerError::Io(format!("failed to read exchange header: {}", e)))?
        .clone();

    if headers.is_empty() {
        return Err(LedgerError::Io("exchange input is empty".into()));
    }
    if headers.iter().ne(EXCHANGE_HEADER) {
        return Err(LedgerError::Io(format!(
            "exchange header mismatch: expected '{}', got '{}'",
            EXCHANGE_HEADER.join(","),
            headers.iter().collect::<Vec<_>>().join(",")
        )));
    }

    let mut outcome = ImportOutcome::default();

    for (index, row) in csv_reader.records().enumerate() {
        // Header occupies line 1
        let line = index + 2;

        let result = match row {
            Ok(record) => import_row(ledger, &record, options),
            Err(e) => Err(format!("unreadable row: {}", e)),
        };

        match result {
            Ok(txn) => outcome.imported.push(txn),
            Err(message) => {
                let message = format!("line {}: {}", line, message);
                if options.skip_invalid_rows {
                    outcome.errors.push(message);
                } else {
                    return Err(LedgerError::Validation(message));
                }
            }
        }
    }

    Ok(outcome)
}

/// Import transactions from a file into the ledger
pub fn import_from_path<P: AsRef<Path>>(
    ledger: &mut Ledger,
    path: P,
    options: &ImportOptions,
) -> LedgerResult<ImportOutcome> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| LedgerError::Io(format!("failed to open {}: {}", path.display(), e)))?;
    import_transactions(ledger, file, options)
}

/// Parse one data row and replay it through the ledger
fn import_row(
    ledger: &mut Ledger,
    record: &StringRecord,
    options: &ImportOptions,
) -> Result<Transaction, String> {
    if record.len() != EXCHANGE_HEADER.len() {
        return Err(format!(
            "expected {} fields, got {}",
            EXCHANGE_HEADER.len(),
            record.len()
        ));
    }

    let field = |index: usize| record.get(index).unwrap_or("").trim();

    let transaction_type = TransactionType::parse(field(1))
        .ok_or_else(|| format!("unknown transaction type '{}'", field(1)))?;
    let amount =
        Money::parse(field(2)).map_err(|e| format!("invalid amount '{}': {}", field(2), e))?;
    let date = NaiveDate::parse_from_str(field(7), DATE_FORMAT)
        .map_err(|e| format!("invalid date '{}': {}", field(7), e))?;

    let from = field(3);
    let to = field(4);

    let kind = match transaction_type {
        TransactionType::Income => {
            let target = resolve_account(ledger, to, "To", options)?;
            TransactionKind::income(target)
        }
        TransactionType::Expense => {
            let source = resolve_account(ledger, from, "From", options)?;
            TransactionKind::expense(source)
        }
        TransactionType::Movement => {
            let source = resolve_account(ledger, from, "From", options)?;
            let target = resolve_account(ledger, to, "To", options)?;
            TransactionKind::movement(source, target)
        }
    };

    let category = field(5).to_string();
    let reason = field(6).to_string();

    ledger
        .create_transaction(kind, amount, &category, &reason, date)
        .map_err(|e| e.to_string())
}

/// Resolve an account name to an identity, optionally creating it
fn resolve_account(
    ledger: &mut Ledger,
    name: &str,
    column: &str,
    options: &ImportOptions,
) -> Result<AccountId, String> {
    if name.is_empty() {
        return Err(format!("missing account name in column {}", column));
    }

    if let Some(account) = ledger.account_by_name(name) {
        return Ok(account.id);
    }

    if options.auto_create_missing_accounts {
        let account = ledger
            .create_account(name, Money::zero(), AccountKind::Bank)
            .map_err(|e| format!("cannot auto-create account '{}': {}", name, e))?;
        Ok(account.id)
    } else {
        Err(format!("unknown account '{}'", name))
    }
}
