//! CSV export
//!
//! Emits the fixed header followed by one row per record in flattened
//! traversal order: incomes, then expenses, then movements. The header is
//! written even when the ledger holds no records.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::{LedgerError, LedgerResult};
use crate::ledger::Ledger;
use crate::models::{AccountId, Transaction, TransactionType};

use super::{DATE_FORMAT, EXCHANGE_HEADER};

/// Export all transactions to a writer
pub fn export_transactions<W: Write>(ledger: &Ledger, writer: W) -> LedgerResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(EXCHANGE_HEADER)?;

    for transaction_type in [
        TransactionType::Income,
        TransactionType::Expense,
        TransactionType::Movement,
    ] {
        for txn in ledger.container(transaction_type).flatten() {
            csv_writer.write_record(record_row(ledger, txn))?;
        }
    }

    csv_writer
        .flush()
        .map_err(|e| LedgerError::Io(format!("failed to flush export: {}", e)))?;
    Ok(())
}

/// Export all transactions to a file
pub fn export_to_path<P: AsRef<Path>>(ledger: &Ledger, path: P) -> LedgerResult<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .map_err(|e| LedgerError::Io(format!("failed to create {}: {}", path.display(), e)))?;
    export_transactions(ledger, file)
}

fn record_row(ledger: &Ledger, txn: &Transaction) -> [String; 8] {
    [
        txn.id.raw().to_string(),
        txn.kind.transaction_type().to_string(),
        txn.amount.to_plain_string(),
        endpoint_name(ledger, txn.kind.source()),
        endpoint_name(ledger, txn.kind.target()),
        txn.category.clone(),
        txn.reason.clone(),
        txn.date.format(DATE_FORMAT).to_string(),
    ]
}

/// Account display name for an endpoint, empty when not applicable
fn endpoint_name(ledger: &Ledger, id: Option<AccountId>) -> String {
    id.and_then(|id| ledger.account(id))
        .map(|account| account.name.clone())
        .unwrap_or_default()
}
