//! Exchange codec for the comma-delimited transaction format
//!
//! One row per record under a fixed header. Export is a pure read over the
//! flattened containers; import delegates every surviving row back to the
//! ledger's validated construction path, so balance side effects are applied
//! exactly the way a manual entry would apply them.

mod export;
mod import;

pub use export::{export_to_path, export_transactions};
pub use import::{import_from_path, import_transactions, ImportOptions, ImportOutcome};

/// The fixed header of the exchange format
pub const EXCHANGE_HEADER: [&str; 8] = [
    "TransactionId",
    "Type",
    "Amount",
    "From",
    "To",
    "Category",
    "Reason",
    "Date",
];

/// Date format of the exchange format's Date column
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";
