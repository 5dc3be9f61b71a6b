//! Snapshot persistence
//!
//! Whole-ledger JSON snapshots with atomic writes and automatic directory
//! creation. One file per ledger, keyed by the ledger's name.

pub mod file_io;
mod store;

pub use file_io::{read_json, write_json_atomic};
pub use store::SnapshotStore;
