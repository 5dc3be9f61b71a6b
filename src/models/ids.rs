//! Strongly-typed ID wrappers and the identity generator
//!
//! Identities are plain monotonically increasing integers handed out by an
//! [`IdSequence`] owned by the ledger aggregate. There is no process-wide
//! counter: two ledgers number their entities independently, and a restored
//! snapshot picks up exactly where it left off because the sequence is
//! serialized with the rest of the aggregate.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Create an ID from a raw value
            pub const fn from_raw(raw: u64) -> Self {
                Self(raw)
            }

            /// Get the underlying value
            pub const fn raw(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(s.parse()?))
            }
        }
    };
}

define_id!(AccountId, "acc-");
define_id!(TransactionId, "txn-");

/// A monotonic identity generator
///
/// Starts at 1 and never repeats a value within one ledger. Retired
/// identities (from modified or deleted records) are not reused.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdSequence {
    next: u64,
}

impl IdSequence {
    /// Create a fresh sequence starting at 1
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Hand out the next identity value
    pub fn next(&mut self) -> u64 {
        let value = self.next;
        self.next += 1;
        value
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new()
    }
}
