//! Cash journal (流水账): single-sided income and expense records.
//!
//! Pure domain logic only: no IO, no HTTP, no persistence concerns.

pub mod transaction;

pub use transaction::{
    Transaction, TransactionDraft, TransactionError, TransactionField, TransactionFilter,
};
