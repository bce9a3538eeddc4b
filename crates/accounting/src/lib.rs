//! Accounting module (chart of accounts, double-entry vouchers).
//!
//! Pure domain logic only: no IO, no HTTP, no persistence concerns.

pub mod chart;
pub mod draft;
pub mod entry;
pub mod validate;
pub mod voucher;

pub use chart::{Account, AccountDraft, AccountError, AccountFilter, AccountKind, ChartOfAccounts};
pub use draft::{Balance, DraftError, EntryUpdate, Totals, VoucherDraft, VoucherHeader};
pub use entry::{EntryDefect, LedgerEntry};
pub use validate::{BALANCE_TOLERANCE, HeaderField, VoucherError, validate, validate_with_chart};
pub use voucher::{Voucher, VoucherFilter};
