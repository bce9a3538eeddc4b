//! Voucher balance validation.
//!
//! A draft is submittable when its header is complete, every entry posts a
//! positive amount to exactly one side of a named account, and total debits
//! equal total credits within [`BALANCE_TOLERANCE`]. Checks run in that order
//! and the first failure is reported.

use rust_decimal::Decimal;
use thiserror::Error;

use bookkeep_core::{DomainError, format_amount};

use crate::chart::ChartOfAccounts;
use crate::draft::VoucherDraft;
use crate::entry::EntryDefect;

/// Largest debit/credit difference still treated as balanced (0.001).
pub const BALANCE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 3);

/// Required voucher header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    Date,
    VoucherNumber,
    Description,
}

impl core::fmt::Display for HeaderField {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            HeaderField::Date => "date",
            HeaderField::VoucherNumber => "voucher number",
            HeaderField::Description => "description",
        })
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VoucherError {
    #[error("required field is empty: {0}")]
    MissingHeaderField(HeaderField),

    /// `line` is 1-based, in display order.
    #[error("entry {line}: {defect}")]
    InvalidEntry { line: usize, defect: EntryDefect },

    #[error(
        "debit total must equal credit total (debit {}, credit {}, difference {})",
        amount(.debit_total),
        amount(.credit_total),
        difference(.debit_total, .credit_total)
    )]
    Unbalanced {
        debit_total: Decimal,
        credit_total: Decimal,
    },

    #[error("date is not a valid YYYY-MM-DD date: {0:?}")]
    MalformedDate(String),
}

fn amount(value: &Decimal) -> String {
    format_amount(*value)
}

fn difference(debit: &Decimal, credit: &Decimal) -> String {
    format_amount((*debit - *credit).abs())
}

impl VoucherError {
    /// Absolute debit/credit difference for `Unbalanced`.
    pub fn difference(&self) -> Option<Decimal> {
        match self {
            VoucherError::Unbalanced {
                debit_total,
                credit_total,
            } => Some((*debit_total - *credit_total).abs()),
            _ => None,
        }
    }
}

impl From<VoucherError> for DomainError {
    fn from(err: VoucherError) -> Self {
        match err {
            VoucherError::Unbalanced { .. } => DomainError::invariant(err.to_string()),
            _ => DomainError::validation(err.to_string()),
        }
    }
}

/// Decide whether a draft may be submitted. Pure; never touches the draft.
pub fn validate(draft: &VoucherDraft) -> Result<(), VoucherError> {
    let header = &draft.header;
    for (field, value) in [
        (HeaderField::Date, &header.date),
        (HeaderField::VoucherNumber, &header.voucher_number),
        (HeaderField::Description, &header.description),
    ] {
        if value.trim().is_empty() {
            return Err(VoucherError::MissingHeaderField(field));
        }
    }

    for (idx, entry) in draft.entries().iter().enumerate() {
        if let Some(defect) = entry.defect() {
            return Err(VoucherError::InvalidEntry {
                line: idx + 1,
                defect,
            });
        }
    }

    let totals = draft.totals();
    if !totals.is_balanced() {
        return Err(VoucherError::Unbalanced {
            debit_total: totals.debit,
            credit_total: totals.credit,
        });
    }

    Ok(())
}

/// [`validate`], then require every entry's account to exist in `chart`.
pub fn validate_with_chart(draft: &VoucherDraft, chart: &ChartOfAccounts) -> Result<(), VoucherError> {
    validate(draft)?;

    for (idx, entry) in draft.entries().iter().enumerate() {
        if chart.resolve(&entry.account).is_none() {
            return Err(VoucherError::InvalidEntry {
                line: idx + 1,
                defect: EntryDefect::UnknownAccount,
            });
        }
    }
    Ok(())
}
