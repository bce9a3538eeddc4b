//! Voucher editing session state.

use rust_decimal::Decimal;
use thiserror::Error;

use bookkeep_core::{Amount, DomainError, EntryId, VoucherId};

use crate::chart::ChartOfAccounts;
use crate::entry::LedgerEntry;
use crate::validate::{self, BALANCE_TOLERANCE, VoucherError};
use crate::voucher::Voucher;

/// Editing-time failures (distinct from submission validation).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DraftError {
    #[error("a voucher needs at least one entry")]
    LastEntry,

    #[error("no entry with id {0}")]
    UnknownEntry(EntryId),
}

impl From<DraftError> for DomainError {
    fn from(err: DraftError) -> Self {
        match err {
            DraftError::LastEntry => DomainError::invariant(err.to_string()),
            DraftError::UnknownEntry(_) => DomainError::not_found(err.to_string()),
        }
    }
}

/// Header fields as typed into the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoucherHeader {
    /// `YYYY-MM-DD`.
    pub date: String,
    pub voucher_number: String,
    pub description: String,
}

impl VoucherHeader {
    pub fn new(
        date: impl Into<String>,
        voucher_number: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            voucher_number: voucher_number.into(),
            description: description.into(),
        }
    }
}

/// A single field change on one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryUpdate {
    Account(String),
    Description(String),
    /// A positive debit clears the credit side.
    Debit(Option<Amount>),
    /// A positive credit clears the debit side.
    Credit(Option<Amount>),
}

/// Debit and credit sums over a draft.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Totals {
    pub debit: Decimal,
    pub credit: Decimal,
}

impl Totals {
    pub fn difference(&self) -> Decimal {
        (self.debit - self.credit).abs()
    }

    pub fn is_balanced(&self) -> bool {
        self.difference() <= BALANCE_TOLERANCE
    }
}

/// Live balance indicator shown under the entry table.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Balance {
    Balanced,
    Unbalanced { difference: Decimal },
}

/// Mutable voucher being created or edited.
///
/// Always holds at least one entry. Owned by a single editing session and
/// dropped on cancel or after a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoucherDraft {
    voucher_id: Option<VoucherId>,
    pub header: VoucherHeader,
    entries: Vec<LedgerEntry>,
    receipts: Vec<String>,
    next_entry: u64,
}

impl Default for VoucherDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl VoucherDraft {
    /// Empty draft with one blank entry.
    pub fn new() -> Self {
        Self::with_entries(VoucherHeader::default(), Vec::new())
    }

    /// Draft with the given lines; an empty list becomes one blank entry.
    pub fn with_entries(header: VoucherHeader, entries: Vec<LedgerEntry>) -> Self {
        let next_entry = entries.iter().map(|e| e.id.get()).max().map_or(1, |m| m + 1);
        let mut draft = Self {
            voucher_id: None,
            header,
            entries,
            receipts: Vec::new(),
            next_entry,
        };
        if draft.entries.is_empty() {
            draft.add_entry();
        }
        draft
    }

    /// Draft pre-populated from a stored voucher for editing.
    pub fn from_voucher(voucher: &Voucher) -> Self {
        let header = VoucherHeader::new(
            voucher.date.format("%Y-%m-%d").to_string(),
            voucher.voucher_number.clone(),
            voucher.description.clone(),
        );
        let mut draft = Self::with_entries(header, voucher.entries.clone());
        draft.voucher_id = Some(voucher.id);
        draft.receipts = voucher.receipts.clone();
        draft
    }

    pub fn voucher_id(&self) -> Option<VoucherId> {
        self.voucher_id
    }

    pub fn is_editing(&self) -> bool {
        self.voucher_id.is_some()
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn entry(&self, id: EntryId) -> Option<&LedgerEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Attachment references already stored for this voucher.
    pub fn receipts(&self) -> &[String] {
        &self.receipts
    }

    pub fn attach_receipt(&mut self, reference: impl Into<String>) {
        self.receipts.push(reference.into());
    }

    /// Append a blank entry and return its id.
    pub fn add_entry(&mut self) -> EntryId {
        let id = EntryId::new(self.next_entry);
        self.next_entry += 1;
        self.entries.push(LedgerEntry::blank(id));
        id
    }

    /// Remove an entry. The last remaining entry cannot be removed.
    pub fn remove_entry(&mut self, id: EntryId) -> Result<LedgerEntry, DraftError> {
        let idx = self.position(id)?;
        if self.entries.len() <= 1 {
            return Err(DraftError::LastEntry);
        }
        Ok(self.entries.remove(idx))
    }

    pub fn update_entry(&mut self, id: EntryId, update: EntryUpdate) -> Result<(), DraftError> {
        let idx = self.position(id)?;
        let entry = &mut self.entries[idx];
        match update {
            EntryUpdate::Account(account) => entry.account = account,
            EntryUpdate::Description(description) => entry.description = description,
            EntryUpdate::Debit(amount) => {
                if amount.is_some_and(|a| a.is_positive()) {
                    entry.credit = None;
                }
                entry.debit = amount;
            }
            EntryUpdate::Credit(amount) => {
                if amount.is_some_and(|a| a.is_positive()) {
                    entry.debit = None;
                }
                entry.credit = amount;
            }
        }
        Ok(())
    }

    fn position(&self, id: EntryId) -> Result<usize, DraftError> {
        self.entries
            .iter()
            .position(|e| e.id == id)
            .ok_or(DraftError::UnknownEntry(id))
    }

    pub fn totals(&self) -> Totals {
        self.entries.iter().fold(
            Totals {
                debit: Decimal::ZERO,
                credit: Decimal::ZERO,
            },
            |acc, e| Totals {
                debit: acc.debit.saturating_add(e.debit_value()),
                credit: acc.credit.saturating_add(e.credit_value()),
            },
        )
    }

    pub fn balance(&self) -> Balance {
        let totals = self.totals();
        if totals.is_balanced() {
            Balance::Balanced
        } else {
            Balance::Unbalanced {
                difference: totals.difference(),
            }
        }
    }

    pub fn validate(&self) -> Result<(), VoucherError> {
        validate::validate(self)
    }

    pub fn validate_with_chart(&self, chart: &ChartOfAccounts) -> Result<(), VoucherError> {
        validate::validate_with_chart(self, chart)
    }
}
