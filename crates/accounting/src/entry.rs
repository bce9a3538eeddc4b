use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bookkeep_core::{Amount, EntryId};

/// Why a ledger entry cannot be posted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryDefect {
    MissingAccount,
    /// Neither side carries a positive amount.
    NoAmount,
    /// Both sides carry a positive amount.
    BothSides,
    /// The account does not resolve in the chart of accounts.
    UnknownAccount,
}

impl core::fmt::Display for EntryDefect {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            EntryDefect::MissingAccount => "no account selected",
            EntryDefect::NoAmount => "enter either a debit or a credit amount",
            EntryDefect::BothSides => "only one of debit or credit may be filled",
            EntryDefect::UnknownAccount => "account is not in the chart of accounts",
        };
        f.write_str(msg)
    }
}

/// One voucher line, posting an amount to one account on one side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: EntryId,
    /// Account identifier, e.g. `"1001 固定资产"`.
    pub account: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub debit: Option<Amount>,
    #[serde(default)]
    pub credit: Option<Amount>,
}

impl LedgerEntry {
    pub fn blank(id: EntryId) -> Self {
        Self {
            id,
            account: String::new(),
            description: String::new(),
            debit: None,
            credit: None,
        }
    }

    pub fn debit(id: EntryId, account: impl Into<String>, amount: Amount) -> Self {
        Self {
            debit: Some(amount),
            account: account.into(),
            ..Self::blank(id)
        }
    }

    pub fn credit(id: EntryId, account: impl Into<String>, amount: Amount) -> Self {
        Self {
            credit: Some(amount),
            account: account.into(),
            ..Self::blank(id)
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Debit amount, absent counted as zero.
    pub fn debit_value(&self) -> Decimal {
        self.debit.map(|a| a.value()).unwrap_or(Decimal::ZERO)
    }

    /// Credit amount, absent counted as zero.
    pub fn credit_value(&self) -> Decimal {
        self.credit.map(|a| a.value()).unwrap_or(Decimal::ZERO)
    }

    fn has_positive_debit(&self) -> bool {
        self.debit.is_some_and(|a| a.is_positive())
    }

    fn has_positive_credit(&self) -> bool {
        self.credit.is_some_and(|a| a.is_positive())
    }

    /// Entry-level check: account present and exactly one side positive.
    pub fn defect(&self) -> Option<EntryDefect> {
        if self.account.trim().is_empty() {
            return Some(EntryDefect::MissingAccount);
        }
        match (self.has_positive_debit(), self.has_positive_credit()) {
            (true, true) => Some(EntryDefect::BothSides),
            (false, false) => Some(EntryDefect::NoAmount),
            _ => None,
        }
    }
}
