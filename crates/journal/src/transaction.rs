use core::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use bookkeep_core::filter::parse_date;
use bookkeep_core::{DateRange, DomainError, Entity, TextQuery, TransactionId, format_signed};

/// Required transaction form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionField {
    Date,
    Description,
    Amount,
}

impl core::fmt::Display for TransactionField {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            TransactionField::Date => "date",
            TransactionField::Description => "description",
            TransactionField::Amount => "amount",
        })
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransactionError {
    #[error("required field is empty: {0}")]
    MissingField(TransactionField),

    #[error("date is not a valid YYYY-MM-DD date: {0:?}")]
    MalformedDate(String),

    #[error("amount is not a decimal number: {0:?}")]
    MalformedAmount(String),
}

impl From<TransactionError> for DomainError {
    fn from(err: TransactionError) -> Self {
        DomainError::validation(err.to_string())
    }
}

/// A cash-journal record. Positive amounts are income, negative are expenses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub notes: String,
    /// Attachment reference of the uploaded receipt.
    #[serde(default)]
    pub receipt: Option<String>,
}

impl Entity for Transaction {
    type Id = TransactionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    /// Amount as listed: `+12000.00` / `-1500.00`.
    pub fn display_amount(&self) -> String {
        format_signed(self.amount)
    }
}

/// Form state for creating or editing a transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionDraft {
    pub transaction_id: Option<TransactionId>,
    pub date: String,
    pub description: String,
    pub amount: String,
    pub category: String,
    pub notes: String,
    pub receipt: Option<String>,
}

impl TransactionDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_transaction(tx: &Transaction) -> Self {
        Self {
            transaction_id: Some(tx.id),
            date: tx.date.format("%Y-%m-%d").to_string(),
            description: tx.description.clone(),
            amount: tx.amount.to_string(),
            category: tx.category.clone(),
            notes: tx.notes.clone(),
            receipt: tx.receipt.clone(),
        }
    }

    pub fn is_editing(&self) -> bool {
        self.transaction_id.is_some()
    }

    /// Check required fields, then parse date and amount.
    pub fn validate(&self) -> Result<(NaiveDate, Decimal), TransactionError> {
        for (field, value) in [
            (TransactionField::Date, &self.date),
            (TransactionField::Description, &self.description),
            (TransactionField::Amount, &self.amount),
        ] {
            if value.trim().is_empty() {
                return Err(TransactionError::MissingField(field));
            }
        }

        let date = parse_date(&self.date)
            .ok_or_else(|| TransactionError::MalformedDate(self.date.trim().to_string()))?;
        let amount = Decimal::from_str(self.amount.trim())
            .map_err(|_| TransactionError::MalformedAmount(self.amount.trim().to_string()))?;
        Ok((date, amount))
    }

    pub fn into_transaction(self, id: TransactionId) -> Result<Transaction, TransactionError> {
        let (date, amount) = self.validate()?;
        Ok(Transaction {
            id,
            date,
            description: self.description.trim().to_string(),
            amount,
            category: self.category.trim().to_string(),
            notes: self.notes,
            receipt: self.receipt,
        })
    }
}

/// Transaction list filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    /// Matched against description and notes.
    pub query: TextQuery,
    /// Exact category; `None` selects all.
    pub category: Option<String>,
    pub range: DateRange,
}

impl TransactionFilter {
    pub fn new(query: impl AsRef<str>, category: Option<String>, range: DateRange) -> Self {
        Self {
            query: TextQuery::new(query),
            category,
            range,
        }
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        self.range.contains(tx.date)
            && self.category.as_deref().is_none_or(|c| c == tx.category)
            && self
                .query
                .matches_any([tx.description.as_str(), tx.notes.as_str()])
    }

    pub fn apply<'a>(&self, transactions: &'a [Transaction]) -> Vec<&'a Transaction> {
        transactions.iter().filter(|t| self.matches(t)).collect()
    }
}
