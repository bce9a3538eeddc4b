//! Monetary amounts.
//!
//! Amounts are exact decimals. Display is always rounded to two places
//! (half away from zero), matching how totals are shown on screen.

use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::value_object::ValueObject;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("not a decimal number: {0:?}")]
    Malformed(String),

    #[error("amount must not be negative: {0}")]
    Negative(Decimal),

    #[error("amount is larger than 1000000000000000: {0}")]
    TooLarge(Decimal),
}

/// Non-negative decimal amount posted to one side of a ledger entry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl ValueObject for Amount {}

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// Largest accepted amount, 10^15. Keeps voucher totals far from the
    /// `Decimal` range.
    pub const MAX: Amount = Amount(Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0));

    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(AmountError::Negative(value));
        }
        if value > Self::MAX.0 {
            return Err(AmountError::TooLarge(value));
        }
        Ok(Self(value))
    }

    /// Parse a form field. Blank input means "no amount".
    pub fn parse(input: &str) -> Result<Option<Self>, AmountError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        let value =
            Decimal::from_str(trimmed).map_err(|_| AmountError::Malformed(trimmed.to_string()))?;
        Self::new(value).map(Some)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = AmountError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(value: Amount) -> Self {
        value.0
    }
}

impl From<u32> for Amount {
    fn from(value: u32) -> Self {
        Self(Decimal::from(value))
    }
}

impl core::fmt::Display for Amount {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&format_amount(self.0))
    }
}

/// Render a decimal with exactly two fractional digits.
pub fn format_amount(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}

/// Render a signed amount the way the cash journal shows it: `+12000.00`, `-850.00`.
pub fn format_signed(value: Decimal) -> String {
    let body = format_amount(value);
    if value > Decimal::ZERO {
        format!("+{body}")
    } else {
        body
    }
}
