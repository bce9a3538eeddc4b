use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::SettingsError;

/// Opening parameters as typed into the settings form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningParametersForm {
    pub fiscal_year: String,
    pub fiscal_period: String,
    pub initial_cash: String,
    pub initial_accounts: String,
    pub initial_inventory: String,
}

impl Default for OpeningParametersForm {
    fn default() -> Self {
        Self {
            fiscal_year: "2024".into(),
            fiscal_period: "1".into(),
            initial_cash: "0".into(),
            initial_accounts: "0".into(),
            initial_inventory: "0".into(),
        }
    }
}

impl OpeningParametersForm {
    pub fn from_parameters(params: &OpeningParameters) -> Self {
        Self {
            fiscal_year: params.fiscal_year.to_string(),
            fiscal_period: params.fiscal_period.to_string(),
            initial_cash: params.initial_cash.to_string(),
            initial_accounts: params.initial_receivables.to_string(),
            initial_inventory: params.initial_inventory.to_string(),
        }
    }

    pub fn parse(&self) -> Result<OpeningParameters, SettingsError> {
        let fiscal_year: i32 = required(&self.fiscal_year, "fiscal year")?
            .parse()
            .map_err(|_| SettingsError::invalid("fiscal year", "not a year"))?;
        if !(1900..=9999).contains(&fiscal_year) {
            return Err(SettingsError::invalid("fiscal year", "out of range"));
        }

        let fiscal_period: u8 = required(&self.fiscal_period, "fiscal period")?
            .parse()
            .map_err(|_| SettingsError::invalid("fiscal period", "not a number"))?;
        if !(1..=12).contains(&fiscal_period) {
            return Err(SettingsError::invalid("fiscal period", "must be 1 to 12"));
        }

        Ok(OpeningParameters {
            fiscal_year,
            fiscal_period,
            initial_cash: decimal(&self.initial_cash, "initial cash", false)?,
            initial_receivables: decimal(&self.initial_accounts, "initial receivables", true)?,
            initial_inventory: decimal(&self.initial_inventory, "initial inventory", true)?,
        })
    }
}

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, SettingsError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(SettingsError::MissingField(field))
    } else {
        Ok(trimmed)
    }
}

fn decimal(value: &str, field: &'static str, non_negative: bool) -> Result<Decimal, SettingsError> {
    let value = Decimal::from_str(required(value, field)?)
        .map_err(|_| SettingsError::invalid(field, "not a decimal number"))?;
    if non_negative && value < Decimal::ZERO {
        return Err(SettingsError::invalid(field, "must not be negative"));
    }
    Ok(value)
}

/// Fiscal period start and opening balances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningParameters {
    pub fiscal_year: i32,
    /// Month the books open in (1-12).
    pub fiscal_period: u8,
    pub initial_cash: Decimal,
    pub initial_receivables: Decimal,
    pub initial_inventory: Decimal,
}

impl Default for OpeningParameters {
    fn default() -> Self {
        Self {
            fiscal_year: 2024,
            fiscal_period: 1,
            initial_cash: Decimal::ZERO,
            initial_receivables: Decimal::ZERO,
            initial_inventory: Decimal::ZERO,
        }
    }
}

impl OpeningParameters {
    /// Sum of the opening asset balances.
    pub fn opening_assets(&self) -> Decimal {
        self.initial_cash + self.initial_receivables + self.initial_inventory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_form_parses_to_default_parameters() {
        assert_eq!(OpeningParametersForm::default().parse(), Ok(OpeningParameters::default()));
    }

    #[test]
    fn parses_balances() {
        let form = OpeningParametersForm {
            fiscal_period: "4".into(),
            initial_cash: "1500.50".into(),
            initial_accounts: " 200 ".into(),
            ..OpeningParametersForm::default()
        };
        let params = form.parse().unwrap();
        assert_eq!(params.fiscal_period, 4);
        assert_eq!(params.opening_assets(), Decimal::new(170050, 2));
        assert_eq!(OpeningParametersForm::from_parameters(&params).parse().unwrap(), params);
    }

    #[test]
    fn period_must_be_a_month() {
        for bad in ["0", "13", "x"] {
            let form = OpeningParametersForm {
                fiscal_period: bad.into(),
                ..OpeningParametersForm::default()
            };
            assert!(matches!(
                form.parse(),
                Err(SettingsError::Invalid { field: "fiscal period", .. })
            ));
        }
    }

    #[test]
    fn blanks_and_negatives_are_rejected() {
        let blank = OpeningParametersForm {
            initial_cash: "".into(),
            ..OpeningParametersForm::default()
        };
        assert_eq!(blank.parse(), Err(SettingsError::MissingField("initial cash")));

        let negative = OpeningParametersForm {
            initial_inventory: "-1".into(),
            ..OpeningParametersForm::default()
        };
        assert!(matches!(
            negative.parse(),
            Err(SettingsError::Invalid { field: "initial inventory", .. })
        ));
    }
}
