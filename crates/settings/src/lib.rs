//! Settings area: company profile and opening parameters.

pub mod company;
pub mod opening;

pub use company::CompanyProfile;
pub use opening::{OpeningParameters, OpeningParametersForm};

use bookkeep_core::DomainError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("required field is empty: {0}")]
    MissingField(&'static str),

    #[error("{field} is invalid: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl SettingsError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

impl From<SettingsError> for DomainError {
    fn from(err: SettingsError) -> Self {
        DomainError::validation(err.to_string())
    }
}
