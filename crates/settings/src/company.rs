use serde::{Deserialize, Serialize};

use crate::SettingsError;

/// Company profile shown on vouchers and reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    pub name: String,
    pub tax_id: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub bank_name: String,
    pub bank_account: String,
    #[serde(default)]
    pub description: String,
}

impl Default for CompanyProfile {
    fn default() -> Self {
        Self {
            name: "示例公司".into(),
            tax_id: "123456789012345".into(),
            address: "北京市朝阳区某街道123号".into(),
            phone: "010-12345678".into(),
            email: "contact@example.com".into(),
            bank_name: "中国银行".into(),
            bank_account: "6222000000000000000".into(),
            description: String::new(),
        }
    }
}

impl CompanyProfile {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.name.trim().is_empty() {
            return Err(SettingsError::MissingField("name"));
        }
        let email = self.email.trim();
        if !email.is_empty() && !looks_like_email(email) {
            return Err(SettingsError::invalid("email", format!("{email:?} is not an address")));
        }
        Ok(())
    }
}

fn looks_like_email(s: &str) -> bool {
    match s.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    }
}
