use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use bookkeep_core::{AccountId, DomainError, Entity, TextQuery};

/// High-level account kind (determines which statement the account lands on).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Asset,
    Liability,
    Equity,
    Revenue,
    Expense,
}

impl AccountKind {
    /// Selector order used by the account form.
    pub const ALL: [AccountKind; 5] = [
        AccountKind::Asset,
        AccountKind::Liability,
        AccountKind::Equity,
        AccountKind::Revenue,
        AccountKind::Expense,
    ];

    /// Label shown in the chart-of-accounts screens.
    pub fn label(&self) -> &'static str {
        match self {
            AccountKind::Asset => "资产",
            AccountKind::Liability => "负债",
            AccountKind::Equity => "所有者权益",
            AccountKind::Revenue => "收入",
            AccountKind::Expense => "费用",
        }
    }
}

impl core::fmt::Display for AccountKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AccountKind {
    type Err = AccountError;

    /// Accepts either the screen label or the lowercase English name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        AccountKind::ALL
            .into_iter()
            .find(|k| k.label() == s || format!("{k:?}").eq_ignore_ascii_case(s))
            .ok_or_else(|| AccountError::UnknownKind(s.to_string()))
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccountError {
    #[error("required field is empty: {0}")]
    MissingField(&'static str),

    #[error("unknown account kind: {0:?}")]
    UnknownKind(String),

    #[error("account code already exists: {0}")]
    DuplicateCode(String),

    #[error("account code must not contain whitespace: {0:?}")]
    InvalidCode(String),
}

impl From<AccountError> for DomainError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::DuplicateCode(_) => DomainError::conflict(err.to_string()),
            _ => DomainError::validation(err.to_string()),
        }
    }
}

/// Chart-of-accounts entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub code: String, // e.g. "1001"
    pub name: String, // e.g. "固定资产"
    pub kind: AccountKind,
}

impl Account {
    /// The identifier ledger entries carry, e.g. `"1001 固定资产"`.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.code, self.name)
    }
}

impl Entity for Account {
    type Id = AccountId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Editable form state for creating or editing an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountDraft {
    pub account_id: Option<AccountId>,
    pub code: String,
    pub name: String,
    pub kind: AccountKind,
}

impl Default for AccountDraft {
    fn default() -> Self {
        Self {
            account_id: None,
            code: String::new(),
            name: String::new(),
            kind: AccountKind::Asset,
        }
    }
}

impl AccountDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_account(account: &Account) -> Self {
        Self {
            account_id: Some(account.id),
            code: account.code.clone(),
            name: account.name.clone(),
            kind: account.kind,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.account_id.is_some()
    }

    pub fn validate(&self) -> Result<(), AccountError> {
        let code = self.code.trim();
        if code.is_empty() {
            return Err(AccountError::MissingField("code"));
        }
        // Entries name an account as "<code> <name>"; the code is the first token.
        if code.contains(char::is_whitespace) {
            return Err(AccountError::InvalidCode(code.to_string()));
        }
        if self.name.trim().is_empty() {
            return Err(AccountError::MissingField("name"));
        }
        Ok(())
    }

    pub fn into_account(self, id: AccountId) -> Result<Account, AccountError> {
        self.validate()?;
        Ok(Account {
            id,
            code: self.code.trim().to_string(),
            name: self.name.trim().to_string(),
            kind: self.kind,
        })
    }
}

/// The enumerated set of accounts ledger entries may reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartOfAccounts {
    accounts: Vec<Account>,
}

impl ChartOfAccounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a list, rejecting duplicate codes.
    pub fn from_accounts(accounts: impl IntoIterator<Item = Account>) -> Result<Self, AccountError> {
        let mut chart = Self::new();
        for account in accounts {
            chart.insert(account)?;
        }
        Ok(chart)
    }

    pub fn insert(&mut self, account: Account) -> Result<(), AccountError> {
        if self.by_code(&account.code).is_some() {
            return Err(AccountError::DuplicateCode(account.code));
        }
        self.accounts.push(account);
        Ok(())
    }

    pub fn by_code(&self, code: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.code == code)
    }

    /// Resolve a ledger entry's account identifier.
    ///
    /// Accepts the bare code (`"1001"`) or the display form (`"1001 固定资产"`);
    /// the code is the first whitespace-separated token.
    pub fn resolve(&self, identifier: &str) -> Option<&Account> {
        let code = identifier.split_whitespace().next()?;
        self.by_code(code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.accounts.iter()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

/// Account list filter: code/name search plus an optional kind selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountFilter {
    pub query: TextQuery,
    /// `None` selects every kind.
    pub kind: Option<AccountKind>,
}

impl AccountFilter {
    pub fn new(query: impl AsRef<str>, kind: Option<AccountKind>) -> Self {
        Self {
            query: TextQuery::new(query),
            kind,
        }
    }

    pub fn matches(&self, account: &Account) -> bool {
        self.query.matches_any([account.code.as_str(), account.name.as_str()])
            && self.kind.is_none_or(|k| k == account.kind)
    }

    pub fn apply<'a>(&self, accounts: &'a [Account]) -> Vec<&'a Account> {
        accounts.iter().filter(|a| self.matches(a)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(id: u64, code: &str, name: &str, kind: AccountKind) -> Account {
        Account {
            id: AccountId::new(id),
            code: code.to_string(),
            name: name.to_string(),
            kind,
        }
    }

    fn sample() -> Vec<Account> {
        vec![
            account(1, "1001", "固定资产", AccountKind::Asset),
            account(2, "1002", "银行存款", AccountKind::Asset),
            account(3, "2001", "应交税金", AccountKind::Liability),
            account(4, "5001", "工资费用", AccountKind::Expense),
            account(5, "6001", "主营业务收入", AccountKind::Revenue),
        ]
    }

    #[test]
    fn kind_parses_from_label_or_english() {
        assert_eq!("负债".parse::<AccountKind>().unwrap(), AccountKind::Liability);
        assert_eq!("revenue".parse::<AccountKind>().unwrap(), AccountKind::Revenue);
        assert!(matches!(
            "全部".parse::<AccountKind>(),
            Err(AccountError::UnknownKind(_))
        ));
    }

    #[test]
    fn resolve_accepts_code_or_display_name() {
        let chart = ChartOfAccounts::from_accounts(sample()).unwrap();
        assert_eq!(chart.resolve("1001 固定资产").unwrap().name, "固定资产");
        assert_eq!(chart.resolve("2001").unwrap().kind, AccountKind::Liability);
        assert!(chart.resolve("9999 不存在").is_none());
        assert!(chart.resolve("").is_none());
    }

    #[test]
    fn duplicate_codes_are_rejected() {
        let mut accounts = sample();
        accounts.push(account(9, "1001", "重复", AccountKind::Asset));
        let err = ChartOfAccounts::from_accounts(accounts).unwrap_err();
        assert_eq!(err, AccountError::DuplicateCode("1001".to_string()));
    }

    #[test]
    fn codes_with_inner_whitespace_are_rejected() {
        let mut draft = AccountDraft::new();
        draft.code = "10 09".into();
        draft.name = "测试".into();
        assert_eq!(draft.validate(), Err(AccountError::InvalidCode("10 09".into())));

        draft.code = " 1009 ".into();
        let account = draft.into_account(AccountId::new(20)).unwrap();
        assert_eq!(account.code, "1009");
        let chart = ChartOfAccounts::from_accounts([account]).unwrap();
        assert_eq!(chart.resolve("1009 测试").unwrap().id, AccountId::new(20));
    }

    #[test]
    fn draft_requires_code_and_name() {
        let mut draft = AccountDraft::new();
        assert_eq!(draft.validate(), Err(AccountError::MissingField("code")));
        draft.code = "1003".into();
        assert_eq!(draft.validate(), Err(AccountError::MissingField("name")));
        draft.name = " 应收账款 ".into();
        let account = draft.into_account(AccountId::new(7)).unwrap();
        assert_eq!(account.display_name(), "1003 应收账款");
        assert_eq!(account.kind, AccountKind::Asset);
    }

    #[test]
    fn filter_combines_search_and_kind() {
        let accounts = sample();

        let by_code = AccountFilter::new("100", None);
        assert_eq!(by_code.apply(&accounts).len(), 2);

        let by_name_and_kind = AccountFilter::new("费用", Some(AccountKind::Expense));
        let hits = by_name_and_kind.apply(&accounts);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].code, "5001");

        let kind_only = AccountFilter::new("", Some(AccountKind::Asset));
        assert_eq!(kind_only.apply(&accounts).len(), 2);

        let mismatch = AccountFilter::new("1001", Some(AccountKind::Liability));
        assert!(mismatch.apply(&accounts).is_empty());
    }
}
