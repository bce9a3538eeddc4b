//! Sample books used for demos and local development.

use anyhow::{Context, Result};
use serde::Deserialize;

use bookkeep_accounting::{Account, ChartOfAccounts, Voucher};
use bookkeep_journal::Transaction;

const SAMPLE_BOOKS: &str = include_str!("../fixtures/sample_books.json");

#[derive(Debug, Clone, Deserialize)]
pub struct SampleBooks {
    pub accounts: Vec<Account>,
    pub vouchers: Vec<Voucher>,
    pub transactions: Vec<Transaction>,
}

impl SampleBooks {
    /// Parse the bundled fixture and check it is internally consistent.
    pub fn bundled() -> Result<Self> {
        Self::from_json(SAMPLE_BOOKS).context("bundled sample books")
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let books: SampleBooks = serde_json::from_str(json).context("parsing sample books")?;
        books.check()?;
        Ok(books)
    }

    /// Every voucher must balance and reference known accounts.
    fn check(&self) -> Result<()> {
        let chart = ChartOfAccounts::from_accounts(self.accounts.iter().cloned())
            .context("sample chart of accounts")?;
        for voucher in &self.vouchers {
            let draft = bookkeep_accounting::VoucherDraft::from_voucher(voucher);
            draft
                .validate_with_chart(&chart)
                .with_context(|| format!("sample voucher {}", voucher.voucher_number))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_books_parse_and_balance() {
        let books = SampleBooks::bundled().unwrap();
        assert_eq!(books.accounts.len(), 10);
        assert_eq!(books.vouchers.len(), 3);
        assert_eq!(books.transactions.len(), 4);
        assert_eq!(books.vouchers[2].entries.len(), 3);
        assert_eq!(books.transactions[1].display_amount(), "+12000.00");
    }

    #[test]
    fn unbalanced_fixture_is_rejected() {
        let json = r#"{
            "accounts": [
                { "id": 1, "code": "1001", "name": "固定资产", "kind": "asset" },
                { "id": 2, "code": "1002", "name": "银行存款", "kind": "asset" }
            ],
            "vouchers": [{
                "id": 1, "date": "2023-04-10", "voucher_number": "PZ1", "description": "x",
                "entries": [
                    { "id": 1, "account": "1001", "debit": "100" },
                    { "id": 2, "account": "1002", "credit": "50" }
                ]
            }],
            "transactions": []
        }"#;
        let err = SampleBooks::from_json(json).unwrap_err();
        assert!(format!("{err:#}").contains("difference 50.00"), "{err:#}");
    }
}
