use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bookkeep_core::filter::parse_date;
use bookkeep_core::{DateRange, Entity, TextQuery, VoucherId};

use crate::draft::{Totals, VoucherDraft};
use crate::entry::LedgerEntry;
use crate::validate::VoucherError;

/// A saved double-entry voucher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voucher {
    pub id: VoucherId,
    pub date: NaiveDate,
    pub voucher_number: String,
    pub description: String,
    pub entries: Vec<LedgerEntry>,
    #[serde(default)]
    pub receipts: Vec<String>,
}

impl Entity for Voucher {
    type Id = VoucherId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Voucher {
    /// Validate `draft` and turn it into a voucher with the given id.
    pub fn from_draft(id: VoucherId, draft: &VoucherDraft) -> Result<Self, VoucherError> {
        draft.validate()?;
        let date = parse_date(&draft.header.date)
            .ok_or_else(|| VoucherError::MalformedDate(draft.header.date.clone()))?;

        Ok(Self {
            id,
            date,
            voucher_number: draft.header.voucher_number.trim().to_string(),
            description: draft.header.description.trim().to_string(),
            entries: draft.entries().to_vec(),
            receipts: draft.receipts().to_vec(),
        })
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

    /// Whether any line posts to the account with this code.
    pub fn references_code(&self, code: &str) -> bool {
        self.entries
            .iter()
            .any(|e| e.account.split_whitespace().next() == Some(code))
    }
}

/// Voucher list filter: number/description search plus a date range.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoucherFilter {
    pub query: TextQuery,
    pub range: DateRange,
}

impl VoucherFilter {
    pub fn new(query: impl AsRef<str>, range: DateRange) -> Self {
        Self {
            query: TextQuery::new(query),
            range,
        }
    }

    pub fn matches(&self, voucher: &Voucher) -> bool {
        self.range.contains(voucher.date)
            && self
                .query
                .matches_any([voucher.voucher_number.as_str(), voucher.description.as_str()])
    }

    pub fn apply<'a>(&self, vouchers: &'a [Voucher]) -> Vec<&'a Voucher> {
        vouchers.iter().filter(|v| self.matches(v)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::{EntryUpdate, VoucherHeader};
    use bookkeep_core::{Amount, EntryId};

    fn balanced_draft(date: &str) -> VoucherDraft {
        VoucherDraft::with_entries(
            VoucherHeader::new(date, " PZ202304002 ", "收到客户款项"),
            vec![
                LedgerEntry::debit(EntryId::new(1), "1002 银行存款", Amount::from(8000)),
                LedgerEntry::credit(EntryId::new(2), "6001 主营业务收入", Amount::from(8000)),
            ],
        )
    }

    #[test]
    fn from_draft_parses_header() {
        let voucher = Voucher::from_draft(VoucherId::new(2), &balanced_draft("2023-04-15")).unwrap();
        assert_eq!(voucher.date, NaiveDate::from_ymd_opt(2023, 4, 15).unwrap());
        assert_eq!(voucher.voucher_number, "PZ202304002");
        assert_eq!(voucher.totals().debit, Decimal::from(8000));
        assert!(voucher.totals().is_balanced());
        assert!(voucher.references_code("6001"));
        assert!(!voucher.references_code("600"));
    }

    #[test]
    fn from_draft_rejects_bad_dates_and_invalid_drafts() {
        let err = Voucher::from_draft(VoucherId::new(1), &balanced_draft("15/04/2023")).unwrap_err();
        assert_eq!(err, VoucherError::MalformedDate("15/04/2023".into()));

        let mut draft = balanced_draft("2023-04-15");
        let id = draft.entries()[1].id;
        draft.update_entry(id, EntryUpdate::Credit(Some(Amount::from(1)))).unwrap();
        assert!(matches!(
            Voucher::from_draft(VoucherId::new(1), &draft),
            Err(VoucherError::Unbalanced { .. })
        ));
    }

    #[test]
    fn editing_round_trips_through_a_draft() {
        let mut original = Voucher::from_draft(VoucherId::new(9), &balanced_draft("2023-04-15")).unwrap();
        original.receipts.push("receipt-v001.jpg".into());

        let draft = VoucherDraft::from_voucher(&original);
        assert_eq!(draft.voucher_id(), Some(VoucherId::new(9)));
        assert_eq!(draft.header.date, "2023-04-15");
        assert_eq!(draft.receipts(), ["receipt-v001.jpg".to_string()]);

        let saved = Voucher::from_draft(VoucherId::new(9), &draft).unwrap();
        assert_eq!(saved, original);
    }

    #[test]
    fn filter_by_range_and_text() {
        let vouchers: Vec<Voucher> = ["2023-04-10", "2023-04-15", "2023-04-20"]
            .iter()
            .enumerate()
            .map(|(i, d)| Voucher::from_draft(VoucherId::new(i as u64 + 1), &balanced_draft(d)).unwrap())
            .collect();

        let range = VoucherFilter::new("", DateRange::from_inputs("2023-04-12", ""));
        assert_eq!(range.apply(&vouchers).len(), 2);

        let text = VoucherFilter::new("pz2023", DateRange::default());
        assert_eq!(text.apply(&vouchers).len(), 3);

        let none = VoucherFilter::new("工资", DateRange::default());
        assert!(none.apply(&vouchers).is_empty());
    }
}
