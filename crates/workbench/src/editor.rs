use bookkeep_accounting::{AccountDraft, Balance, DraftError, EntryUpdate, VoucherDraft};
use bookkeep_core::{Amount, AmountError, EntryId, format_amount};
use bookkeep_infra::Upload;
use bookkeep_journal::TransactionDraft;

/// Voucher form: the draft plus receipts picked but not yet uploaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoucherForm {
    pub draft: VoucherDraft,
    pub uploads: Vec<Upload>,
}

/// Failure while applying a keystroke to the voucher form.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error(transparent)]
    Amount(#[from] AmountError),

    #[error(transparent)]
    Draft(#[from] DraftError),
}

impl VoucherForm {
    pub fn new(draft: VoucherDraft) -> Self {
        Self {
            draft,
            uploads: Vec::new(),
        }
    }

    /// Apply the debit input text of an entry. Blank clears the field.
    pub fn set_debit_text(&mut self, entry: EntryId, text: &str) -> Result<(), FieldError> {
        let amount = Amount::parse(text)?;
        self.draft.update_entry(entry, EntryUpdate::Debit(amount))?;
        Ok(())
    }

    /// Apply the credit input text of an entry. Blank clears the field.
    pub fn set_credit_text(&mut self, entry: EntryId, text: &str) -> Result<(), FieldError> {
        let amount = Amount::parse(text)?;
        self.draft.update_entry(entry, EntryUpdate::Credit(amount))?;
        Ok(())
    }

    /// Totals row text: `(debit, credit)` with two decimals.
    pub fn totals_text(&self) -> (String, String) {
        let totals = self.draft.totals();
        (format_amount(totals.debit), format_amount(totals.credit))
    }

    /// Balance indicator text shown under the entry table.
    pub fn balance_text(&self) -> String {
        match self.draft.balance() {
            Balance::Balanced => "balanced".to_string(),
            Balance::Unbalanced { difference } => {
                format!("unbalanced (difference: {})", format_amount(difference))
            }
        }
    }
}

/// Transaction form: the draft plus an optional receipt picked in the upload field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionForm {
    pub draft: TransactionDraft,
    /// Replaces the stored receipt when the form is saved.
    pub receipt: Option<Upload>,
}

impl TransactionForm {
    pub fn new(draft: TransactionDraft) -> Self {
        Self {
            draft,
            receipt: None,
        }
    }

    /// Name shown next to the upload field: the picked file, else the stored reference.
    pub fn receipt_label(&self) -> Option<&str> {
        self.receipt
            .as_ref()
            .map(|u| u.file_name.as_str())
            .or(self.draft.receipt.as_deref())
    }
}

/// The form currently open on a tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Editor {
    Transaction(TransactionForm),
    Voucher(VoucherForm),
    Account(AccountDraft),
}

impl Editor {
    pub fn is_editing(&self) -> bool {
        match self {
            Editor::Transaction(f) => f.draft.is_editing(),
            Editor::Voucher(f) => f.draft.is_editing(),
            Editor::Account(d) => d.is_editing(),
        }
    }

    /// Form heading, e.g. "Edit voucher" / "New voucher".
    pub fn title(&self) -> String {
        let noun = match self {
            Editor::Transaction(_) => "transaction",
            Editor::Voucher(_) => "voucher",
            Editor::Account(_) => "account",
        };
        if self.is_editing() {
            format!("Edit {noun}")
        } else {
            format!("New {noun}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_amounts_updates_totals_and_indicator() {
        let mut form = VoucherForm::default();
        let first = form.draft.entries()[0].id;
        let second = form.draft.add_entry();

        form.set_debit_text(first, "100").unwrap();
        form.set_credit_text(second, "50").unwrap();
        assert_eq!(form.totals_text(), ("100.00".to_string(), "50.00".to_string()));
        assert_eq!(form.balance_text(), "unbalanced (difference: 50.00)");

        form.set_credit_text(second, "100.00").unwrap();
        assert_eq!(form.balance_text(), "balanced");
    }

    #[test]
    fn typing_on_one_side_clears_the_other() {
        let mut form = VoucherForm::default();
        let id = form.draft.entries()[0].id;
        form.set_credit_text(id, "8").unwrap();
        form.set_debit_text(id, "8").unwrap();
        let entry = form.draft.entry(id).unwrap();
        assert!(entry.credit.is_none());
        assert_eq!(entry.debit, Some(Amount::from(8)));

        form.set_debit_text(id, "").unwrap();
        assert!(form.draft.entry(id).unwrap().debit.is_none());
    }

    #[test]
    fn bad_input_is_reported() {
        let mut form = VoucherForm::default();
        let id = form.draft.entries()[0].id;
        assert!(matches!(
            form.set_debit_text(id, "-5"),
            Err(FieldError::Amount(AmountError::Negative(_)))
        ));
        assert!(matches!(
            form.set_debit_text(EntryId::new(99), "5"),
            Err(FieldError::Draft(DraftError::UnknownEntry(_)))
        ));
    }

    #[test]
    fn oversized_amounts_are_refused_while_typing() {
        let mut form = VoucherForm::default();
        let id = form.draft.entries()[0].id;
        assert!(matches!(
            form.set_debit_text(id, "79228162514264337593543950335"),
            Err(FieldError::Amount(AmountError::TooLarge(_)))
        ));
        assert!(form.draft.entry(id).unwrap().debit.is_none());
        assert_eq!(form.balance_text(), "balanced");
    }

    #[test]
    fn receipt_label_prefers_the_new_pick() {
        let mut form = TransactionForm::new(TransactionDraft {
            receipt: Some("0190-old.png".into()),
            ..TransactionDraft::new()
        });
        assert_eq!(form.receipt_label(), Some("0190-old.png"));
        form.receipt = Some(Upload::new("新发票.pdf", vec![1]));
        assert_eq!(form.receipt_label(), Some("新发票.pdf"));
        assert_eq!(TransactionForm::default().receipt_label(), None);
    }

    #[test]
    fn titles_follow_the_mode() {
        assert_eq!(Editor::Voucher(VoucherForm::default()).title(), "New voucher");
        let editing = AccountDraft {
            account_id: Some(bookkeep_core::AccountId::new(1)),
            ..AccountDraft::new()
        };
        assert_eq!(Editor::Account(editing).title(), "Edit account");
    }
}
