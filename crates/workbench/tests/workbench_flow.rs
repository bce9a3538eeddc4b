use std::sync::Arc;

use bookkeep_accounting::{AccountKind, EntryUpdate, VoucherError, VoucherHeader};
use bookkeep_core::{DateRange, Session, VoucherId};
use bookkeep_infra::{AttachmentError, Books, BooksConfig, BooksError, RecordingNotifier, Upload};
use bookkeep_journal::TransactionFilter;
use bookkeep_workbench::{Editor, Tab, View, Workbench, WorkbenchError};

fn workbench(session: Session) -> Workbench {
    let books = Books::in_memory(&BooksConfig::default(), Arc::new(RecordingNotifier::new()))
        .expect("seeded books");
    Workbench::new(Arc::new(books), session)
}

fn voucher_form(bench: &mut Workbench, debit: &str, credit: &str) {
    bench.select_tab(Tab::Vouchers);
    let Editor::Voucher(form) = bench.add_new().unwrap() else {
        panic!("vouchers tab opens a voucher form");
    };
    form.draft.header = VoucherHeader::new("2023-04-28", "PZ202304004", "计提折旧");
    let first = form.draft.entries()[0].id;
    let second = form.draft.add_entry();
    form.draft
        .update_entry(first, EntryUpdate::Account("5002 办公费用".into()))
        .unwrap();
    form.draft
        .update_entry(second, EntryUpdate::Account("1002 银行存款".into()))
        .unwrap();
    form.set_debit_text(first, debit).unwrap();
    form.set_credit_text(second, credit).unwrap();
}

#[test]
fn starts_on_the_cash_journal_list() {
    let bench = workbench(Session::editor("会计"));
    assert_eq!(bench.tab(), Tab::Transactions);
    assert_eq!(bench.tab().label(), "流水账");
    assert_eq!(bench.view(), &View::List);
    assert_eq!(bench.transactions().len(), 4);
    assert_eq!(bench.vouchers().len(), 3);
    assert_eq!(bench.accounts().len(), 10);
}

#[test]
fn balanced_voucher_saves_and_closes_the_form() {
    let mut bench = workbench(Session::editor("会计"));
    voucher_form(&mut bench, "300", "300.00");

    bench.save().unwrap();
    assert_eq!(bench.view(), &View::List);
    assert!(bench.error().is_none());
    assert_eq!(bench.vouchers().len(), 4);
}

#[test]
fn unbalanced_voucher_keeps_the_draft_open() {
    let mut bench = workbench(Session::editor("会计"));
    voucher_form(&mut bench, "100", "50");

    let err = bench.save().unwrap_err();
    assert!(matches!(
        err,
        WorkbenchError::Books(BooksError::Voucher(VoucherError::Unbalanced { .. }))
    ));
    assert!(bench.error().unwrap().contains("difference 50.00"));
    assert!(matches!(bench.view(), View::Form(Editor::Voucher(_))));
    assert_eq!(bench.vouchers().len(), 3);

    bench.cancel();
    assert_eq!(bench.view(), &View::List);
    assert!(bench.error().is_none());
}

#[test]
fn switching_tabs_discards_the_open_form() {
    let mut bench = workbench(Session::editor("会计"));
    bench.select_tab(Tab::Accounts);
    bench.add_new().unwrap();
    bench.select_tab(Tab::Vouchers);
    assert_eq!(bench.view(), &View::List);
}

#[test]
fn settings_tab_has_no_add_form() {
    let mut bench = workbench(Session::editor("会计"));
    bench.select_tab(Tab::Settings);
    assert_eq!(bench.add_new().unwrap_err(), WorkbenchError::NoForm(Tab::Settings));
    assert_eq!(bench.save().unwrap_err(), WorkbenchError::NothingOpen);
}

#[test]
fn editing_opens_a_prefilled_form_on_the_right_tab() {
    let mut bench = workbench(Session::editor("会计"));
    let editor = bench.edit_voucher(VoucherId::new(2)).unwrap();
    assert_eq!(editor.title(), "Edit voucher");
    let Editor::Voucher(form) = editor else {
        panic!("voucher editor expected");
    };
    assert_eq!(form.draft.header.voucher_number, "PZ202304002");
    assert_eq!(form.balance_text(), "balanced");
    assert_eq!(bench.tab(), Tab::Vouchers);

    assert!(matches!(
        bench.edit_voucher(VoucherId::new(99)),
        Err(WorkbenchError::NotFound(_))
    ));
}

#[test]
fn voucher_rows_expand_and_collapse() {
    let mut bench = workbench(Session::editor("会计"));
    let id = VoucherId::new(1);
    assert!(!bench.is_expanded(id));
    assert!(bench.toggle_expanded(id));
    assert!(bench.is_expanded(id));
    assert!(!bench.toggle_expanded(id));

    bench.toggle_expanded(id);
    bench.delete_voucher(id).unwrap();
    assert!(!bench.is_expanded(id));
    assert_eq!(bench.vouchers().len(), 2);
}

#[test]
fn filters_narrow_the_lists() {
    let mut bench = workbench(Session::editor("会计"));
    bench.voucher_filter.range = DateRange::from_inputs("2023-04-16", "");
    assert_eq!(bench.vouchers().len(), 1);

    bench.account_filter.kind = Some(AccountKind::Liability);
    assert_eq!(bench.accounts().len(), 2);
}

#[test]
fn viewers_cannot_save() {
    let mut bench = workbench(Session::viewer("审计"));
    voucher_form(&mut bench, "10", "10");
    assert!(matches!(
        bench.save(),
        Err(WorkbenchError::Books(BooksError::Forbidden { .. }))
    ));
    assert!(matches!(bench.view(), View::Form(_)));
}

#[test]
fn opening_parameters_round_trip_through_the_form() {
    let mut bench = workbench(Session::editor("会计"));
    let mut form = bench.opening_form();
    form.fiscal_year = "2023".into();
    form.initial_cash = "5000".into();
    let saved = bench.save_opening_parameters(&form).unwrap();
    assert_eq!(saved.fiscal_year, 2023);
    assert_eq!(bench.opening_form().fiscal_year, "2023");

    form.fiscal_period = "13".into();
    assert!(bench.save_opening_parameters(&form).is_err());
}

fn transaction_form(bench: &mut Workbench, receipt: Upload) {
    bench.select_tab(Tab::Transactions);
    let Editor::Transaction(form) = bench.add_new().unwrap() else {
        panic!("transactions tab opens a transaction form");
    };
    form.draft.date = "2023-04-28".into();
    form.draft.description = "快递费".into();
    form.draft.amount = "-35".into();
    form.draft.category = "日常开支".into();
    form.receipt = Some(receipt);
}

#[test]
fn transaction_receipt_is_uploaded_on_save() {
    let mut bench = workbench(Session::editor("会计"));
    transaction_form(&mut bench, Upload::new("快递单 1.png", vec![7, 7]));
    bench.save().unwrap();

    let saved = bench
        .books()
        .list_transactions(&TransactionFilter::new("快递费", None, DateRange::default()));
    let reference = saved[0].receipt.clone().expect("receipt reference");
    assert!(reference.ends_with("-快递单_1.png"), "{reference}");
    assert_eq!(bench.books().attachment(&reference), Some(vec![7, 7]));
}

#[test]
fn rejected_transaction_receipt_keeps_the_form_open() {
    let mut bench = workbench(Session::editor("会计"));
    transaction_form(&mut bench, Upload::new("notes.txt", vec![1]));

    assert!(matches!(
        bench.save(),
        Err(WorkbenchError::Books(BooksError::Attachment(AttachmentError::UnsupportedType(_))))
    ));
    assert!(matches!(bench.view(), View::Form(Editor::Transaction(_))));
    assert_eq!(bench.transactions().len(), 4);
}
