use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;

use bookkeep_accounting::{Account, AccountDraft, AccountFilter, Voucher, VoucherDraft, VoucherFilter};
use bookkeep_core::{AccountId, Session, TransactionId, VoucherId};
use bookkeep_infra::{Books, BooksConfig, BooksError};
use bookkeep_journal::{Transaction, TransactionDraft, TransactionFilter};
use bookkeep_settings::{CompanyProfile, OpeningParameters, OpeningParametersForm};

use crate::editor::{Editor, TransactionForm, VoucherForm};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    #[default]
    Transactions,
    Vouchers,
    Accounts,
    Settings,
}

impl Tab {
    /// Tab label as shown in the navigation.
    pub fn label(&self) -> &'static str {
        match self {
            Tab::Transactions => "流水账",
            Tab::Vouchers => "凭证管理",
            Tab::Accounts => "科目管理",
            Tab::Settings => "设置",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    List,
    Form(Editor),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorkbenchError {
    #[error("the {0:?} tab has no form")]
    NoForm(Tab),

    #[error("no form is open")]
    NothingOpen,

    #[error("{0} not found")]
    NotFound(String),

    #[error(transparent)]
    Books(#[from] BooksError),
}

/// One user's bookkeeping screen state.
#[derive(Debug)]
pub struct Workbench {
    books: Arc<Books>,
    session: Session,
    tab: Tab,
    view: View,
    error: Option<String>,
    expanded: HashSet<VoucherId>,
    pub transaction_filter: TransactionFilter,
    pub voucher_filter: VoucherFilter,
    pub account_filter: AccountFilter,
}

impl Workbench {
    pub fn new(books: Arc<Books>, session: Session) -> Self {
        Self {
            books,
            session,
            tab: Tab::default(),
            view: View::List,
            error: None,
            expanded: HashSet::new(),
            transaction_filter: TransactionFilter::default(),
            voucher_filter: VoucherFilter::default(),
            account_filter: AccountFilter::default(),
        }
    }

    /// Initialise logging and in-memory books from `config`.
    pub fn bootstrap(config: &BooksConfig, session: Session) -> anyhow::Result<Self> {
        bookkeep_observability::init_with(config.log_format);
        let books = Books::in_memory_logged(config)?;
        tracing::info!(user = session.user(), can_write = session.can_write(), "workbench ready");
        Ok(Self::new(Arc::new(books), session))
    }

    pub fn books(&self) -> &Books {
        &self.books
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    /// Message from the last rejected save, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Switch tabs. Any open form is discarded.
    pub fn select_tab(&mut self, tab: Tab) {
        if self.tab != tab {
            self.cancel();
            self.tab = tab;
        }
    }

    fn open(&mut self, editor: Editor) -> Result<&mut Editor, WorkbenchError> {
        self.error = None;
        self.view = View::Form(editor);
        self.editor_mut().ok_or(WorkbenchError::NothingOpen)
    }

    /// Open an empty form for the active tab.
    pub fn add_new(&mut self) -> Result<&mut Editor, WorkbenchError> {
        let editor = match self.tab {
            Tab::Transactions => Editor::Transaction(TransactionForm::default()),
            Tab::Vouchers => Editor::Voucher(VoucherForm::new(VoucherDraft::new())),
            Tab::Accounts => Editor::Account(AccountDraft::new()),
            Tab::Settings => return Err(WorkbenchError::NoForm(Tab::Settings)),
        };
        self.open(editor)
    }

    pub fn edit_transaction(&mut self, id: TransactionId) -> Result<&mut Editor, WorkbenchError> {
        let tx = self
            .books
            .transaction(id)
            .ok_or_else(|| WorkbenchError::NotFound(format!("transaction {id}")))?;
        self.tab = Tab::Transactions;
        self.open(Editor::Transaction(TransactionForm::new(TransactionDraft::from_transaction(&tx))))
    }

    pub fn edit_voucher(&mut self, id: VoucherId) -> Result<&mut Editor, WorkbenchError> {
        let voucher = self
            .books
            .voucher(id)
            .ok_or_else(|| WorkbenchError::NotFound(format!("voucher {id}")))?;
        self.tab = Tab::Vouchers;
        self.open(Editor::Voucher(VoucherForm::new(VoucherDraft::from_voucher(&voucher))))
    }

    pub fn edit_account(&mut self, id: AccountId) -> Result<&mut Editor, WorkbenchError> {
        let account = self
            .books
            .account(id)
            .ok_or_else(|| WorkbenchError::NotFound(format!("account {id}")))?;
        self.tab = Tab::Accounts;
        self.open(Editor::Account(AccountDraft::from_account(&account)))
    }

    pub fn editor_mut(&mut self) -> Option<&mut Editor> {
        match &mut self.view {
            View::Form(editor) => Some(editor),
            View::List => None,
        }
    }

    /// Close the form, dropping the draft.
    pub fn cancel(&mut self) {
        self.view = View::List;
        self.error = None;
    }

    /// Submit the open form. On success the list is shown again; on failure
    /// the draft stays open and the message is kept in [`Workbench::error`].
    pub fn save(&mut self) -> Result<(), WorkbenchError> {
        let View::Form(editor) = &self.view else {
            return Err(WorkbenchError::NothingOpen);
        };

        let result = match editor {
            Editor::Transaction(form) => self
                .books
                .save_transaction(&self.session, form.draft.clone(), form.receipt.as_ref())
                .map(|_| ()),
            Editor::Voucher(form) => self
                .books
                .save_voucher(&self.session, &form.draft, &form.uploads)
                .map(|_| ()),
            Editor::Account(draft) => self.books.save_account(&self.session, draft.clone()).map(|_| ()),
        };

        match result {
            Ok(()) => {
                self.cancel();
                Ok(())
            }
            Err(err) => {
                self.error = Some(err.to_string());
                Err(err.into())
            }
        }
    }

    // ---- lists ----

    pub fn transactions(&self) -> Vec<Transaction> {
        self.books.list_transactions(&self.transaction_filter)
    }

    pub fn vouchers(&self) -> Vec<Voucher> {
        self.books.list_vouchers(&self.voucher_filter)
    }

    pub fn accounts(&self) -> Vec<Account> {
        self.books.list_accounts(&self.account_filter)
    }

    /// Show or hide a voucher's entry lines in the list.
    pub fn toggle_expanded(&mut self, id: VoucherId) -> bool {
        if self.expanded.remove(&id) {
            false
        } else {
            self.expanded.insert(id);
            true
        }
    }

    pub fn is_expanded(&self, id: VoucherId) -> bool {
        self.expanded.contains(&id)
    }

    pub fn delete_transaction(&mut self, id: TransactionId) -> Result<(), WorkbenchError> {
        self.books.delete_transaction(&self.session, id)?;
        Ok(())
    }

    pub fn delete_voucher(&mut self, id: VoucherId) -> Result<(), WorkbenchError> {
        self.books.delete_voucher(&self.session, id)?;
        self.expanded.remove(&id);
        Ok(())
    }

    pub fn delete_account(&mut self, id: AccountId) -> Result<(), WorkbenchError> {
        self.books.delete_account(&self.session, id)?;
        Ok(())
    }

    // ---- settings ----

    pub fn company_profile(&self) -> CompanyProfile {
        self.books.company_profile()
    }

    pub fn save_company_profile(&mut self, profile: CompanyProfile) -> Result<(), WorkbenchError> {
        self.books.save_company_profile(&self.session, profile)?;
        Ok(())
    }

    pub fn opening_form(&self) -> OpeningParametersForm {
        OpeningParametersForm::from_parameters(&self.books.opening_parameters())
    }

    pub fn save_opening_parameters(
        &mut self,
        form: &OpeningParametersForm,
    ) -> Result<OpeningParameters, WorkbenchError> {
        Ok(self.books.save_opening_parameters(&self.session, form)?)
    }
}
