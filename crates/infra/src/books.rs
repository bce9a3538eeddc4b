//! Application services over the bookkeeping collaborators.
//!
//! Every mutation follows the same path: check the session may write,
//! validate, persist, then notify. A rejected submission notifies the user
//! and leaves stored state untouched.

use std::sync::{Arc, RwLock};

use thiserror::Error;

use bookkeep_accounting::{
    Account, AccountDraft, AccountError, AccountFilter, ChartOfAccounts, Voucher, VoucherDraft,
    VoucherError, VoucherFilter,
};
use bookkeep_core::{AccountId, DomainError, Session, TransactionId, VoucherId};
use bookkeep_journal::{Transaction, TransactionDraft, TransactionError, TransactionFilter};
use bookkeep_settings::{CompanyProfile, OpeningParameters, OpeningParametersForm, SettingsError};

use crate::attachments::{AttachmentError, AttachmentStore, InMemoryAttachmentStore, Upload};
use crate::config::BooksConfig;
use crate::notify::{Notice, Notifier, TracingNotifier};
use crate::repository::{InMemoryRepository, Repository};
use crate::seed::SampleBooks;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BooksError {
    #[error("{user} may not change the books")]
    Forbidden { user: String },

    #[error(transparent)]
    Voucher(#[from] VoucherError),

    #[error(transparent)]
    Account(#[from] AccountError),

    #[error(transparent)]
    Transaction(#[from] TransactionError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Attachment(#[from] AttachmentError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// The books of one company: chart, vouchers, cash journal, settings.
pub struct Books {
    accounts: Arc<dyn Repository<Account>>,
    vouchers: Arc<dyn Repository<Voucher>>,
    transactions: Arc<dyn Repository<Transaction>>,
    attachments: Arc<dyn AttachmentStore>,
    notifier: Arc<dyn Notifier>,
    company: RwLock<CompanyProfile>,
    opening: RwLock<OpeningParameters>,
}

impl core::fmt::Debug for Books {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Books")
            .field("accounts", &self.accounts.list().len())
            .field("vouchers", &self.vouchers.list().len())
            .field("transactions", &self.transactions.list().len())
            .finish_non_exhaustive()
    }
}

impl Books {
    pub fn new(
        accounts: Arc<dyn Repository<Account>>,
        vouchers: Arc<dyn Repository<Voucher>>,
        transactions: Arc<dyn Repository<Transaction>>,
        attachments: Arc<dyn AttachmentStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            accounts,
            vouchers,
            transactions,
            attachments,
            notifier,
            company: RwLock::new(CompanyProfile::default()),
            opening: RwLock::new(OpeningParameters::default()),
        }
    }

    /// In-memory books, seeded with the sample data when configured.
    pub fn in_memory(config: &BooksConfig, notifier: Arc<dyn Notifier>) -> anyhow::Result<Self> {
        let books = Self::new(
            Arc::new(InMemoryRepository::new()),
            Arc::new(InMemoryRepository::new()),
            Arc::new(InMemoryRepository::new()),
            Arc::new(InMemoryAttachmentStore::new(config.max_attachment_bytes)),
            notifier,
        );
        if config.seed_sample_data {
            books.seed(SampleBooks::bundled()?)?;
        }
        Ok(books)
    }

    /// In-memory books that log notices instead of showing them.
    pub fn in_memory_logged(config: &BooksConfig) -> anyhow::Result<Self> {
        Self::in_memory(config, Arc::new(TracingNotifier))
    }

    /// Load records as-is (ids preserved). Intended for empty books.
    pub fn seed(&self, sample: SampleBooks) -> Result<(), BooksError> {
        let counts = (sample.accounts.len(), sample.vouchers.len(), sample.transactions.len());
        for account in sample.accounts {
            self.accounts.insert(account)?;
        }
        for voucher in sample.vouchers {
            self.vouchers.insert(voucher)?;
        }
        for tx in sample.transactions {
            self.transactions.insert(tx)?;
        }
        tracing::info!(
            accounts = counts.0,
            vouchers = counts.1,
            transactions = counts.2,
            "seeded sample books"
        );
        Ok(())
    }

    fn authorize(&self, session: &Session) -> Result<(), BooksError> {
        if session.can_write() {
            Ok(())
        } else {
            Err(BooksError::Forbidden {
                user: session.user().to_string(),
            })
        }
    }

    /// Report the outcome of a mutation to the user.
    fn report<T>(
        &self,
        title: &str,
        result: Result<T, BooksError>,
        success: impl FnOnce(&T) -> String,
    ) -> Result<T, BooksError> {
        match &result {
            Ok(value) => self.notifier.notify(Notice::success(title, success(value))),
            Err(err) => {
                tracing::warn!(error = %err, "{title} rejected");
                self.notifier.notify(Notice::error(title, err.to_string()));
            }
        }
        result
    }

    /// Store every upload or none of them.
    fn store_uploads(&self, uploads: &[Upload]) -> Result<Vec<String>, BooksError> {
        let mut stored = Vec::with_capacity(uploads.len());
        for upload in uploads {
            match self.attachments.store(upload) {
                Ok(reference) => stored.push(reference),
                Err(err) => {
                    self.discard_attachments(&stored);
                    return Err(err.into());
                }
            }
        }
        Ok(stored)
    }

    /// Remove blobs whose owning record was not written.
    fn discard_attachments(&self, references: &[String]) {
        for reference in references {
            self.attachments.remove(reference);
        }
        if !references.is_empty() {
            tracing::debug!(count = references.len(), "discarded orphaned attachments");
        }
    }

    pub fn attachment(&self, reference: &str) -> Option<Vec<u8>> {
        self.attachments.fetch(reference)
    }

    // ---- chart of accounts ----

    pub fn chart(&self) -> ChartOfAccounts {
        // Codes are unique on every write path, so this cannot fail on stored data.
        ChartOfAccounts::from_accounts(self.accounts.list()).unwrap_or_default()
    }

    pub fn account(&self, id: AccountId) -> Option<Account> {
        self.accounts.get(&id)
    }

    pub fn list_accounts(&self, filter: &AccountFilter) -> Vec<Account> {
        self.accounts.list().into_iter().filter(|a| filter.matches(a)).collect()
    }

    pub fn save_account(&self, session: &Session, draft: AccountDraft) -> Result<Account, BooksError> {
        let editing = draft.is_editing();
        let result = self.authorize(session).and_then(|_| self.persist_account(draft));
        self.report("account", result, |a| {
            let verb = if editing { "updated" } else { "added" };
            format!("account {} {verb}", a.display_name())
        })
    }

    fn persist_account(&self, draft: AccountDraft) -> Result<Account, BooksError> {
        draft.validate()?;
        let code = draft.code.trim();
        let clash = self
            .accounts
            .list()
            .into_iter()
            .any(|a| a.code == code && Some(a.id) != draft.account_id);
        if clash {
            return Err(AccountError::DuplicateCode(code.to_string()).into());
        }

        match draft.account_id {
            Some(id) => {
                let previous = self
                    .accounts
                    .get(&id)
                    .ok_or_else(|| DomainError::not_found(format!("account {id}")))?;
                let account = draft.into_account(id)?;
                if previous.code != account.code && self.account_in_use(&previous.code) {
                    return Err(DomainError::conflict(format!(
                        "account {} is used by vouchers; its code cannot change",
                        previous.code
                    ))
                    .into());
                }
                self.accounts.update(account.clone())?;
                Ok(account)
            }
            None => {
                let account = draft.into_account(self.accounts.next_id())?;
                self.accounts.insert(account.clone())?;
                Ok(account)
            }
        }
    }

    fn account_in_use(&self, code: &str) -> bool {
        self.vouchers.list().iter().any(|v| v.references_code(code))
    }

    pub fn delete_account(&self, session: &Session, id: AccountId) -> Result<Account, BooksError> {
        let result = self.authorize(session).and_then(|_| {
            let account = self
                .accounts
                .get(&id)
                .ok_or_else(|| DomainError::not_found(format!("account {id}")))?;
            if self.account_in_use(&account.code) {
                return Err(DomainError::conflict(format!(
                    "account {} is used by vouchers",
                    account.display_name()
                ))
                .into());
            }
            Ok(self.accounts.remove(&id)?)
        });
        self.report("delete account", result, |a| format!("account #{} deleted", a.id))
    }

    // ---- vouchers ----

    pub fn voucher(&self, id: VoucherId) -> Option<Voucher> {
        self.vouchers.get(&id)
    }

    pub fn list_vouchers(&self, filter: &VoucherFilter) -> Vec<Voucher> {
        self.vouchers.list().into_iter().filter(|v| filter.matches(v)).collect()
    }

    /// Validate and persist a voucher draft, storing any new receipts.
    pub fn save_voucher(
        &self,
        session: &Session,
        draft: &VoucherDraft,
        uploads: &[Upload],
    ) -> Result<Voucher, BooksError> {
        let result = self
            .authorize(session)
            .and_then(|_| self.persist_voucher(draft, uploads));
        self.report("voucher", result, |v| {
            let verb = if draft.is_editing() { "updated" } else { "added" };
            format!("voucher {} {verb}", v.voucher_number)
        })
    }

    fn persist_voucher(&self, draft: &VoucherDraft, uploads: &[Upload]) -> Result<Voucher, BooksError> {
        draft.validate_with_chart(&self.chart())?;

        let id = match draft.voucher_id() {
            Some(id) => {
                if self.vouchers.get(&id).is_none() {
                    return Err(DomainError::not_found(format!("voucher {id}")).into());
                }
                id
            }
            None => self.vouchers.next_id(),
        };
        let mut voucher = Voucher::from_draft(id, draft)?;
        let stored = self.store_uploads(uploads)?;
        voucher.receipts.extend(stored.iter().cloned());

        let written = if draft.is_editing() {
            self.vouchers.update(voucher.clone())
        } else {
            self.vouchers.insert(voucher.clone())
        };
        if let Err(err) = written {
            self.discard_attachments(&stored);
            return Err(err.into());
        }
        tracing::info!(voucher_id = %voucher.id, lines = voucher.entries.len(), "voucher saved");
        Ok(voucher)
    }

    pub fn delete_voucher(&self, session: &Session, id: VoucherId) -> Result<Voucher, BooksError> {
        let result = self
            .authorize(session)
            .and_then(|_| Ok(self.vouchers.remove(&id)?));
        self.report("delete voucher", result, |v| format!("voucher #{} deleted", v.id))
    }

    // ---- cash journal ----

    pub fn transaction(&self, id: TransactionId) -> Option<Transaction> {
        self.transactions.get(&id)
    }

    pub fn list_transactions(&self, filter: &TransactionFilter) -> Vec<Transaction> {
        self.transactions.list().into_iter().filter(|t| filter.matches(t)).collect()
    }

    pub fn save_transaction(
        &self,
        session: &Session,
        draft: TransactionDraft,
        receipt: Option<&Upload>,
    ) -> Result<Transaction, BooksError> {
        let editing = draft.is_editing();
        let result = self
            .authorize(session)
            .and_then(|_| self.persist_transaction(draft, receipt));
        self.report("transaction", result, |t| {
            let verb = if editing { "updated" } else { "added" };
            format!("transaction {} {verb}", t.description)
        })
    }

    fn persist_transaction(
        &self,
        mut draft: TransactionDraft,
        receipt: Option<&Upload>,
    ) -> Result<Transaction, BooksError> {
        draft.validate()?;

        let existing = draft.transaction_id;
        if let Some(id) = existing {
            if self.transactions.get(&id).is_none() {
                return Err(DomainError::not_found(format!("transaction {id}")).into());
            }
        }
        let stored = match receipt {
            Some(upload) => self.store_uploads(core::slice::from_ref(upload))?,
            None => Vec::new(),
        };
        if let Some(reference) = stored.first() {
            draft.receipt = Some(reference.clone());
        }

        let id = existing.unwrap_or_else(|| self.transactions.next_id());
        let written = draft.into_transaction(id).map_err(BooksError::from).and_then(|tx| {
            if existing.is_some() {
                self.transactions.update(tx.clone())?;
            } else {
                self.transactions.insert(tx.clone())?;
            }
            Ok(tx)
        });
        if written.is_err() {
            self.discard_attachments(&stored);
        }
        written
    }

    pub fn delete_transaction(
        &self,
        session: &Session,
        id: TransactionId,
    ) -> Result<Transaction, BooksError> {
        let result = self
            .authorize(session)
            .and_then(|_| Ok(self.transactions.remove(&id)?));
        self.report("delete transaction", result, |t| format!("transaction #{} deleted", t.id))
    }

    // ---- settings ----

    pub fn company_profile(&self) -> CompanyProfile {
        self.company.read().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn save_company_profile(
        &self,
        session: &Session,
        profile: CompanyProfile,
    ) -> Result<CompanyProfile, BooksError> {
        let result = self.authorize(session).and_then(|_| {
            profile.validate()?;
            let mut current = self
                .company
                .write()
                .map_err(|_| DomainError::invariant("settings lock poisoned"))?;
            *current = profile.clone();
            Ok(profile)
        });
        self.report("company profile", result, |_| "company profile saved".to_string())
    }

    pub fn opening_parameters(&self) -> OpeningParameters {
        self.opening.read().map(|o| o.clone()).unwrap_or_default()
    }

    pub fn save_opening_parameters(
        &self,
        session: &Session,
        form: &OpeningParametersForm,
    ) -> Result<OpeningParameters, BooksError> {
        let result = self.authorize(session).and_then(|_| {
            let params = form.parse()?;
            let mut current = self
                .opening
                .write()
                .map_err(|_| DomainError::invariant("settings lock poisoned"))?;
            *current = params.clone();
            Ok(params)
        });
        self.report("opening parameters", result, |p| {
            format!("opening parameters saved for {}-{:02}", p.fiscal_year, p.fiscal_period)
        })
    }
}
