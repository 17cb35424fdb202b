//! Repository port for obligations, their invoice links and history.
//!
//! Mutations go through [`AccountPayableRepository::commit`], which applies
//! the obligation write, the optional invoice link and the history rows as
//! one atomic unit.

use crate::billing::domain::InvoiceId;
use crate::directory::domain::CompanyId;
use crate::payable::domain::{
    AccountPayable, AccountPayableHistory, AccountPayableId, InvoiceAccountPayable, SupplierId,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for obligation repository operations.
pub type AccountPayableRepositoryResult<T> = Result<T, AccountPayableRepositoryError>;

/// The obligation row change carried by a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountPayableWrite {
    /// Insert a new obligation.
    Create(AccountPayable),
    /// Replace an obligation last read at `expected_version`.
    Update {
        /// New obligation state.
        account_payable: AccountPayable,
        /// Version the caller read before mutating.
        expected_version: u64,
    },
}

impl AccountPayableWrite {
    /// Returns the obligation the write targets.
    #[must_use]
    pub const fn account_payable(&self) -> &AccountPayable {
        match self {
            Self::Create(account_payable) | Self::Update { account_payable, .. } => {
                account_payable
            }
        }
    }
}

/// One atomic obligation mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayableCommit {
    /// Obligation row change.
    pub write: AccountPayableWrite,
    /// Invoice contribution link, refused when the invoice already posted.
    pub link: Option<InvoiceAccountPayable>,
    /// History rows describing the change.
    pub history: Vec<AccountPayableHistory>,
}

impl PayableCommit {
    /// Creates a commit with no link and no history.
    #[must_use]
    pub const fn new(write: AccountPayableWrite) -> Self {
        Self {
            write,
            link: None,
            history: Vec::new(),
        }
    }

    /// Attaches an invoice contribution link.
    #[must_use]
    pub fn with_link(mut self, link: InvoiceAccountPayable) -> Self {
        self.link = Some(link);
        self
    }

    /// Attaches history rows.
    #[must_use]
    pub fn with_history(mut self, history: Vec<AccountPayableHistory>) -> Self {
        self.history = history;
        self
    }
}

/// Obligation persistence contract.
#[async_trait]
pub trait AccountPayableRepository: Send + Sync {
    /// Applies a commit atomically.
    ///
    /// # Errors
    ///
    /// Returns [`AccountPayableRepositoryError::InvoiceAlreadyPosted`] when
    /// the invoice already has a link,
    /// [`AccountPayableRepositoryError::VersionConflict`] when the stored
    /// obligation moved past the expected version,
    /// [`AccountPayableRepositoryError::DuplicateOpenObligation`] when
    /// creating a second open obligation with the same key, or not-found
    /// and duplicate errors.
    async fn commit(&self, commit: PayableCommit) -> AccountPayableRepositoryResult<()>;

    /// Finds an obligation by identifier.
    async fn find_by_id(
        &self,
        id: AccountPayableId,
    ) -> AccountPayableRepositoryResult<Option<AccountPayable>>;

    /// Finds the open obligation for a company, supplier and description.
    async fn find_open(
        &self,
        company_id: CompanyId,
        supplier_id: SupplierId,
        description: &str,
    ) -> AccountPayableRepositoryResult<Option<AccountPayable>>;

    /// Returns the contribution link of an invoice, if it has posted.
    async fn link_for_invoice(
        &self,
        invoice_id: InvoiceId,
    ) -> AccountPayableRepositoryResult<Option<InvoiceAccountPayable>>;

    /// Lists the contributions an obligation received, oldest first.
    async fn links_for(
        &self,
        account_payable_id: AccountPayableId,
    ) -> AccountPayableRepositoryResult<Vec<InvoiceAccountPayable>>;

    /// Lists a company's obligations, oldest first.
    async fn list_for_company(
        &self,
        company_id: CompanyId,
    ) -> AccountPayableRepositoryResult<Vec<AccountPayable>>;

    /// Lists every open obligation, oldest first.
    async fn list_open(&self) -> AccountPayableRepositoryResult<Vec<AccountPayable>>;

    /// Returns an obligation's history in write order.
    async fn history(
        &self,
        account_payable_id: AccountPayableId,
    ) -> AccountPayableRepositoryResult<Vec<AccountPayableHistory>>;
}

/// Errors returned by obligation repository implementations.
#[derive(Debug, Clone, Error)]
pub enum AccountPayableRepositoryError {
    /// An obligation with the same identifier already exists.
    #[error("duplicate account payable identifier: {0}")]
    DuplicatePayable(AccountPayableId),

    /// The obligation was not found.
    #[error("account payable not found: {0}")]
    NotFound(AccountPayableId),

    /// The stored obligation changed since it was read.
    #[error(
        "account payable {account_payable_id} changed concurrently: expected version {expected}, found {found}"
    )]
    VersionConflict {
        /// Obligation identifier.
        account_payable_id: AccountPayableId,
        /// Version the caller read.
        expected: u64,
        /// Version currently stored.
        found: u64,
    },

    /// An open obligation with the same key already exists.
    #[error("open account payable {0} already covers this competency")]
    DuplicateOpenObligation(AccountPayableId),

    /// The invoice already contributed to an obligation.
    #[error("invoice {invoice_id} already posted to account payable {account_payable_id}")]
    InvoiceAlreadyPosted {
        /// Contributing invoice.
        invoice_id: InvoiceId,
        /// Obligation it posted to.
        account_payable_id: AccountPayableId,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl AccountPayableRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Returns whether re-reading and retrying may succeed.
    #[must_use]
    pub const fn is_contention(&self) -> bool {
        matches!(
            self,
            Self::VersionConflict { .. } | Self::DuplicateOpenObligation(_)
        )
    }
}
