//! Repository port for invoices, their tracked entries and history.
//!
//! Every mutation goes through [`InvoiceRepository::commit`], which applies
//! the invoice write, the entry link change and the history rows as one
//! atomic unit guarded by the invoice version.

use crate::billing::domain::{
    Invoice, InvoiceBucket, InvoiceHistory, InvoiceId, InvoiceTimeEntry, TimeEntryId,
};
use crate::directory::domain::CompanyId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for invoice repository operations.
pub type InvoiceRepositoryResult<T> = Result<T, InvoiceRepositoryError>;

/// The invoice row change carried by a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvoiceWrite {
    /// Insert a new invoice.
    Create(Invoice),
    /// Replace an invoice last read at `expected_version`.
    Update {
        /// New invoice state.
        invoice: Invoice,
        /// Version the caller read before mutating.
        expected_version: u64,
    },
    /// Remove an invoice last read at `expected_version`.
    Delete {
        /// Invoice to remove.
        invoice_id: InvoiceId,
        /// Version the caller read before deciding to delete.
        expected_version: u64,
    },
}

impl InvoiceWrite {
    /// Returns the invoice the write targets.
    #[must_use]
    pub const fn invoice_id(&self) -> InvoiceId {
        match self {
            Self::Create(invoice) | Self::Update { invoice, .. } => invoice.id(),
            Self::Delete { invoice_id, .. } => *invoice_id,
        }
    }
}

/// A change to the set of entries tracked by the committed invoice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryLinkChange {
    /// Start tracking an entry.
    Track(InvoiceTimeEntry),
    /// Stop tracking an entry.
    Untrack(TimeEntryId),
}

/// One atomic invoice mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceCommit {
    /// Invoice row change.
    pub write: InvoiceWrite,
    /// Optional tracked-entry change for the same invoice.
    pub link: Option<EntryLinkChange>,
    /// History rows describing the change.
    pub history: Vec<InvoiceHistory>,
}

impl InvoiceCommit {
    /// Creates a commit with no link change and no history.
    #[must_use]
    pub const fn new(write: InvoiceWrite) -> Self {
        Self {
            write,
            link: None,
            history: Vec::new(),
        }
    }

    /// Adds a tracked-entry change.
    #[must_use]
    pub fn with_link(mut self, link: EntryLinkChange) -> Self {
        self.link = Some(link);
        self
    }

    /// Attaches history rows.
    #[must_use]
    pub fn with_history(mut self, history: Vec<InvoiceHistory>) -> Self {
        self.history = history;
        self
    }
}

/// Invoice persistence contract.
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// Applies a commit atomically.
    ///
    /// Nothing is written when any check fails.
    ///
    /// # Errors
    ///
    /// Returns [`InvoiceRepositoryError::VersionConflict`] when the stored
    /// invoice moved past the expected version,
    /// [`InvoiceRepositoryError::DuplicateDraft`] when creating a second
    /// draft for the same bucket,
    /// [`InvoiceRepositoryError::EntryAlreadyTracked`] when an open invoice
    /// already tracks the entry, or not-found and duplicate errors.
    async fn commit(&self, commit: InvoiceCommit) -> InvoiceRepositoryResult<()>;

    /// Finds an invoice by identifier.
    async fn find_by_id(&self, id: InvoiceId) -> InvoiceRepositoryResult<Option<Invoice>>;

    /// Finds the most recently created provisioned timesheet invoice for a
    /// bucket.
    async fn find_draft(&self, bucket: &InvoiceBucket) -> InvoiceRepositoryResult<Option<Invoice>>;

    /// Finds the open invoice tracking an entry, with the tracking link.
    async fn find_open_by_time_entry(
        &self,
        time_entry_id: TimeEntryId,
    ) -> InvoiceRepositoryResult<Option<(Invoice, InvoiceTimeEntry)>>;

    /// Lists the entries an invoice tracks, in tracking order.
    async fn tracked_entries(
        &self,
        invoice_id: InvoiceId,
    ) -> InvoiceRepositoryResult<Vec<InvoiceTimeEntry>>;

    /// Lists a company's invoices, oldest first.
    async fn list_for_company(&self, company_id: CompanyId)
    -> InvoiceRepositoryResult<Vec<Invoice>>;

    /// Returns an invoice's history in write order.
    async fn history(&self, invoice_id: InvoiceId) -> InvoiceRepositoryResult<Vec<InvoiceHistory>>;
}

/// Errors returned by invoice repository implementations.
#[derive(Debug, Clone, Error)]
pub enum InvoiceRepositoryError {
    /// An invoice with the same identifier already exists.
    #[error("duplicate invoice identifier: {0}")]
    DuplicateInvoice(InvoiceId),

    /// The invoice was not found.
    #[error("invoice not found: {0}")]
    NotFound(InvoiceId),

    /// The stored invoice changed since it was read.
    #[error("invoice {invoice_id} changed concurrently: expected version {expected}, found {found}")]
    VersionConflict {
        /// Invoice identifier.
        invoice_id: InvoiceId,
        /// Version the caller read.
        expected: u64,
        /// Version currently stored.
        found: u64,
    },

    /// A draft already exists for the bucket.
    #[error("bucket already has draft invoice {0}")]
    DuplicateDraft(InvoiceId),

    /// An open invoice already tracks the entry.
    #[error("time entry {time_entry_id} is already tracked by invoice {invoice_id}")]
    EntryAlreadyTracked {
        /// Tracked entry.
        time_entry_id: TimeEntryId,
        /// Invoice tracking it.
        invoice_id: InvoiceId,
    },

    /// The invoice does not track the entry.
    #[error("time entry {time_entry_id} is not tracked by invoice {invoice_id}")]
    EntryNotTracked {
        /// Entry to untrack.
        time_entry_id: TimeEntryId,
        /// Committed invoice.
        invoice_id: InvoiceId,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl InvoiceRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Returns whether re-reading and retrying may succeed.
    #[must_use]
    pub const fn is_contention(&self) -> bool {
        matches!(self, Self::VersionConflict { .. } | Self::DuplicateDraft(_))
    }
}
