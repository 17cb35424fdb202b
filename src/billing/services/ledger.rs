//! Service layer for invoice finalization, payment and cancellation.

use super::history::invoice_history;
use crate::billing::{
    domain::{
        BillingDomainError, Invoice, InvoiceAction, InvoiceHistory, InvoiceId, InvoiceTimeEntry,
        NewInvoice,
    },
    ports::{
        InvoiceCommit, InvoiceRepository, InvoiceRepositoryError, InvoiceWrite, TaxPosting,
        TaxPostingOutcome,
    },
};
use crate::directory::domain::{CompanyId, UserId};
use crate::error::ErrorKind;
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for finalizing an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssueInvoiceRequest {
    invoice_id: InvoiceId,
    billed_on: Option<NaiveDate>,
    actor: Option<UserId>,
}

impl IssueInvoiceRequest {
    /// Creates a request billed today.
    #[must_use]
    pub const fn new(invoice_id: InvoiceId) -> Self {
        Self {
            invoice_id,
            billed_on: None,
            actor: None,
        }
    }

    /// Sets an explicit billing date, which also dates the tax posting.
    #[must_use]
    pub const fn billed_on(mut self, date: NaiveDate) -> Self {
        self.billed_on = Some(date);
        self
    }

    /// Records the acting user.
    #[must_use]
    pub const fn by(mut self, actor: UserId) -> Self {
        self.actor = Some(actor);
        self
    }
}

/// Result of a successful finalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueInvoiceOutcome {
    /// The issued invoice.
    pub invoice: Invoice,
    /// Tax posting result; `None` for fee-exempt invoices or when posting
    /// failed.
    pub tax: Option<TaxPostingOutcome>,
}

/// Service-level errors for invoice ledger operations.
#[derive(Debug, Error)]
pub enum InvoiceLedgerError {
    /// Domain validation failed or the transition was refused.
    #[error(transparent)]
    Domain(#[from] BillingDomainError),
    /// No invoice exists with the given identifier.
    #[error("invoice {0} not found")]
    NotFound(InvoiceId),
    /// Invoice persistence failed.
    #[error(transparent)]
    Repository(#[from] InvoiceRepositoryError),
}

impl InvoiceLedgerError {
    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) => err.kind(),
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Repository(InvoiceRepositoryError::VersionConflict { .. }) => {
                ErrorKind::Conflict
            }
            Self::Repository(_) => ErrorKind::Internal,
        }
    }
}

/// Result type for invoice ledger operations.
pub type InvoiceLedgerResult<T> = Result<T, InvoiceLedgerError>;

/// Invoice bookkeeping service.
#[derive(Clone)]
pub struct InvoiceLedgerService<I, T, C>
where
    I: InvoiceRepository,
    T: TaxPosting,
    C: Clock + Send + Sync,
{
    invoices: Arc<I>,
    tax: Arc<T>,
    clock: Arc<C>,
}

impl<I, T, C> InvoiceLedgerService<I, T, C>
where
    I: InvoiceRepository,
    T: TaxPosting,
    C: Clock + Send + Sync,
{
    /// Creates a new ledger service.
    #[must_use]
    pub const fn new(invoices: Arc<I>, tax: Arc<T>, clock: Arc<C>) -> Self {
        Self {
            invoices,
            tax,
            clock,
        }
    }

    /// Creates a hand-entered provisioned invoice.
    ///
    /// # Errors
    ///
    /// Returns [`InvoiceLedgerError`] when validation fails or the
    /// repository rejects persistence.
    pub async fn create_manual(
        &self,
        params: NewInvoice,
        actor: Option<UserId>,
    ) -> InvoiceLedgerResult<Invoice> {
        let invoice = Invoice::new(params, &*self.clock)?;
        let history = invoice_history(
            invoice.id(),
            None,
            Some(&invoice),
            InvoiceAction::Created,
            actor,
            &*self.clock,
        );
        self.invoices
            .commit(InvoiceCommit::new(InvoiceWrite::Create(invoice.clone())).with_history(history))
            .await?;
        tracing::info!(
            invoice_id = %invoice.id(),
            origin = ?invoice.origin(),
            gross_value = %invoice.gross_value(),
            "manual invoice created"
        );
        Ok(invoice)
    }

    /// Finalizes a provisioned invoice and posts its statutory tax.
    ///
    /// The tax posting is dated by the explicit billing date, else by the
    /// emission date. Posting failures are logged and never returned.
    ///
    /// # Errors
    ///
    /// Returns [`InvoiceLedgerError::NotFound`] for an unknown invoice,
    /// [`BillingDomainError::InvalidInvoiceTransition`] unless the invoice is
    /// provisioned, or persistence errors.
    pub async fn issue(&self, request: IssueInvoiceRequest) -> InvoiceLedgerResult<IssueInvoiceOutcome> {
        let billed_on = request
            .billed_on
            .unwrap_or_else(|| self.clock.utc().date_naive());
        let invoice = self
            .mutate(request.invoice_id, InvoiceAction::Issued, request.actor, |invoice, clock| {
                invoice.issue(billed_on, clock)
            })
            .await?;

        let tax = if invoice.posts_tax() {
            let effective_date = request.billed_on.unwrap_or(invoice.emission_date());
            match self.tax.post_invoice(&invoice, effective_date).await {
                Ok(outcome) => Some(outcome),
                Err(err) => {
                    tracing::error!(
                        invoice_id = %invoice.id(),
                        effective_date = %effective_date,
                        error = %err,
                        "tax posting failed for issued invoice"
                    );
                    None
                }
            }
        } else {
            None
        };

        tracing::info!(
            invoice_id = %invoice.id(),
            billed_on = %billed_on,
            tax = ?tax,
            "invoice issued"
        );
        Ok(IssueInvoiceOutcome { invoice, tax })
    }

    /// Records payment of an issued invoice.
    ///
    /// # Errors
    ///
    /// Returns [`InvoiceLedgerError::NotFound`] for an unknown invoice,
    /// [`BillingDomainError::InvalidInvoiceTransition`] unless the invoice is
    /// issued, or persistence errors.
    pub async fn mark_received(
        &self,
        invoice_id: InvoiceId,
        received_on: NaiveDate,
        actor: Option<UserId>,
    ) -> InvoiceLedgerResult<Invoice> {
        let invoice = self
            .mutate(invoice_id, InvoiceAction::Received, actor, |invoice, clock| {
                invoice.mark_received(received_on, clock)
            })
            .await?;
        tracing::info!(invoice_id = %invoice_id, received_on = %received_on, "invoice received");
        Ok(invoice)
    }

    /// Voids a provisioned or issued invoice.
    ///
    /// Entries it tracked become free for a later accrual.
    ///
    /// # Errors
    ///
    /// Returns [`InvoiceLedgerError::NotFound`] for an unknown invoice,
    /// [`BillingDomainError::InvalidInvoiceTransition`] for received or
    /// canceled invoices, or persistence errors.
    pub async fn cancel(
        &self,
        invoice_id: InvoiceId,
        reason: Option<&str>,
        actor: Option<UserId>,
    ) -> InvoiceLedgerResult<Invoice> {
        let invoice = self
            .mutate(invoice_id, InvoiceAction::Canceled, actor, |invoice, clock| {
                invoice.cancel(reason, clock)
            })
            .await?;
        tracing::info!(invoice_id = %invoice_id, reason = ?invoice.cancel_reason(), "invoice canceled");
        Ok(invoice)
    }

    /// Retrieves an invoice by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`InvoiceLedgerError::Repository`] when the lookup fails.
    pub async fn find_by_id(&self, id: InvoiceId) -> InvoiceLedgerResult<Option<Invoice>> {
        Ok(self.invoices.find_by_id(id).await?)
    }

    /// Lists a company's invoices, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`InvoiceLedgerError::Repository`] when the lookup fails.
    pub async fn list_for_company(&self, company_id: CompanyId) -> InvoiceLedgerResult<Vec<Invoice>> {
        Ok(self.invoices.list_for_company(company_id).await?)
    }

    /// Lists the time entries an invoice tracks.
    ///
    /// # Errors
    ///
    /// Returns [`InvoiceLedgerError::Repository`] when the lookup fails.
    pub async fn tracked_entries(
        &self,
        invoice_id: InvoiceId,
    ) -> InvoiceLedgerResult<Vec<InvoiceTimeEntry>> {
        Ok(self.invoices.tracked_entries(invoice_id).await?)
    }

    /// Returns an invoice's history in write order.
    ///
    /// # Errors
    ///
    /// Returns [`InvoiceLedgerError::Repository`] when the lookup fails.
    pub async fn history(&self, invoice_id: InvoiceId) -> InvoiceLedgerResult<Vec<InvoiceHistory>> {
        Ok(self.invoices.history(invoice_id).await?)
    }

    async fn mutate<F>(
        &self,
        invoice_id: InvoiceId,
        action: InvoiceAction,
        actor: Option<UserId>,
        change: F,
    ) -> InvoiceLedgerResult<Invoice>
    where
        F: FnOnce(&mut Invoice, &C) -> Result<(), BillingDomainError> + Send,
    {
        let current = self
            .invoices
            .find_by_id(invoice_id)
            .await?
            .ok_or(InvoiceLedgerError::NotFound(invoice_id))?;
        let mut invoice = current.clone();
        change(&mut invoice, &*self.clock)?;
        let history = invoice_history(
            invoice_id,
            Some(&current),
            Some(&invoice),
            action,
            actor,
            &*self.clock,
        );
        let write = InvoiceWrite::Update {
            invoice: invoice.clone(),
            expected_version: current.version(),
        };
        self.invoices
            .commit(InvoiceCommit::new(write).with_history(history))
            .await?;
        Ok(invoice)
    }
}
