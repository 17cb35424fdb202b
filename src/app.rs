//! Composition root exposing the command surface over in-memory adapters.
//!
//! [`Billwright`] wires every service to shared in-memory stores and routes
//! each command to its owning context. Embedding applications that bring
//! their own persistence compose the services directly instead.

use crate::billing::{
    adapters::memory::{InMemoryInvoiceRepository, InMemoryTimeEntryRepository},
    domain::{Invoice, InvoiceId},
    ports::{InvoiceRepository, InvoiceRepositoryError, TaxPostingOutcome},
    services::{
        ApprovalOutcome, ApproveTimeEntryRequest, InvoiceLedgerError, InvoiceLedgerService,
        IssueInvoiceOutcome, IssueInvoiceRequest, RejectTimeEntryRequest, RejectionOutcome,
        TimeEntryApprovalError, TimeEntryApprovalService,
    },
};
use crate::directory::{adapters::memory::InMemoryClientDirectory, domain::UserId};
use crate::error::ErrorKind;
use crate::payable::{
    adapters::memory::{InMemoryAccountPayableRepository, InMemoryExpenseCatalog},
    ports::AccountPayableRepositoryError,
    services::{
        AccountsPayableError, AccountsPayableService, DueSoonSweep, SweepReport,
        TaxSubledgerError, TaxSubledgerService,
    },
};
use crate::project::{
    adapters::memory::{InMemoryProjectRepository, InMemoryTemplateRepository},
    domain::ProjectGraph,
    services::{
        InstantiateTemplateRequest, TemplateInstantiationError, TemplateInstantiationService,
    },
};
use crate::proposal::{
    adapters::memory::InMemoryProposalRepository,
    services::{
        ProposalLifecycleError, ProposalLifecycleService, ProposalTransitionOutcome,
        TransitionProposalRequest,
    },
};
use crate::settings::Settings;
use chrono::NaiveDate;
use mockable::{Clock, DefaultClock};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;

/// Tax sub-ledger over the in-memory stores.
pub type MemoryTaxSubledger<C> =
    TaxSubledgerService<InMemoryAccountPayableRepository, InMemoryExpenseCatalog, C>;

/// Proposal lifecycle over the in-memory stores.
pub type MemoryProposalLifecycle<C> =
    ProposalLifecycleService<InMemoryProposalRepository, InMemoryProjectRepository, C>;

/// Template instantiation over the in-memory stores.
pub type MemoryTemplateInstantiation<C> = TemplateInstantiationService<
    InMemoryProposalRepository,
    InMemoryTemplateRepository,
    InMemoryProjectRepository,
    InMemoryClientDirectory,
    C,
>;

/// Time entry approval over the in-memory stores.
pub type MemoryTimeEntryApproval<C> = TimeEntryApprovalService<
    InMemoryTimeEntryRepository,
    InMemoryInvoiceRepository,
    InMemoryProposalRepository,
    InMemoryProjectRepository,
    InMemoryClientDirectory,
    C,
>;

/// Invoice ledger over the in-memory stores.
pub type MemoryInvoiceLedger<C> =
    InvoiceLedgerService<InMemoryInvoiceRepository, MemoryTaxSubledger<C>, C>;

/// Errors returned by the command surface.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Proposal transition failed.
    #[error(transparent)]
    Proposal(#[from] ProposalLifecycleError),
    /// Template instantiation failed.
    #[error(transparent)]
    Instantiation(#[from] TemplateInstantiationError),
    /// Time entry approval or rejection failed.
    #[error(transparent)]
    Approval(#[from] TimeEntryApprovalError),
    /// Invoice bookkeeping failed.
    #[error(transparent)]
    Ledger(#[from] InvoiceLedgerError),
    /// Direct tax posting failed.
    #[error(transparent)]
    TaxPosting(#[from] TaxSubledgerError),
    /// Obligation maintenance failed.
    #[error(transparent)]
    Payables(#[from] AccountsPayableError),
    /// The payable sweep failed.
    #[error(transparent)]
    Sweep(#[from] AccountPayableRepositoryError),
    /// Invoice lookup failed.
    #[error(transparent)]
    Invoices(#[from] InvoiceRepositoryError),
    /// No invoice exists with the given identifier.
    #[error("invoice {0} not found")]
    InvoiceNotFound(InvoiceId),
}

impl CommandError {
    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Proposal(err) => err.kind(),
            Self::Instantiation(err) => err.kind(),
            Self::Approval(err) => err.kind(),
            Self::Ledger(err) => err.kind(),
            Self::TaxPosting(err) => err.kind(),
            Self::Payables(err) => err.kind(),
            Self::InvoiceNotFound(_) => ErrorKind::NotFound,
            Self::Sweep(_) | Self::Invoices(_) => ErrorKind::Internal,
        }
    }
}

/// Result type for commands.
pub type CommandResult<T> = Result<T, CommandError>;

/// Every service wired to shared in-memory stores.
pub struct Billwright<C = DefaultClock>
where
    C: Clock + Send + Sync + 'static,
{
    settings: Settings,
    clients: Arc<InMemoryClientDirectory>,
    templates: Arc<InMemoryTemplateRepository>,
    invoices: Arc<InMemoryInvoiceRepository>,
    catalog: Arc<InMemoryExpenseCatalog>,
    proposals: MemoryProposalLifecycle<C>,
    instantiation: MemoryTemplateInstantiation<C>,
    approvals: MemoryTimeEntryApproval<C>,
    ledger: MemoryInvoiceLedger<C>,
    subledger: Arc<MemoryTaxSubledger<C>>,
    payables: AccountsPayableService<InMemoryAccountPayableRepository, C>,
    sweep: DueSoonSweep<InMemoryAccountPayableRepository, C>,
}

impl Billwright<DefaultClock> {
    /// Wires in-memory stores with the system clock.
    #[must_use]
    pub fn with_system_clock(settings: Settings) -> Self {
        Self::in_memory(settings, Arc::new(DefaultClock))
    }
}

impl<C> Billwright<C>
where
    C: Clock + Send + Sync + 'static,
{
    /// Wires in-memory stores with the given clock.
    #[must_use]
    pub fn in_memory(settings: Settings, clock: Arc<C>) -> Self {
        let clients = Arc::new(InMemoryClientDirectory::new());
        let templates = Arc::new(InMemoryTemplateRepository::new());
        let proposal_store = Arc::new(InMemoryProposalRepository::new());
        let projects = Arc::new(InMemoryProjectRepository::new());
        let time_entries = Arc::new(InMemoryTimeEntryRepository::new());
        let invoices = Arc::new(InMemoryInvoiceRepository::new());
        let payable_store = Arc::new(InMemoryAccountPayableRepository::new());
        let catalog = Arc::new(InMemoryExpenseCatalog::new());

        let subledger = Arc::new(TaxSubledgerService::new(
            Arc::clone(&payable_store),
            Arc::clone(&catalog),
            settings.tax.clone(),
            Arc::clone(&clock),
        ));

        Self {
            proposals: ProposalLifecycleService::new(
                Arc::clone(&proposal_store),
                Arc::clone(&projects),
                Arc::clone(&clock),
            ),
            instantiation: TemplateInstantiationService::new(
                Arc::clone(&proposal_store),
                Arc::clone(&templates),
                Arc::clone(&projects),
                Arc::clone(&clients),
                Arc::clone(&clock),
            ),
            approvals: TimeEntryApprovalService::new(
                time_entries,
                Arc::clone(&invoices),
                proposal_store,
                projects,
                Arc::clone(&clients),
                Arc::clone(&clock),
            ),
            ledger: InvoiceLedgerService::new(
                Arc::clone(&invoices),
                Arc::clone(&subledger),
                Arc::clone(&clock),
            ),
            payables: AccountsPayableService::new(Arc::clone(&payable_store), Arc::clone(&clock)),
            sweep: DueSoonSweep::new(
                payable_store,
                settings.payables.due_soon_window_days,
                clock,
            ),
            subledger,
            settings,
            clients,
            templates,
            invoices,
            catalog,
        }
    }

    /// Returns the active settings.
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns the client directory.
    #[must_use]
    pub const fn clients(&self) -> &Arc<InMemoryClientDirectory> {
        &self.clients
    }

    /// Returns the template store.
    #[must_use]
    pub const fn templates(&self) -> &Arc<InMemoryTemplateRepository> {
        &self.templates
    }

    /// Returns the expense catalog.
    #[must_use]
    pub const fn catalog(&self) -> &Arc<InMemoryExpenseCatalog> {
        &self.catalog
    }

    /// Returns the proposal lifecycle service.
    #[must_use]
    pub const fn proposals(&self) -> &MemoryProposalLifecycle<C> {
        &self.proposals
    }

    /// Returns the template instantiation service.
    #[must_use]
    pub const fn instantiation(&self) -> &MemoryTemplateInstantiation<C> {
        &self.instantiation
    }

    /// Returns the time entry approval service.
    #[must_use]
    pub const fn approvals(&self) -> &MemoryTimeEntryApproval<C> {
        &self.approvals
    }

    /// Returns the invoice ledger service.
    #[must_use]
    pub const fn ledger(&self) -> &MemoryInvoiceLedger<C> {
        &self.ledger
    }

    /// Returns the tax sub-ledger service.
    #[must_use]
    pub fn subledger(&self) -> &MemoryTaxSubledger<C> {
        &self.subledger
    }

    /// Returns the obligation maintenance service.
    #[must_use]
    pub const fn payables(&self) -> &AccountsPayableService<InMemoryAccountPayableRepository, C> {
        &self.payables
    }

    /// Moves a proposal to another status.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Proposal`] when the transition fails.
    pub async fn transition_proposal(
        &self,
        request: TransitionProposalRequest,
    ) -> CommandResult<ProposalTransitionOutcome> {
        Ok(self.proposals.transition(request).await?)
    }

    /// Creates a dated project from a template for a proposal.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Instantiation`] when instantiation fails.
    pub async fn instantiate_project_from_template(
        &self,
        request: InstantiateTemplateRequest,
    ) -> CommandResult<ProjectGraph> {
        Ok(self.instantiation.instantiate(request).await?)
    }

    /// Approves a time entry.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Approval`] when approval fails.
    pub async fn approve_time_entry(
        &self,
        request: ApproveTimeEntryRequest,
    ) -> CommandResult<ApprovalOutcome> {
        Ok(self.approvals.approve(request).await?)
    }

    /// Rejects a time entry.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Approval`] when rejection fails.
    pub async fn reject_time_entry(
        &self,
        request: RejectTimeEntryRequest,
    ) -> CommandResult<RejectionOutcome> {
        Ok(self.approvals.reject(request).await?)
    }

    /// Posts an invoice's statutory contribution directly, for
    /// reprocessing.
    ///
    /// The effective date defaults to the invoice's billing date, then its
    /// emission date. Unlike posting from [`Self::issue_invoice`], errors are
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::InvoiceNotFound`] for an unknown invoice or
    /// [`CommandError::TaxPosting`] when posting fails.
    pub async fn post_tax_obligation(
        &self,
        invoice_id: InvoiceId,
        effective_date: Option<NaiveDate>,
    ) -> CommandResult<TaxPostingOutcome> {
        let invoice = self
            .invoices
            .find_by_id(invoice_id)
            .await?
            .ok_or(CommandError::InvoiceNotFound(invoice_id))?;
        let effective = effective_date
            .or(invoice.billed_on())
            .unwrap_or(invoice.emission_date());
        Ok(self.subledger.post(&invoice, effective).await?)
    }

    /// Finalizes an invoice and posts its statutory contribution.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Ledger`] when finalization fails.
    pub async fn issue_invoice(
        &self,
        request: IssueInvoiceRequest,
    ) -> CommandResult<IssueInvoiceOutcome> {
        Ok(self.ledger.issue(request).await?)
    }

    /// Records payment of an issued invoice.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Ledger`] when the change fails.
    pub async fn mark_invoice_received(
        &self,
        invoice_id: InvoiceId,
        received_on: NaiveDate,
        actor: Option<UserId>,
    ) -> CommandResult<Invoice> {
        Ok(self
            .ledger
            .mark_received(invoice_id, received_on, actor)
            .await?)
    }

    /// Voids an invoice.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Ledger`] when the change fails.
    pub async fn cancel_invoice(
        &self,
        invoice_id: InvoiceId,
        reason: Option<&str>,
        actor: Option<UserId>,
    ) -> CommandResult<Invoice> {
        Ok(self.ledger.cancel(invoice_id, reason, actor).await?)
    }

    /// Runs one payable promotion sweep as of `today`.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Sweep`] when the sweep fails.
    pub async fn sweep_payables(&self, today: NaiveDate) -> CommandResult<SweepReport> {
        Ok(self.sweep.run_once(today).await?)
    }

    /// Starts the periodic payable sweep on the configured interval.
    #[must_use]
    pub fn spawn_payable_sweep(&self) -> JoinHandle<()> {
        self.sweep
            .clone()
            .spawn(self.settings.payables.sweep_interval())
    }
}
