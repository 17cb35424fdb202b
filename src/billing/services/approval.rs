//! Service layer for time entry approval, rejection and draft accrual.

use super::history::invoice_history;
use crate::billing::{
    domain::{
        Approval, BillingDomainError, IdentitySources, Invoice, InvoiceAction, InvoiceBucket,
        InvoiceId, InvoiceTimeEntry, NewTimeEntry, Rejection, TimeEntry, TimeEntryId,
        TimeEntryStatus,
    },
    ports::{
        EntryLinkChange, InvoiceCommit, InvoiceRepository, InvoiceRepositoryError, InvoiceWrite,
        TimeEntryRepository, TimeEntryRepositoryError,
    },
};
use crate::directory::{
    domain::{Client, ClientId, CompanyId, UserId},
    ports::{ClientDirectory, ClientDirectoryError},
};
use crate::error::ErrorKind;
use crate::project::{
    domain::Project,
    ports::{ProjectRepository, ProjectRepositoryError},
};
use crate::proposal::{
    domain::{Proposal, ProposalId},
    ports::{ProposalRepository, ProposalRepositoryError},
};
use chrono::NaiveDate;
use mockable::Clock;
use rust_decimal::Decimal;
use std::sync::Arc;
use thiserror::Error;

/// Attempts made before an accrual or release gives up on contention.
const MAX_COMMIT_ATTEMPTS: usize = 5;

/// Request payload for approving a time entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApproveTimeEntryRequest {
    time_entry_id: TimeEntryId,
    company_id: Option<CompanyId>,
    approval_reason: Option<String>,
    hourly_rate: Option<Decimal>,
    create_invoice: bool,
    approver_id: Option<UserId>,
}

impl ApproveTimeEntryRequest {
    /// Creates a request that invoices billable time.
    #[must_use]
    pub const fn new(time_entry_id: TimeEntryId) -> Self {
        Self {
            time_entry_id,
            company_id: None,
            approval_reason: None,
            hourly_rate: None,
            create_invoice: true,
            approver_id: None,
        }
    }

    /// Sets the company explicitly instead of resolving it from links.
    #[must_use]
    pub const fn with_company(mut self, company_id: CompanyId) -> Self {
        self.company_id = Some(company_id);
        self
    }

    /// Records an approval note.
    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.approval_reason = Some(reason.into());
        self
    }

    /// Sets the hourly rate, replacing any stored rate.
    #[must_use]
    pub const fn with_hourly_rate(mut self, rate: Decimal) -> Self {
        self.hourly_rate = Some(rate);
        self
    }

    /// Approves without invoicing; billable entries are marked waived.
    #[must_use]
    pub const fn without_invoice(mut self) -> Self {
        self.create_invoice = false;
        self
    }

    /// Records the approving reviewer.
    #[must_use]
    pub const fn approved_by(mut self, approver_id: UserId) -> Self {
        self.approver_id = Some(approver_id);
        self
    }
}

/// Request payload for rejecting a time entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectTimeEntryRequest {
    time_entry_id: TimeEntryId,
    rejecter_id: Option<UserId>,
    reason: Option<String>,
}

impl RejectTimeEntryRequest {
    /// Creates a rejection request.
    #[must_use]
    pub const fn new(time_entry_id: TimeEntryId) -> Self {
        Self {
            time_entry_id,
            rejecter_id: None,
            reason: None,
        }
    }

    /// Records a rejection note.
    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Records the rejecting reviewer.
    #[must_use]
    pub const fn rejected_by(mut self, rejecter_id: UserId) -> Self {
        self.rejecter_id = Some(rejecter_id);
        self
    }
}

/// Result of a successful approval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalOutcome {
    /// The approved entry.
    pub time_entry: TimeEntry,
    /// Company the approval was resolved to.
    pub company_id: CompanyId,
    /// Whether the entry was billable.
    pub billable: bool,
    /// Draft invoice the value accrued into, when invoiced.
    pub invoice: Option<Invoice>,
}

/// Value removed from a draft when an approved entry is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleasedContribution {
    /// Draft that tracked the entry.
    pub invoice_id: InvoiceId,
    /// Amount removed.
    pub amount: Decimal,
    /// The draft after release, `None` when it was deleted.
    pub invoice: Option<Invoice>,
}

/// Result of a successful rejection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectionOutcome {
    /// The rejected entry.
    pub time_entry: TimeEntry,
    /// Contribution reversed from a draft, if any.
    pub released: Option<ReleasedContribution>,
}

/// Service-level errors for time entry approval.
#[derive(Debug, Error)]
pub enum TimeEntryApprovalError {
    /// Domain validation failed or the transition was refused.
    #[error(transparent)]
    Domain(#[from] BillingDomainError),
    /// No time entry exists with the given identifier.
    #[error("time entry {0} not found")]
    NotFound(TimeEntryId),
    /// No company could be resolved from the request or the entry's links.
    #[error("time entry {0} has no resolvable company")]
    CompanyUnresolved(TimeEntryId),
    /// A billable entry has no hourly rate.
    #[error("billable time entry {0} has no hourly rate")]
    MissingHourlyRate(TimeEntryId),
    /// A billable entry has no resolvable client to invoice.
    #[error("billable time entry {0} has no resolvable client")]
    MissingClient(TimeEntryId),
    /// Concurrent writers kept moving the draft invoice.
    #[error("draft invoice for time entry {0} kept changing concurrently")]
    Contention(TimeEntryId),
    /// Time entry persistence failed.
    #[error(transparent)]
    TimeEntries(#[from] TimeEntryRepositoryError),
    /// Invoice persistence failed.
    #[error(transparent)]
    Invoices(#[from] InvoiceRepositoryError),
    /// Proposal lookup failed.
    #[error(transparent)]
    Proposals(#[from] ProposalRepositoryError),
    /// Project lookup failed.
    #[error(transparent)]
    Projects(#[from] ProjectRepositoryError),
    /// Client lookup failed.
    #[error(transparent)]
    Clients(#[from] ClientDirectoryError),
}

impl TimeEntryApprovalError {
    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) => err.kind(),
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::CompanyUnresolved(_) | Self::MissingHourlyRate(_) | Self::MissingClient(_) => {
                ErrorKind::Validation
            }
            Self::Contention(_)
            | Self::Invoices(InvoiceRepositoryError::EntryAlreadyTracked { .. }) => {
                ErrorKind::Conflict
            }
            Self::TimeEntries(_)
            | Self::Invoices(_)
            | Self::Proposals(_)
            | Self::Projects(_)
            | Self::Clients(_) => ErrorKind::Internal,
        }
    }
}

/// Result type for time entry approval operations.
pub type TimeEntryApprovalResult<T> = Result<T, TimeEntryApprovalError>;

/// Records an entry's links loaded from their repositories.
struct EntryLinks {
    project: Option<Project>,
    proposal_id: Option<ProposalId>,
    proposal: Option<Proposal>,
    client: Option<Client>,
}

impl EntryLinks {
    fn company_sources(&self, explicit: Option<CompanyId>) -> IdentitySources<CompanyId> {
        IdentitySources {
            explicit,
            project: self.project.as_ref().map(Project::company_id),
            proposal: self.proposal.as_ref().map(Proposal::company_id),
            client: self.client.as_ref().map(Client::company_id),
        }
    }

    fn client_sources(&self, explicit: Option<ClientId>) -> IdentitySources<ClientId> {
        IdentitySources {
            explicit,
            project: self.project.as_ref().map(Project::client_id),
            proposal: self.proposal.as_ref().map(Proposal::client_id),
            client: self.client.as_ref().map(Client::id),
        }
    }

    fn bills_by_the_hour(&self) -> bool {
        self.proposal
            .as_ref()
            .is_some_and(|proposal| proposal.contracting_type().bills_by_the_hour())
    }
}

/// Time entry approval orchestration service.
#[derive(Clone)]
pub struct TimeEntryApprovalService<E, I, P, G, D, C>
where
    E: TimeEntryRepository,
    I: InvoiceRepository,
    P: ProposalRepository,
    G: ProjectRepository,
    D: ClientDirectory,
    C: Clock + Send + Sync,
{
    time_entries: Arc<E>,
    invoices: Arc<I>,
    proposals: Arc<P>,
    projects: Arc<G>,
    clients: Arc<D>,
    clock: Arc<C>,
}

impl<E, I, P, G, D, C> TimeEntryApprovalService<E, I, P, G, D, C>
where
    E: TimeEntryRepository,
    I: InvoiceRepository,
    P: ProposalRepository,
    G: ProjectRepository,
    D: ClientDirectory,
    C: Clock + Send + Sync,
{
    /// Creates a new approval service.
    #[must_use]
    pub const fn new(
        time_entries: Arc<E>,
        invoices: Arc<I>,
        proposals: Arc<P>,
        projects: Arc<G>,
        clients: Arc<D>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            time_entries,
            invoices,
            proposals,
            projects,
            clients,
            clock,
        }
    }

    /// Records a new pending time entry.
    ///
    /// # Errors
    ///
    /// Returns [`TimeEntryApprovalError`] when validation fails or the
    /// repository rejects persistence.
    pub async fn record(&self, params: NewTimeEntry) -> TimeEntryApprovalResult<TimeEntry> {
        let entry = TimeEntry::new(params, &*self.clock)?;
        self.time_entries.store(&entry).await?;
        Ok(entry)
    }

    /// Retrieves a time entry by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TimeEntryApprovalError::TimeEntries`] when the lookup fails.
    pub async fn find_by_id(&self, id: TimeEntryId) -> TimeEntryApprovalResult<Option<TimeEntry>> {
        Ok(self.time_entries.find_by_id(id).await?)
    }

    /// Approves a time entry and accrues billable value into the bucket's
    /// draft invoice.
    ///
    /// Every check runs before the first write. The accrual is one atomic
    /// invoice-store commit, retried when a concurrent approval moved the
    /// same draft.
    ///
    /// # Errors
    ///
    /// Returns [`BillingDomainError::AlreadyApproved`] for an approved
    /// entry, [`TimeEntryApprovalError::NotFound`] for an unknown entry,
    /// validation errors for an unresolvable company, a missing rate or a
    /// missing client, or persistence errors.
    pub async fn approve(
        &self,
        request: ApproveTimeEntryRequest,
    ) -> TimeEntryApprovalResult<ApprovalOutcome> {
        let mut entry = self.load(request.time_entry_id).await?;
        if entry.status() == TimeEntryStatus::Approved {
            return Err(BillingDomainError::AlreadyApproved(entry.id()).into());
        }

        let links = self.resolve_links(&entry).await?;
        let company_id = links
            .company_sources(request.company_id)
            .resolve()
            .ok_or(TimeEntryApprovalError::CompanyUnresolved(entry.id()))?;
        let billable = entry.is_billable() || links.bills_by_the_hour();
        if billable && request.hourly_rate.or(entry.hourly_rate()).is_none() {
            return Err(TimeEntryApprovalError::MissingHourlyRate(entry.id()));
        }
        let bucket = if billable && request.create_invoice {
            let client_id = links
                .client_sources(entry.client_id())
                .resolve()
                .ok_or(TimeEntryApprovalError::MissingClient(entry.id()))?;
            Some(InvoiceBucket {
                company_id,
                client_id,
                proposal_id: links.proposal_id,
            })
        } else {
            None
        };

        entry.approve(
            Approval {
                approver_id: request.approver_id,
                reason: request.approval_reason,
                hourly_rate: request.hourly_rate,
                billing_waived: billable && !request.create_invoice,
            },
            &*self.clock,
        )?;

        let Some(target) = bucket else {
            self.time_entries.update(&entry).await?;
            tracing::info!(
                time_entry_id = %entry.id(),
                company_id = %company_id,
                billable,
                billing_waived = entry.billing_waived(),
                "time entry approved without invoicing"
            );
            return Ok(ApprovalOutcome {
                time_entry: entry,
                company_id,
                billable,
                invoice: None,
            });
        };

        let amount = entry
            .billable_value()
            .ok_or(TimeEntryApprovalError::MissingHourlyRate(entry.id()))?;
        let reference_date = links.proposal.as_ref().and_then(Proposal::proposal_date);
        let invoice = self
            .accrue(target, entry.id(), amount, reference_date, request.approver_id)
            .await?;

        if let Err(err) = self.time_entries.update(&entry).await {
            tracing::error!(
                time_entry_id = %entry.id(),
                invoice_id = %invoice.id(),
                error = %err,
                "saving approved time entry failed, reversing accrual"
            );
            if let Err(release_err) = self.release(entry.id(), request.approver_id).await {
                tracing::error!(
                    time_entry_id = %entry.id(),
                    error = %release_err,
                    "reversing accrual failed"
                );
            }
            return Err(err.into());
        }

        tracing::info!(
            time_entry_id = %entry.id(),
            invoice_id = %invoice.id(),
            amount = %amount,
            gross_value = %invoice.gross_value(),
            "time entry approved and accrued"
        );

        Ok(ApprovalOutcome {
            time_entry: entry,
            company_id,
            billable,
            invoice: Some(invoice),
        })
    }

    /// Rejects a time entry, first reversing any draft contribution.
    ///
    /// # Errors
    ///
    /// Returns [`BillingDomainError::AlreadyRejected`] for a rejected entry,
    /// [`TimeEntryApprovalError::NotFound`] for an unknown entry, or
    /// persistence errors.
    pub async fn reject(
        &self,
        request: RejectTimeEntryRequest,
    ) -> TimeEntryApprovalResult<RejectionOutcome> {
        let mut entry = self.load(request.time_entry_id).await?;
        if entry.status() == TimeEntryStatus::Rejected {
            return Err(BillingDomainError::AlreadyRejected(entry.id()).into());
        }

        let released = if entry.status() == TimeEntryStatus::Approved {
            self.release(entry.id(), request.rejecter_id).await?
        } else {
            None
        };

        entry.reject(
            Rejection {
                rejecter_id: request.rejecter_id,
                reason: request.reason,
            },
            &*self.clock,
        )?;
        self.time_entries.update(&entry).await?;

        tracing::info!(
            time_entry_id = %entry.id(),
            released_from = ?released.as_ref().map(|release| release.invoice_id),
            "time entry rejected"
        );

        Ok(RejectionOutcome {
            time_entry: entry,
            released,
        })
    }

    async fn load(&self, id: TimeEntryId) -> TimeEntryApprovalResult<TimeEntry> {
        self.time_entries
            .find_by_id(id)
            .await?
            .ok_or(TimeEntryApprovalError::NotFound(id))
    }

    async fn resolve_links(&self, entry: &TimeEntry) -> TimeEntryApprovalResult<EntryLinks> {
        let project = match entry.project_id() {
            Some(id) => self.projects.find_project(id).await?,
            None => None,
        };
        let proposal_id = entry
            .proposal_id()
            .or_else(|| project.as_ref().and_then(Project::proposal_id));
        let proposal = match proposal_id {
            Some(id) => self.proposals.find_by_id(id).await?,
            None => None,
        };
        let client = match entry.client_id() {
            Some(id) => self.clients.find_by_id(id).await?,
            None => None,
        };
        Ok(EntryLinks {
            project,
            proposal_id,
            proposal,
            client,
        })
    }

    async fn accrue(
        &self,
        bucket: InvoiceBucket,
        time_entry_id: TimeEntryId,
        amount: Decimal,
        reference_date: Option<NaiveDate>,
        actor: Option<UserId>,
    ) -> TimeEntryApprovalResult<Invoice> {
        for attempt in 1..=MAX_COMMIT_ATTEMPTS {
            let (invoice, commit) = match self.invoices.find_draft(&bucket).await? {
                Some(draft) => {
                    let mut invoice = draft.clone();
                    invoice.accrue(amount, reference_date, &*self.clock)?;
                    let history = invoice_history(
                        invoice.id(),
                        Some(&draft),
                        Some(&invoice),
                        InvoiceAction::Accrued,
                        actor,
                        &*self.clock,
                    );
                    let write = InvoiceWrite::Update {
                        invoice: invoice.clone(),
                        expected_version: draft.version(),
                    };
                    (invoice, InvoiceCommit::new(write).with_history(history))
                }
                None => {
                    let dated = reference_date.unwrap_or_else(|| self.clock.utc().date_naive());
                    let invoice = Invoice::open_timesheet(bucket, amount, dated, &*self.clock)?;
                    let history = invoice_history(
                        invoice.id(),
                        None,
                        Some(&invoice),
                        InvoiceAction::Created,
                        actor,
                        &*self.clock,
                    );
                    let write = InvoiceWrite::Create(invoice.clone());
                    (invoice, InvoiceCommit::new(write).with_history(history))
                }
            };

            let link = InvoiceTimeEntry::new(invoice.id(), time_entry_id, amount, &*self.clock);
            match self
                .invoices
                .commit(commit.with_link(EntryLinkChange::Track(link)))
                .await
            {
                Ok(()) => return Ok(invoice),
                Err(err) if err.is_contention() => {
                    tracing::debug!(
                        time_entry_id = %time_entry_id,
                        attempt,
                        error = %err,
                        "draft invoice changed concurrently, retrying accrual"
                    );
                }
                Err(err) => return Err(err.into()),
            }
        }
        Err(TimeEntryApprovalError::Contention(time_entry_id))
    }

    async fn release(
        &self,
        time_entry_id: TimeEntryId,
        actor: Option<UserId>,
    ) -> TimeEntryApprovalResult<Option<ReleasedContribution>> {
        for attempt in 1..=MAX_COMMIT_ATTEMPTS {
            let Some((current, link)) = self.invoices.find_open_by_time_entry(time_entry_id).await?
            else {
                return Ok(None);
            };
            if !current.is_timesheet_draft() {
                tracing::info!(
                    time_entry_id = %time_entry_id,
                    invoice_id = %current.id(),
                    status = %current.status(),
                    "entry stays on a finalized invoice"
                );
                return Ok(None);
            }

            let remaining = self
                .invoices
                .tracked_entries(current.id())
                .await?
                .len()
                .saturating_sub(1);
            let mut invoice = current.clone();
            invoice.release(link.amount(), &*self.clock)?;

            let (write, kept, action) = if invoice.is_disposable(remaining) {
                let write = InvoiceWrite::Delete {
                    invoice_id: current.id(),
                    expected_version: current.version(),
                };
                (write, None, InvoiceAction::Deleted)
            } else {
                let write = InvoiceWrite::Update {
                    invoice: invoice.clone(),
                    expected_version: current.version(),
                };
                (write, Some(invoice), InvoiceAction::Released)
            };
            let history = invoice_history(
                current.id(),
                Some(&current),
                kept.as_ref(),
                action,
                actor,
                &*self.clock,
            );
            let commit = InvoiceCommit::new(write)
                .with_link(EntryLinkChange::Untrack(time_entry_id))
                .with_history(history);

            match self.invoices.commit(commit).await {
                Ok(()) => {
                    return Ok(Some(ReleasedContribution {
                        invoice_id: current.id(),
                        amount: link.amount(),
                        invoice: kept,
                    }));
                }
                Err(err) if err.is_contention() => {
                    tracing::debug!(
                        time_entry_id = %time_entry_id,
                        attempt,
                        error = %err,
                        "draft invoice changed concurrently, retrying release"
                    );
                }
                Err(err) => return Err(err.into()),
            }
        }
        Err(TimeEntryApprovalError::Contention(time_entry_id))
    }
}
