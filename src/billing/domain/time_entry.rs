//! Time entry aggregate and its approval state machine.

use super::{BillingDomainError, ParseTimeEntryStatusError, TimeEntryId};
use crate::directory::domain::{ClientId, UserId};
use crate::project::domain::{ProjectId, TaskId};
use crate::proposal::domain::ProposalId;
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Approval status of a time entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeEntryStatus {
    /// Awaiting a decision.
    Pending,
    /// Approved by a reviewer.
    Approved,
    /// Rejected by a reviewer.
    Rejected,
}

impl TimeEntryStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }

    /// Returns whether a transition to `target` is allowed.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending | Self::Rejected, Self::Approved)
                | (Self::Pending | Self::Approved, Self::Rejected)
        )
    }
}

impl fmt::Display for TimeEntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TimeEntryStatus {
    type Error = ParseTimeEntryStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "APPROVED" => Ok(Self::Approved),
            "REJECTED" => Ok(Self::Rejected),
            _ => Err(ParseTimeEntryStatusError(value.to_owned())),
        }
    }
}

/// Parameter object for recording a unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTimeEntry {
    /// User who performed the work.
    pub author_id: UserId,
    /// Day the work happened.
    pub work_date: NaiveDate,
    /// Quantity of hours.
    pub hours: Decimal,
    /// Free-text description.
    pub description: Option<String>,
    /// Linked project.
    pub project_id: Option<ProjectId>,
    /// Linked proposal.
    pub proposal_id: Option<ProposalId>,
    /// Linked client.
    pub client_id: Option<ClientId>,
    /// Linked task.
    pub task_id: Option<TaskId>,
    /// Explicit billable flag.
    pub billable: bool,
    /// Hourly rate, when already known.
    pub hourly_rate: Option<Decimal>,
}

impl NewTimeEntry {
    /// Creates a non-billable entry with no links.
    #[must_use]
    pub const fn new(author_id: UserId, work_date: NaiveDate, hours: Decimal) -> Self {
        Self {
            author_id,
            work_date,
            hours,
            description: None,
            project_id: None,
            proposal_id: None,
            client_id: None,
            task_id: None,
            billable: false,
            hourly_rate: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Links a project.
    #[must_use]
    pub const fn with_project(mut self, project_id: ProjectId) -> Self {
        self.project_id = Some(project_id);
        self
    }

    /// Links a proposal.
    #[must_use]
    pub const fn with_proposal(mut self, proposal_id: ProposalId) -> Self {
        self.proposal_id = Some(proposal_id);
        self
    }

    /// Links a client.
    #[must_use]
    pub const fn with_client(mut self, client_id: ClientId) -> Self {
        self.client_id = Some(client_id);
        self
    }

    /// Links a task.
    #[must_use]
    pub const fn with_task(mut self, task_id: TaskId) -> Self {
        self.task_id = Some(task_id);
        self
    }

    /// Marks the entry billable.
    #[must_use]
    pub const fn billable(mut self) -> Self {
        self.billable = true;
        self
    }

    /// Sets a known hourly rate.
    #[must_use]
    pub const fn with_hourly_rate(mut self, rate: Decimal) -> Self {
        self.hourly_rate = Some(rate);
        self
    }
}

/// Decision details for an approval.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Approval {
    /// Reviewer approving the entry.
    pub approver_id: Option<UserId>,
    /// Free-text approval note.
    pub reason: Option<String>,
    /// Rate overriding any stored rate.
    pub hourly_rate: Option<Decimal>,
    /// Whether billing was waived for a billable entry.
    pub billing_waived: bool,
}

/// Decision details for a rejection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rejection {
    /// Reviewer rejecting the entry.
    pub rejecter_id: Option<UserId>,
    /// Free-text rejection note.
    pub reason: Option<String>,
}

/// A recorded quantity of work awaiting or holding an approval decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntry {
    id: TimeEntryId,
    author_id: UserId,
    work_date: NaiveDate,
    hours: Decimal,
    description: Option<String>,
    project_id: Option<ProjectId>,
    proposal_id: Option<ProposalId>,
    client_id: Option<ClientId>,
    task_id: Option<TaskId>,
    status: TimeEntryStatus,
    billable: bool,
    hourly_rate: Option<Decimal>,
    billing_waived: bool,
    approved_by: Option<UserId>,
    approved_at: Option<DateTime<Utc>>,
    approval_reason: Option<String>,
    rejected_by: Option<UserId>,
    rejected_at: Option<DateTime<Utc>>,
    rejection_reason: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TimeEntry {
    /// Records a pending time entry.
    ///
    /// # Errors
    ///
    /// Returns [`BillingDomainError::InvalidHours`] for non-positive hours,
    /// [`BillingDomainError::InvalidHourlyRate`] for a non-positive rate, or
    /// [`BillingDomainError::UnlinkedTimeEntry`] when no project, proposal
    /// or client is linked.
    pub fn new(params: NewTimeEntry, clock: &impl Clock) -> Result<Self, BillingDomainError> {
        if params.hours <= Decimal::ZERO {
            return Err(BillingDomainError::InvalidHours(params.hours));
        }
        if let Some(rate) = params.hourly_rate {
            validate_rate(rate)?;
        }
        if params.project_id.is_none() && params.proposal_id.is_none() && params.client_id.is_none()
        {
            return Err(BillingDomainError::UnlinkedTimeEntry);
        }
        let timestamp = clock.utc();
        Ok(Self {
            id: TimeEntryId::new(),
            author_id: params.author_id,
            work_date: params.work_date,
            hours: params.hours,
            description: params.description,
            project_id: params.project_id,
            proposal_id: params.proposal_id,
            client_id: params.client_id,
            task_id: params.task_id,
            status: TimeEntryStatus::Pending,
            billable: params.billable,
            hourly_rate: params.hourly_rate,
            billing_waived: false,
            approved_by: None,
            approved_at: None,
            approval_reason: None,
            rejected_by: None,
            rejected_at: None,
            rejection_reason: None,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Returns the entry identifier.
    #[must_use]
    pub const fn id(&self) -> TimeEntryId {
        self.id
    }

    /// Returns the author.
    #[must_use]
    pub const fn author_id(&self) -> UserId {
        self.author_id
    }

    /// Returns the work date.
    #[must_use]
    pub const fn work_date(&self) -> NaiveDate {
        self.work_date
    }

    /// Returns the quantity of hours.
    #[must_use]
    pub const fn hours(&self) -> Decimal {
        self.hours
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the linked project, if any.
    #[must_use]
    pub const fn project_id(&self) -> Option<ProjectId> {
        self.project_id
    }

    /// Returns the linked proposal, if any.
    #[must_use]
    pub const fn proposal_id(&self) -> Option<ProposalId> {
        self.proposal_id
    }

    /// Returns the linked client, if any.
    #[must_use]
    pub const fn client_id(&self) -> Option<ClientId> {
        self.client_id
    }

    /// Returns the linked task, if any.
    #[must_use]
    pub const fn task_id(&self) -> Option<TaskId> {
        self.task_id
    }

    /// Returns the approval status.
    #[must_use]
    pub const fn status(&self) -> TimeEntryStatus {
        self.status
    }

    /// Returns the explicit billable flag.
    #[must_use]
    pub const fn is_billable(&self) -> bool {
        self.billable
    }

    /// Returns the hourly rate, if resolved.
    #[must_use]
    pub const fn hourly_rate(&self) -> Option<Decimal> {
        self.hourly_rate
    }

    /// Returns whether billing was waived at approval.
    #[must_use]
    pub const fn billing_waived(&self) -> bool {
        self.billing_waived
    }

    /// Returns the approving reviewer, if any.
    #[must_use]
    pub const fn approved_by(&self) -> Option<UserId> {
        self.approved_by
    }

    /// Returns the approval timestamp, if approved.
    #[must_use]
    pub const fn approved_at(&self) -> Option<DateTime<Utc>> {
        self.approved_at
    }

    /// Returns the approval note, if any.
    #[must_use]
    pub fn approval_reason(&self) -> Option<&str> {
        self.approval_reason.as_deref()
    }

    /// Returns the rejecting reviewer, if any.
    #[must_use]
    pub const fn rejected_by(&self) -> Option<UserId> {
        self.rejected_by
    }

    /// Returns the rejection timestamp, if rejected.
    #[must_use]
    pub const fn rejected_at(&self) -> Option<DateTime<Utc>> {
        self.rejected_at
    }

    /// Returns the rejection note, if any.
    #[must_use]
    pub fn rejection_reason(&self) -> Option<&str> {
        self.rejection_reason.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns `hours x rate` when a rate is known.
    #[must_use]
    pub fn billable_value(&self) -> Option<Decimal> {
        self.hourly_rate.map(|rate| self.hours * rate)
    }

    /// Approves the entry.
    ///
    /// A supplied rate replaces the stored one.
    ///
    /// # Errors
    ///
    /// Returns [`BillingDomainError::AlreadyApproved`] when the entry is
    /// already approved, or [`BillingDomainError::InvalidHourlyRate`] for a
    /// non-positive rate.
    pub fn approve(
        &mut self,
        approval: Approval,
        clock: &impl Clock,
    ) -> Result<(), BillingDomainError> {
        if !self.status.can_transition_to(TimeEntryStatus::Approved) {
            return Err(BillingDomainError::AlreadyApproved(self.id));
        }
        if let Some(rate) = approval.hourly_rate {
            validate_rate(rate)?;
            self.hourly_rate = Some(rate);
        }
        let timestamp = clock.utc();
        self.status = TimeEntryStatus::Approved;
        self.approved_by = approval.approver_id;
        self.approved_at = Some(timestamp);
        self.approval_reason = approval.reason;
        self.billing_waived = approval.billing_waived;
        self.updated_at = timestamp;
        Ok(())
    }

    /// Rejects the entry.
    ///
    /// # Errors
    ///
    /// Returns [`BillingDomainError::AlreadyRejected`] when the entry is
    /// already rejected.
    pub fn reject(
        &mut self,
        rejection: Rejection,
        clock: &impl Clock,
    ) -> Result<(), BillingDomainError> {
        if !self.status.can_transition_to(TimeEntryStatus::Rejected) {
            return Err(BillingDomainError::AlreadyRejected(self.id));
        }
        let timestamp = clock.utc();
        self.status = TimeEntryStatus::Rejected;
        self.rejected_by = rejection.rejecter_id;
        self.rejected_at = Some(timestamp);
        self.rejection_reason = rejection.reason;
        self.billing_waived = false;
        self.updated_at = timestamp;
        Ok(())
    }
}

fn validate_rate(rate: Decimal) -> Result<(), BillingDomainError> {
    if rate <= Decimal::ZERO {
        return Err(BillingDomainError::InvalidHourlyRate(rate));
    }
    Ok(())
}
