//! Proposal aggregate root.

use super::{
    ContractingType, ProposalCascade, ProposalDomainError, ProposalId, ProposalStatus,
    ServiceType,
};
use crate::directory::domain::{ClientId, CompanyId, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Parameter object for drafting a new proposal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProposal {
    /// Owning company.
    pub company_id: CompanyId,
    /// Client the proposal is addressed to.
    pub client_id: ClientId,
    /// User responsible for the proposal.
    pub owner_id: UserId,
    /// Short title.
    pub title: String,
    /// Offered service.
    pub service_type: ServiceType,
    /// Billing model.
    pub contracting_type: ContractingType,
    /// Commercial date of the proposal, used to date draft invoices.
    pub proposal_date: Option<NaiveDate>,
    /// Maintenance proposal paired with this one, if any.
    pub maintenance_proposal_id: Option<ProposalId>,
}

impl NewProposal {
    /// Creates a parameter object with required fields.
    #[must_use]
    pub fn new(
        company_id: CompanyId,
        client_id: ClientId,
        owner_id: UserId,
        title: impl Into<String>,
        service_type: ServiceType,
        contracting_type: ContractingType,
    ) -> Self {
        Self {
            company_id,
            client_id,
            owner_id,
            title: title.into(),
            service_type,
            contracting_type,
            proposal_date: None,
            maintenance_proposal_id: None,
        }
    }

    /// Sets the proposal date.
    #[must_use]
    pub const fn with_proposal_date(mut self, date: NaiveDate) -> Self {
        self.proposal_date = Some(date);
        self
    }

    /// Links a maintenance proposal counterpart.
    #[must_use]
    pub const fn with_maintenance_proposal(mut self, proposal_id: ProposalId) -> Self {
        self.maintenance_proposal_id = Some(proposal_id);
        self
    }
}

/// A successful status change, with the cascade it implies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalTransition {
    /// Status before the transition.
    pub from: ProposalStatus,
    /// Status after the transition.
    pub to: ProposalStatus,
    /// Effect on linked projects.
    pub cascade: ProposalCascade,
}

/// Per-status timestamps, each stamped when its transition fires.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct StatusStamps {
    sent_at: Option<DateTime<Utc>>,
    resent_at: Option<DateTime<Utc>>,
    revised_at: Option<DateTime<Utc>>,
    closed_at: Option<DateTime<Utc>>,
    declined_at: Option<DateTime<Utc>>,
    canceled_at: Option<DateTime<Utc>>,
}

/// Commercial proposal aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    id: ProposalId,
    company_id: CompanyId,
    client_id: ClientId,
    owner_id: UserId,
    title: String,
    service_type: ServiceType,
    contracting_type: ContractingType,
    status: ProposalStatus,
    proposal_date: Option<NaiveDate>,
    maintenance_proposal_id: Option<ProposalId>,
    stamps: StatusStamps,
    decline_reason: Option<String>,
    cancel_reason: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Proposal {
    /// Drafts a new proposal.
    ///
    /// # Errors
    ///
    /// Returns [`ProposalDomainError::EmptyTitle`] when the title is blank.
    pub fn new(params: NewProposal, clock: &impl Clock) -> Result<Self, ProposalDomainError> {
        let title = params.title.trim();
        if title.is_empty() {
            return Err(ProposalDomainError::EmptyTitle);
        }
        let timestamp = clock.utc();
        Ok(Self {
            id: ProposalId::new(),
            company_id: params.company_id,
            client_id: params.client_id,
            owner_id: params.owner_id,
            title: title.to_owned(),
            service_type: params.service_type,
            contracting_type: params.contracting_type,
            status: ProposalStatus::Draft,
            proposal_date: params.proposal_date,
            maintenance_proposal_id: params.maintenance_proposal_id,
            stamps: StatusStamps::default(),
            decline_reason: None,
            cancel_reason: None,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Returns the proposal identifier.
    #[must_use]
    pub const fn id(&self) -> ProposalId {
        self.id
    }

    /// Returns the owning company.
    #[must_use]
    pub const fn company_id(&self) -> CompanyId {
        self.company_id
    }

    /// Returns the addressed client.
    #[must_use]
    pub const fn client_id(&self) -> ClientId {
        self.client_id
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn owner_id(&self) -> UserId {
        self.owner_id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the offered service type.
    #[must_use]
    pub const fn service_type(&self) -> ServiceType {
        self.service_type
    }

    /// Returns the contracting type.
    #[must_use]
    pub const fn contracting_type(&self) -> ContractingType {
        self.contracting_type
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> ProposalStatus {
        self.status
    }

    /// Returns the commercial date, if set.
    #[must_use]
    pub const fn proposal_date(&self) -> Option<NaiveDate> {
        self.proposal_date
    }

    /// Returns the linked maintenance proposal, if any.
    #[must_use]
    pub const fn maintenance_proposal_id(&self) -> Option<ProposalId> {
        self.maintenance_proposal_id
    }

    /// Returns when the proposal was last sent.
    #[must_use]
    pub const fn sent_at(&self) -> Option<DateTime<Utc>> {
        self.stamps.sent_at
    }

    /// Returns when the proposal was last resent.
    #[must_use]
    pub const fn resent_at(&self) -> Option<DateTime<Utc>> {
        self.stamps.resent_at
    }

    /// Returns when the proposal was last revised.
    #[must_use]
    pub const fn revised_at(&self) -> Option<DateTime<Utc>> {
        self.stamps.revised_at
    }

    /// Returns when the proposal was last closed.
    #[must_use]
    pub const fn closed_at(&self) -> Option<DateTime<Utc>> {
        self.stamps.closed_at
    }

    /// Returns when the proposal was last declined.
    #[must_use]
    pub const fn declined_at(&self) -> Option<DateTime<Utc>> {
        self.stamps.declined_at
    }

    /// Returns when the proposal was last canceled.
    #[must_use]
    pub const fn canceled_at(&self) -> Option<DateTime<Utc>> {
        self.stamps.canceled_at
    }

    /// Returns the reason given when declining.
    #[must_use]
    pub fn decline_reason(&self) -> Option<&str> {
        self.decline_reason.as_deref()
    }

    /// Returns the reason given when canceling.
    #[must_use]
    pub fn cancel_reason(&self) -> Option<&str> {
        self.cancel_reason.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Links (or replaces) the maintenance proposal counterpart.
    ///
    /// # Errors
    ///
    /// Returns [`ProposalDomainError::SelfMaintenanceLink`] when the proposal
    /// would reference itself.
    pub fn link_maintenance_proposal(
        &mut self,
        counterpart: ProposalId,
        clock: &impl Clock,
    ) -> Result<(), ProposalDomainError> {
        if counterpart == self.id {
            return Err(ProposalDomainError::SelfMaintenanceLink(self.id));
        }
        self.maintenance_proposal_id = Some(counterpart);
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Moves the proposal to `target`, stamping the status timestamp.
    ///
    /// For declines and cancellations the trimmed `reason` is recorded; it is
    /// ignored for every other target.
    ///
    /// # Errors
    ///
    /// Returns [`ProposalDomainError::UnchangedStatus`] when `target` equals
    /// the current status. The proposal is left untouched in that case.
    pub fn transition_to(
        &mut self,
        target: ProposalStatus,
        reason: Option<&str>,
        clock: &impl Clock,
    ) -> Result<ProposalTransition, ProposalDomainError> {
        if !self.status.can_transition_to(target) {
            return Err(ProposalDomainError::UnchangedStatus {
                proposal_id: self.id,
                status: self.status,
            });
        }

        let from = self.status;
        let timestamp = clock.utc();
        let recorded_reason = reason
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_owned);

        match target {
            ProposalStatus::Draft => {}
            ProposalStatus::Sent => self.stamps.sent_at = Some(timestamp),
            ProposalStatus::Resent => self.stamps.resent_at = Some(timestamp),
            ProposalStatus::Revised => self.stamps.revised_at = Some(timestamp),
            ProposalStatus::Closed => self.stamps.closed_at = Some(timestamp),
            ProposalStatus::Declined => {
                self.stamps.declined_at = Some(timestamp);
                self.decline_reason = recorded_reason;
            }
            ProposalStatus::Canceled => {
                self.stamps.canceled_at = Some(timestamp);
                self.cancel_reason = recorded_reason;
            }
        }

        self.status = target;
        self.updated_at = timestamp;
        Ok(ProposalTransition {
            from,
            to: target,
            cascade: ProposalCascade::for_transition(from, target),
        })
    }
}
