//! Project and phase records created from templates.

use super::{PhaseId, ProjectDomainError, ProjectId, ProjectStatus, TaskStatus, TemplateId, TemplatePhase, TemplatePhaseId};
use crate::directory::domain::{ClientId, CompanyId};
use crate::proposal::domain::ProposalId;
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Parameter object for creating a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    /// Owning company.
    pub company_id: CompanyId,
    /// Client the work is delivered to.
    pub client_id: ClientId,
    /// Originating proposal, if any.
    pub proposal_id: Option<ProposalId>,
    /// Template the project was expanded from, if any.
    pub template_id: Option<TemplateId>,
    /// Display name.
    pub name: String,
    /// Anchor date of the schedule.
    pub start_date: NaiveDate,
}

/// A concrete, dated project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    company_id: CompanyId,
    client_id: ClientId,
    proposal_id: Option<ProposalId>,
    template_id: Option<TemplateId>,
    name: String,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    status: ProjectStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Project {
    /// Creates a pending project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::EmptyName`] when the name is blank.
    pub fn new(params: NewProject, clock: &impl Clock) -> Result<Self, ProjectDomainError> {
        let name = params.name.trim();
        if name.is_empty() {
            return Err(ProjectDomainError::EmptyName("project"));
        }
        let timestamp = clock.utc();
        Ok(Self {
            id: ProjectId::new(),
            company_id: params.company_id,
            client_id: params.client_id,
            proposal_id: params.proposal_id,
            template_id: params.template_id,
            name: name.to_owned(),
            start_date: params.start_date,
            end_date: None,
            status: ProjectStatus::Pending,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the owning company.
    #[must_use]
    pub const fn company_id(&self) -> CompanyId {
        self.company_id
    }

    /// Returns the client.
    #[must_use]
    pub const fn client_id(&self) -> ClientId {
        self.client_id
    }

    /// Returns the originating proposal, if any.
    #[must_use]
    pub const fn proposal_id(&self) -> Option<ProposalId> {
        self.proposal_id
    }

    /// Returns the source template, if any.
    #[must_use]
    pub const fn template_id(&self) -> Option<TemplateId> {
        self.template_id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the start date.
    #[must_use]
    pub const fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// Returns the end date, once tasks were scheduled.
    #[must_use]
    pub const fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> ProjectStatus {
        self.status
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

    /// Sets the end date.
    pub fn set_end_date(&mut self, end_date: Option<NaiveDate>, clock: &impl Clock) {
        self.end_date = end_date;
        self.updated_at = clock.utc();
    }

    /// Marks the project as canceled during negotiation.
    pub fn mark_negotiation_canceled(&mut self, clock: &impl Clock) {
        self.status = ProjectStatus::NegotiationCanceled;
        self.updated_at = clock.utc();
    }
}

/// A concrete phase of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    id: PhaseId,
    project_id: ProjectId,
    template_phase_id: Option<TemplatePhaseId>,
    name: String,
    order: u32,
    status: TaskStatus,
    created_at: DateTime<Utc>,
}

impl Phase {
    /// Creates a pending phase mirroring a template phase.
    #[must_use]
    pub fn from_template(
        project_id: ProjectId,
        template: &TemplatePhase,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: PhaseId::new(),
            project_id,
            template_phase_id: Some(template.id()),
            name: template.name().to_owned(),
            order: template.order(),
            status: TaskStatus::Pending,
            created_at: clock.utc(),
        }
    }

    /// Returns the phase identifier.
    #[must_use]
    pub const fn id(&self) -> PhaseId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the template phase it was created from.
    #[must_use]
    pub const fn template_phase_id(&self) -> Option<TemplatePhaseId> {
        self.template_phase_id
    }

    /// Returns the phase name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the order index.
    #[must_use]
    pub const fn order(&self) -> u32 {
        self.order
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
