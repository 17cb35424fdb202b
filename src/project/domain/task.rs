//! Task records.

use super::{PhaseId, ProjectDomainError, ProjectId, ScheduledWindow, TaskId, TaskStatus, TemplateTaskId};
use crate::directory::domain::ClientId;
use crate::proposal::domain::ProposalId;
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Optional ownership links of a task. At least one must be present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskLinks {
    /// Owning project.
    pub project_id: Option<ProjectId>,
    /// Owning phase.
    pub phase_id: Option<PhaseId>,
    /// Related proposal.
    pub proposal_id: Option<ProposalId>,
    /// Related client.
    pub client_id: Option<ClientId>,
}

impl TaskLinks {
    /// Returns whether no link is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.project_id.is_none()
            && self.phase_id.is_none()
            && self.proposal_id.is_none()
            && self.client_id.is_none()
    }
}

/// Parameter object for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Ownership links.
    pub links: TaskLinks,
    /// Blueprint the task was created from, if any.
    pub template_task_id: Option<TemplateTaskId>,
    /// Task name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Order index within its phase or project.
    pub order: u32,
    /// Dated window.
    pub window: ScheduledWindow,
    /// Whether time must be logged before the task can be completed.
    pub requires_time_logging: bool,
}

/// A concrete, dated task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    links: TaskLinks,
    template_task_id: Option<TemplateTaskId>,
    name: String,
    description: Option<String>,
    order: u32,
    start_date: NaiveDate,
    end_date: NaiveDate,
    duration_days: u32,
    status: TaskStatus,
    requires_time_logging: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a pending task.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::EmptyName`] for a blank name and
    /// [`ProjectDomainError::UnlinkedTask`] when no link is set.
    pub fn new(params: NewTask, clock: &impl Clock) -> Result<Self, ProjectDomainError> {
        let name = params.name.trim();
        if name.is_empty() {
            return Err(ProjectDomainError::EmptyName("task"));
        }
        if params.links.is_empty() {
            return Err(ProjectDomainError::UnlinkedTask(name.to_owned()));
        }
        let timestamp = clock.utc();
        Ok(Self {
            id: TaskId::new(),
            links: params.links,
            template_task_id: params.template_task_id,
            name: name.to_owned(),
            description: params.description,
            order: params.order,
            start_date: params.window.start,
            end_date: params.window.end,
            duration_days: params.window.duration_days,
            status: TaskStatus::Pending,
            requires_time_logging: params.requires_time_logging,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the ownership links.
    #[must_use]
    pub const fn links(&self) -> TaskLinks {
        self.links
    }

    /// Returns the owning project, if any.
    #[must_use]
    pub const fn project_id(&self) -> Option<ProjectId> {
        self.links.project_id
    }

    /// Returns the owning phase, if any.
    #[must_use]
    pub const fn phase_id(&self) -> Option<PhaseId> {
        self.links.phase_id
    }

    /// Returns the blueprint, if any.
    #[must_use]
    pub const fn template_task_id(&self) -> Option<TemplateTaskId> {
        self.template_task_id
    }

    /// Returns the name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the order index.
    #[must_use]
    pub const fn order(&self) -> u32 {
        self.order
    }

    /// Returns the start date.
    #[must_use]
    pub const fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// Returns the end date.
    #[must_use]
    pub const fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// Returns the duration in days.
    #[must_use]
    pub const fn duration_days(&self) -> u32 {
        self.duration_days
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns whether time logging is required before completion.
    #[must_use]
    pub const fn requires_time_logging(&self) -> bool {
        self.requires_time_logging
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

    /// Cancels the task.
    pub fn cancel(&mut self, clock: &impl Clock) {
        self.status = TaskStatus::Canceled;
        self.updated_at = clock.utc();
    }
}
