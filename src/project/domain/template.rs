//! Reusable project templates.
//!
//! A template either holds ordered phases, each with ordered tasks, or (for
//! templates created before phases existed) a flat task list.

use super::{ProjectDomainError, TemplateId, TemplatePhaseId, TemplateTaskId};
use crate::directory::domain::CompanyId;
use serde::{Deserialize, Serialize};

fn validated_name(value: String, kind: &'static str) -> Result<String, ProjectDomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ProjectDomainError::EmptyName(kind));
    }
    Ok(trimmed.to_owned())
}

/// A task blueprint with its scheduling rule.
///
/// The start date is derived from an explicit offset when present, otherwise
/// from the predecessor's window, otherwise from the project start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateTask {
    id: TemplateTaskId,
    name: String,
    description: Option<String>,
    order: u32,
    duration_days: u32,
    days_after_start: Option<u32>,
    predecessor: Option<TemplateTaskId>,
}

impl TemplateTask {
    /// Creates a task blueprint that starts with the project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::EmptyName`] when the name is blank.
    pub fn new(
        name: impl Into<String>,
        order: u32,
        duration_days: u32,
    ) -> Result<Self, ProjectDomainError> {
        Ok(Self {
            id: TemplateTaskId::new(),
            name: validated_name(name.into(), "template task")?,
            description: None,
            order,
            duration_days,
            days_after_start: None,
            predecessor: None,
        })
    }

    /// Starts the task a fixed number of days after the project start.
    #[must_use]
    pub const fn with_days_after_start(mut self, days: u32) -> Self {
        self.days_after_start = Some(days);
        self
    }

    /// Starts the task when `predecessor` ends.
    #[must_use]
    pub const fn with_predecessor(mut self, predecessor: TemplateTaskId) -> Self {
        self.predecessor = Some(predecessor);
        self
    }

    /// Sets a description copied onto instantiated tasks.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns the blueprint identifier.
    #[must_use]
    pub const fn id(&self) -> TemplateTaskId {
        self.id
    }

    /// Returns the task name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the order index inside its phase or template.
    #[must_use]
    pub const fn order(&self) -> u32 {
        self.order
    }

    /// Returns the task duration in days.
    #[must_use]
    pub const fn duration_days(&self) -> u32 {
        self.duration_days
    }

    /// Returns the explicit offset from the project start, if any.
    #[must_use]
    pub const fn days_after_start(&self) -> Option<u32> {
        self.days_after_start
    }

    /// Returns the predecessor blueprint, if any.
    #[must_use]
    pub const fn predecessor(&self) -> Option<TemplateTaskId> {
        self.predecessor
    }
}

/// An ordered group of task blueprints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplatePhase {
    id: TemplatePhaseId,
    name: String,
    order: u32,
    tasks: Vec<TemplateTask>,
}

impl TemplatePhase {
    /// Creates an empty phase.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::EmptyName`] when the name is blank.
    pub fn new(name: impl Into<String>, order: u32) -> Result<Self, ProjectDomainError> {
        Ok(Self {
            id: TemplatePhaseId::new(),
            name: validated_name(name.into(), "template phase")?,
            order,
            tasks: Vec::new(),
        })
    }

    /// Adds a task blueprint.
    #[must_use]
    pub fn with_task(mut self, task: TemplateTask) -> Self {
        self.tasks.push(task);
        self
    }

    /// Returns the phase identifier.
    #[must_use]
    pub const fn id(&self) -> TemplatePhaseId {
        self.id
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

    /// Returns the tasks sorted by ascending order index.
    ///
    /// Ties keep insertion order.
    #[must_use]
    pub fn ordered_tasks(&self) -> Vec<&TemplateTask> {
        sorted_by_order(&self.tasks)
    }
}

/// A reusable phase/task blueprint owned by a company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectTemplate {
    id: TemplateId,
    company_id: CompanyId,
    name: String,
    phases: Vec<TemplatePhase>,
    legacy_tasks: Vec<TemplateTask>,
}

impl ProjectTemplate {
    /// Creates an empty template.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::EmptyName`] when the name is blank.
    pub fn new(company_id: CompanyId, name: impl Into<String>) -> Result<Self, ProjectDomainError> {
        Ok(Self {
            id: TemplateId::new(),
            company_id,
            name: validated_name(name.into(), "template")?,
            phases: Vec::new(),
            legacy_tasks: Vec::new(),
        })
    }

    /// Adds a phase.
    #[must_use]
    pub fn with_phase(mut self, phase: TemplatePhase) -> Self {
        self.phases.push(phase);
        self
    }

    /// Adds a task directly to the template, outside any phase.
    ///
    /// Only used while the template has no phases.
    #[must_use]
    pub fn with_legacy_task(mut self, task: TemplateTask) -> Self {
        self.legacy_tasks.push(task);
        self
    }

    /// Returns the template identifier.
    #[must_use]
    pub const fn id(&self) -> TemplateId {
        self.id
    }

    /// Returns the owning company.
    #[must_use]
    pub const fn company_id(&self) -> CompanyId {
        self.company_id
    }

    /// Returns the template name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns whether the template predates phases.
    #[must_use]
    pub fn is_legacy(&self) -> bool {
        self.phases.is_empty()
    }

    /// Returns the phases sorted by ascending order index.
    #[must_use]
    pub fn ordered_phases(&self) -> Vec<&TemplatePhase> {
        let mut phases: Vec<&TemplatePhase> = self.phases.iter().collect();
        phases.sort_by_key(|phase| phase.order);
        phases
    }

    /// Returns the flat task list sorted by ascending order index.
    #[must_use]
    pub fn ordered_legacy_tasks(&self) -> Vec<&TemplateTask> {
        sorted_by_order(&self.legacy_tasks)
    }
}

fn sorted_by_order(tasks: &[TemplateTask]) -> Vec<&TemplateTask> {
    let mut ordered: Vec<&TemplateTask> = tasks.iter().collect();
    ordered.sort_by_key(|task| task.order);
    ordered
}
