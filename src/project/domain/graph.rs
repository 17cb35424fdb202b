//! Project graphs and their expansion from templates.

use super::{
    NewProject, NewTask, Phase, PhaseId, Project, ProjectDomainError, ProjectTemplate, Task,
    TaskLinks, TaskScheduler, TemplateTask,
};
use crate::directory::domain::{ClientId, CompanyId};
use crate::proposal::domain::ProposalId;
use chrono::NaiveDate;
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Builds the display name of a project created for a client.
///
/// ```
/// use billwright::project::domain::project_display_name;
///
/// assert_eq!(
///     project_display_name("Acme Ltda", "Consulting"),
///     "ACME LTDA - Consulting"
/// );
/// ```
#[must_use]
pub fn project_display_name(client_display_name: &str, service_label: &str) -> String {
    format!("{} - {service_label}", client_display_name.trim().to_uppercase())
}

/// Inputs of one template expansion that do not come from the template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanContext {
    /// Owning company.
    pub company_id: CompanyId,
    /// Client of the project.
    pub client_id: ClientId,
    /// Originating proposal.
    pub proposal_id: ProposalId,
    /// Project display name.
    pub project_name: String,
    /// Anchor date of the schedule.
    pub start_date: NaiveDate,
    /// Whether created tasks demand time logging before completion.
    pub requires_time_logging: bool,
}

/// A project with its phases and tasks, in creation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectGraph {
    /// The project row.
    pub project: Project,
    /// Phases, in template order.
    pub phases: Vec<Phase>,
    /// Tasks, in creation order.
    pub tasks: Vec<Task>,
}

impl ProjectGraph {
    /// Expands `template` into a dated project graph.
    ///
    /// Phases are processed by ascending order index and their tasks by
    /// ascending order index; a template without phases contributes its flat
    /// task list directly under the project. The project's end date is the
    /// end date of the last task created, not the latest end date.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError`] when the project name is blank or a
    /// task date leaves the calendar range.
    pub fn from_template(
        template: &ProjectTemplate,
        context: &PlanContext,
        clock: &impl Clock,
    ) -> Result<Self, ProjectDomainError> {
        let mut project = Project::new(
            NewProject {
                company_id: context.company_id,
                client_id: context.client_id,
                proposal_id: Some(context.proposal_id),
                template_id: Some(template.id()),
                name: context.project_name.clone(),
                start_date: context.start_date,
            },
            clock,
        )?;

        let mut scheduler = TaskScheduler::new(context.start_date);
        let mut builder = GraphBuilder {
            project: &project,
            context,
            scheduler: &mut scheduler,
            tasks: Vec::new(),
        };
        let mut phases = Vec::new();

        if template.is_legacy() {
            for blueprint in template.ordered_legacy_tasks() {
                builder.push_task(blueprint, None, clock)?;
            }
        } else {
            for template_phase in template.ordered_phases() {
                let phase = Phase::from_template(project.id(), template_phase, clock);
                for blueprint in template_phase.ordered_tasks() {
                    builder.push_task(blueprint, Some(phase.id()), clock)?;
                }
                phases.push(phase);
            }
        }

        let tasks = builder.tasks;
        project.set_end_date(tasks.last().map(Task::end_date), clock);
        Ok(Self {
            project,
            phases,
            tasks,
        })
    }

    /// Returns a summary of the rows in this graph.
    #[must_use]
    pub fn summary(&self) -> CascadeSummary {
        CascadeSummary {
            projects: 1,
            phases: self.phases.len(),
            tasks: self.tasks.len(),
        }
    }

    /// Marks the project negotiation-canceled and cancels every task.
    pub fn cancel_negotiation(&mut self, clock: &impl Clock) {
        self.project.mark_negotiation_canceled(clock);
        for task in &mut self.tasks {
            task.cancel(clock);
        }
    }
}

struct GraphBuilder<'a> {
    project: &'a Project,
    context: &'a PlanContext,
    scheduler: &'a mut TaskScheduler,
    tasks: Vec<Task>,
}

impl GraphBuilder<'_> {
    fn push_task(
        &mut self,
        blueprint: &TemplateTask,
        phase_id: Option<PhaseId>,
        clock: &impl Clock,
    ) -> Result<(), ProjectDomainError> {
        let window = self.scheduler.schedule(blueprint)?;
        let task = Task::new(
            NewTask {
                links: TaskLinks {
                    project_id: Some(self.project.id()),
                    phase_id,
                    proposal_id: Some(self.context.proposal_id),
                    client_id: Some(self.context.client_id),
                },
                template_task_id: Some(blueprint.id()),
                name: blueprint.name().to_owned(),
                description: blueprint.description().map(str::to_owned),
                order: blueprint.order(),
                window,
                requires_time_logging: self.context.requires_time_logging,
            },
            clock,
        )?;
        self.tasks.push(task);
        Ok(())
    }
}

/// Row counts touched by a cascade or graph operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeSummary {
    /// Projects touched.
    pub projects: usize,
    /// Phases touched.
    pub phases: usize,
    /// Tasks touched.
    pub tasks: usize,
}

impl CascadeSummary {
    /// Adds another summary to this one.
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        Self {
            projects: self.projects + other.projects,
            phases: self.phases + other.phases,
            tasks: self.tasks + other.tasks,
        }
    }
}
