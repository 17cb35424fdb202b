//! Domain model for templates, projects, phases and tasks.

mod error;
mod graph;
mod ids;
mod project;
mod schedule;
mod status;
mod task;
mod template;

pub use error::{ParseProjectStatusError, ParseTaskStatusError, ProjectDomainError};
pub use graph::{CascadeSummary, PlanContext, ProjectGraph, project_display_name};
pub use ids::{PhaseId, ProjectId, TaskId, TemplateId, TemplatePhaseId, TemplateTaskId};
pub use project::{NewProject, Phase, Project};
pub use schedule::{ScheduledWindow, TaskScheduler};
pub use status::{ProjectStatus, TaskStatus};
pub use task::{NewTask, Task, TaskLinks};
pub use template::{ProjectTemplate, TemplatePhase, TemplateTask};
