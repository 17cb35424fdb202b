//! Calendar resolution for template tasks.

use super::{ProjectDomainError, TemplateTask, TemplateTaskId};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The dated window assigned to one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledWindow {
    /// First day of the task.
    pub start: NaiveDate,
    /// `start` plus the task duration.
    pub end: NaiveDate,
    /// Duration in days.
    pub duration_days: u32,
}

/// Resolves task windows in template order during one instantiation pass.
///
/// Windows are remembered by blueprint id so later tasks can chain onto
/// earlier ones, across phase boundaries. A predecessor that has not been
/// scheduled yet (it appears later in template order, or belongs to another
/// template) is ignored and the task starts with the project.
#[derive(Debug, Clone)]
pub struct TaskScheduler {
    project_start: NaiveDate,
    resolved: HashMap<TemplateTaskId, ScheduledWindow>,
}

impl TaskScheduler {
    /// Creates a scheduler anchored at the project start date.
    #[must_use]
    pub fn new(project_start: NaiveDate) -> Self {
        Self {
            project_start,
            resolved: HashMap::new(),
        }
    }

    /// Returns the anchor date.
    #[must_use]
    pub const fn project_start(&self) -> NaiveDate {
        self.project_start
    }

    /// Returns the window already resolved for a blueprint.
    #[must_use]
    pub fn window_of(&self, task_id: TemplateTaskId) -> Option<ScheduledWindow> {
        self.resolved.get(&task_id).copied()
    }

    /// Resolves and records the window for `task`.
    ///
    /// Precedence: explicit offset from the project start, then the
    /// predecessor's start plus its duration, then the project start.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::DateOutOfRange`] when a date addition
    /// leaves the calendar range.
    pub fn schedule(&mut self, task: &TemplateTask) -> Result<ScheduledWindow, ProjectDomainError> {
        let start = self.resolve_start(task)?;
        let end = add_days(start, task.duration_days(), task)?;
        let window = ScheduledWindow {
            start,
            end,
            duration_days: task.duration_days(),
        };
        self.resolved.insert(task.id(), window);
        Ok(window)
    }

    fn resolve_start(&self, task: &TemplateTask) -> Result<NaiveDate, ProjectDomainError> {
        if let Some(offset) = task.days_after_start() {
            return add_days(self.project_start, offset, task);
        }
        match task.predecessor().and_then(|id| self.window_of(id)) {
            Some(previous) => add_days(previous.start, previous.duration_days, task),
            None => Ok(self.project_start),
        }
    }
}

fn add_days(from: NaiveDate, days: u32, task: &TemplateTask) -> Result<NaiveDate, ProjectDomainError> {
    from.checked_add_days(Days::new(u64::from(days)))
        .ok_or_else(|| ProjectDomainError::DateOutOfRange {
            task: task.name().to_owned(),
            from,
            days,
        })
}
