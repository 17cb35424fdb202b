//! Error types for template and project validation.

use thiserror::Error;

/// Errors returned while building templates and project graphs.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProjectDomainError {
    /// A template, phase, task or project name is empty after trimming.
    #[error("{0} name must not be empty")]
    EmptyName(&'static str),

    /// A task has no project, phase, proposal or client link.
    #[error("task '{0}' must link to a project, phase, proposal or client")]
    UnlinkedTask(String),

    /// Adding days to a date left the supported calendar range.
    #[error("scheduling '{task}' overflows the calendar ({days} days after {from})")]
    DateOutOfRange {
        /// Name of the task being scheduled.
        task: String,
        /// Base date of the addition.
        from: chrono::NaiveDate,
        /// Days that were added.
        days: u32,
    },
}

/// Error returned while parsing a project status.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown project status: {0}")]
pub struct ParseProjectStatusError(pub String);

/// Error returned while parsing a task status.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
