//! Identifier types for templates and project graphs.

uuid_identifier! {
    /// Unique identifier for a project template.
    pub struct TemplateId;
}

uuid_identifier! {
    /// Unique identifier for a phase inside a template.
    pub struct TemplatePhaseId;
}

uuid_identifier! {
    /// Unique identifier for a task inside a template.
    pub struct TemplateTaskId;
}

uuid_identifier! {
    /// Unique identifier for an instantiated project.
    pub struct ProjectId;
}

uuid_identifier! {
    /// Unique identifier for an instantiated project phase.
    pub struct PhaseId;
}

uuid_identifier! {
    /// Unique identifier for an instantiated task.
    pub struct TaskId;
}
