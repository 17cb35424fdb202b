//! Port contracts for templates and project graphs.

pub mod repository;
pub mod template;

pub use repository::{ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult};
pub use template::{TemplateRepository, TemplateRepositoryError, TemplateRepositoryResult};
