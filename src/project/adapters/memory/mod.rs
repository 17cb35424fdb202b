//! In-memory template and project adapters.

mod project;
mod template;

pub use project::InMemoryProjectRepository;
pub use template::InMemoryTemplateRepository;
