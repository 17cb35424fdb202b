//! Repository port for project templates.

use crate::project::domain::{ProjectTemplate, TemplateId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for template repository operations.
pub type TemplateRepositoryResult<T> = Result<T, TemplateRepositoryError>;

/// Template persistence contract.
///
/// Lookups return the template with its phases and tasks eagerly loaded.
#[async_trait]
pub trait TemplateRepository: Send + Sync {
    /// Stores a new template.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateRepositoryError::DuplicateTemplate`] when the
    /// identifier already exists.
    async fn store(&self, template: &ProjectTemplate) -> TemplateRepositoryResult<()>;

    /// Finds a template by identifier.
    async fn find_by_id(&self, id: TemplateId) -> TemplateRepositoryResult<Option<ProjectTemplate>>;
}

/// Errors returned by template repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TemplateRepositoryError {
    /// A template with the same identifier already exists.
    #[error("duplicate template identifier: {0}")]
    DuplicateTemplate(TemplateId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TemplateRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
