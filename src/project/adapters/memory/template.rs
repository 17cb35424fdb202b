//! In-memory repository for project templates.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::project::{
    domain::{ProjectTemplate, TemplateId},
    ports::{TemplateRepository, TemplateRepositoryError, TemplateRepositoryResult},
};

/// Thread-safe in-memory template repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTemplateRepository {
    templates: Arc<RwLock<HashMap<TemplateId, ProjectTemplate>>>,
}

impl InMemoryTemplateRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TemplateRepository for InMemoryTemplateRepository {
    async fn store(&self, template: &ProjectTemplate) -> TemplateRepositoryResult<()> {
        let mut templates = self.templates.write().map_err(|err| {
            TemplateRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if templates.contains_key(&template.id()) {
            return Err(TemplateRepositoryError::DuplicateTemplate(template.id()));
        }
        templates.insert(template.id(), template.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: TemplateId) -> TemplateRepositoryResult<Option<ProjectTemplate>> {
        let templates = self.templates.read().map_err(|err| {
            TemplateRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(templates.get(&id).cloned())
    }
}
