//! Repository port for proposal persistence and lookup.

use crate::directory::domain::CompanyId;
use crate::proposal::domain::{Proposal, ProposalId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for proposal repository operations.
pub type ProposalRepositoryResult<T> = Result<T, ProposalRepositoryError>;

/// Proposal persistence contract.
#[async_trait]
pub trait ProposalRepository: Send + Sync {
    /// Stores a new proposal.
    ///
    /// # Errors
    ///
    /// Returns [`ProposalRepositoryError::DuplicateProposal`] when the
    /// identifier already exists.
    async fn store(&self, proposal: &Proposal) -> ProposalRepositoryResult<()>;

    /// Persists changes to an existing proposal.
    ///
    /// # Errors
    ///
    /// Returns [`ProposalRepositoryError::NotFound`] when the proposal does
    /// not exist.
    async fn update(&self, proposal: &Proposal) -> ProposalRepositoryResult<()>;

    /// Finds a proposal by identifier.
    ///
    /// Returns `None` when the proposal does not exist.
    async fn find_by_id(&self, id: ProposalId) -> ProposalRepositoryResult<Option<Proposal>>;

    /// Lists the proposals owned by a company, oldest first.
    async fn list_for_company(
        &self,
        company_id: CompanyId,
    ) -> ProposalRepositoryResult<Vec<Proposal>>;
}

/// Errors returned by proposal repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ProposalRepositoryError {
    /// A proposal with the same identifier already exists.
    #[error("duplicate proposal identifier: {0}")]
    DuplicateProposal(ProposalId),

    /// The proposal was not found.
    #[error("proposal not found: {0}")]
    NotFound(ProposalId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ProposalRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
