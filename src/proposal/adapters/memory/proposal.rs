//! In-memory repository for proposals.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::directory::domain::CompanyId;
use crate::proposal::{
    domain::{Proposal, ProposalId},
    ports::{ProposalRepository, ProposalRepositoryError, ProposalRepositoryResult},
};

/// Thread-safe in-memory proposal repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProposalRepository {
    proposals: Arc<RwLock<HashMap<ProposalId, Proposal>>>,
}

impl InMemoryProposalRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> ProposalRepositoryError {
    ProposalRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ProposalRepository for InMemoryProposalRepository {
    async fn store(&self, proposal: &Proposal) -> ProposalRepositoryResult<()> {
        let mut proposals = self.proposals.write().map_err(lock_error)?;
        if proposals.contains_key(&proposal.id()) {
            return Err(ProposalRepositoryError::DuplicateProposal(proposal.id()));
        }
        proposals.insert(proposal.id(), proposal.clone());
        Ok(())
    }

    async fn update(&self, proposal: &Proposal) -> ProposalRepositoryResult<()> {
        let mut proposals = self.proposals.write().map_err(lock_error)?;
        let slot = proposals
            .get_mut(&proposal.id())
            .ok_or(ProposalRepositoryError::NotFound(proposal.id()))?;
        *slot = proposal.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: ProposalId) -> ProposalRepositoryResult<Option<Proposal>> {
        let proposals = self.proposals.read().map_err(lock_error)?;
        Ok(proposals.get(&id).cloned())
    }

    async fn list_for_company(
        &self,
        company_id: CompanyId,
    ) -> ProposalRepositoryResult<Vec<Proposal>> {
        let proposals = self.proposals.read().map_err(lock_error)?;
        let mut owned: Vec<Proposal> = proposals
            .values()
            .filter(|proposal| proposal.company_id() == company_id)
            .cloned()
            .collect();
        owned.sort_by_key(Proposal::created_at);
        Ok(owned)
    }
}
