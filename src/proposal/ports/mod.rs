//! Port contracts for proposal persistence.

pub mod repository;

pub use repository::{ProposalRepository, ProposalRepositoryError, ProposalRepositoryResult};
