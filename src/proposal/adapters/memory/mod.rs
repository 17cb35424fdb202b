//! In-memory proposal adapters.

mod proposal;

pub use proposal::InMemoryProposalRepository;
