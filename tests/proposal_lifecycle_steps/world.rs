//! Shared world state for proposal lifecycle BDD scenarios.

use billwright::{
    app::{Billwright, CommandError},
    directory::domain::Client,
    project::domain::ProjectGraph,
    proposal::{domain::Proposal, services::ProposalTransitionOutcome},
    settings::Settings,
};
use rstest::fixture;

/// Scenario world for proposal lifecycle behaviour tests.
pub struct ProposalLifecycleWorld {
    /// Command surface under test.
    pub app: Billwright,
    /// Client registered by the scenario.
    pub client: Option<Client>,
    /// Proposal driven through the lifecycle.
    pub proposal: Option<Proposal>,
    /// Project created from the template.
    pub graph: Option<ProjectGraph>,
    /// Result of the last transition attempt.
    pub last_transition: Option<Result<ProposalTransitionOutcome, CommandError>>,
}

impl ProposalLifecycleWorld {
    /// Creates a world over empty in-memory stores.
    #[must_use]
    pub fn new() -> Self {
        Self {
            app: Billwright::with_system_clock(Settings::default()),
            client: None,
            proposal: None,
            graph: None,
            last_transition: None,
        }
    }
}

impl Default for ProposalLifecycleWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ProposalLifecycleWorld {
    ProposalLifecycleWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
