//! When steps for proposal lifecycle BDD scenarios.

use super::world::{ProposalLifecycleWorld, run_async};
use billwright::proposal::services::TransitionProposalRequest;
use rstest_bdd_macros::when;

#[when(r#"the proposal is moved to "{status}""#)]
fn move_proposal(world: &mut ProposalLifecycleWorld, status: String) -> Result<(), eyre::Report> {
    let proposal = world
        .proposal
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing proposal in scenario world"))?;

    let result = run_async(
        world
            .app
            .transition_proposal(TransitionProposalRequest::new(proposal.id(), status)),
    );
    if let Ok(ref outcome) = result {
        world.proposal = Some(outcome.proposal.clone());
    }
    world.last_transition = Some(result);
    Ok(())
}
