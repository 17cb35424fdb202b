//! Then steps for proposal lifecycle BDD scenarios.

use super::world::{ProposalLifecycleWorld, run_async};
use billwright::{
    error::ErrorKind,
    project::domain::{ProjectGraph, ProjectStatus, TaskStatus},
    proposal::domain::ProposalStatus,
};
use eyre::WrapErr;
use rstest_bdd_macros::then;

fn reload_graph(world: &ProposalLifecycleWorld) -> Result<Option<ProjectGraph>, eyre::Report> {
    let graph = world
        .graph
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing project in scenario world"))?;
    run_async(world.app.instantiation().find_graph(graph.project.id()))
        .wrap_err("reload scenario project")
}

fn failure_kind(world: &ProposalLifecycleWorld) -> Result<ErrorKind, eyre::Report> {
    match world.last_transition.as_ref() {
        Some(Err(err)) => Ok(err.kind()),
        Some(Ok(outcome)) => Err(eyre::eyre!(
            "expected the transition to fail, got {:?}",
            outcome.transition
        )),
        None => Err(eyre::eyre!("missing transition result")),
    }
}

#[then(r#"the proposal status is "{status}""#)]
fn proposal_status_is(world: &ProposalLifecycleWorld, status: String) -> Result<(), eyre::Report> {
    let expected = ProposalStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let proposal = world
        .proposal
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing proposal in scenario world"))?;
    let stored = run_async(world.app.proposals().find_by_id(proposal.id()))
        .wrap_err("reload scenario proposal")?
        .ok_or_else(|| eyre::eyre!("proposal vanished"))?;

    eyre::ensure!(
        stored.status() == expected,
        "expected status {}, found {}",
        expected.as_str(),
        stored.status().as_str()
    );
    Ok(())
}

#[then(r#"the project status is "{status}""#)]
fn project_status_is(world: &ProposalLifecycleWorld, status: String) -> Result<(), eyre::Report> {
    let expected = ProjectStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let graph = reload_graph(world)?.ok_or_else(|| eyre::eyre!("project was removed"))?;

    eyre::ensure!(
        graph.project.status() == expected,
        "expected project status {}, found {}",
        expected.as_str(),
        graph.project.status().as_str()
    );
    Ok(())
}

#[then(r#"every task status is "{status}""#)]
fn every_task_status_is(
    world: &ProposalLifecycleWorld,
    status: String,
) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let graph = reload_graph(world)?.ok_or_else(|| eyre::eyre!("project was removed"))?;

    eyre::ensure!(!graph.tasks.is_empty(), "project has no tasks");
    if let Some(task) = graph.tasks.iter().find(|task| task.status() != expected) {
        eyre::bail!(
            "task {} is {}, expected {}",
            task.name(),
            task.status().as_str(),
            expected.as_str()
        );
    }
    Ok(())
}

#[then("the project no longer exists")]
fn project_removed(world: &ProposalLifecycleWorld) -> Result<(), eyre::Report> {
    eyre::ensure!(reload_graph(world)?.is_none(), "project still exists");
    Ok(())
}

#[then("{count:usize} tasks were affected")]
fn tasks_affected(world: &ProposalLifecycleWorld, count: usize) -> Result<(), eyre::Report> {
    let outcome = match world.last_transition.as_ref() {
        Some(Ok(outcome)) => outcome,
        Some(Err(err)) => eyre::bail!("transition failed: {err}"),
        None => eyre::bail!("missing transition result"),
    };
    eyre::ensure!(
        outcome.affected.tasks == count,
        "expected {count} affected tasks, found {}",
        outcome.affected.tasks
    );
    Ok(())
}

#[then("the transition fails as a conflict")]
fn transition_conflicts(world: &ProposalLifecycleWorld) -> Result<(), eyre::Report> {
    let kind = failure_kind(world)?;
    eyre::ensure!(kind == ErrorKind::Conflict, "expected a conflict, got {kind:?}");
    Ok(())
}

#[then("the transition fails as a validation error")]
fn transition_invalid(world: &ProposalLifecycleWorld) -> Result<(), eyre::Report> {
    let kind = failure_kind(world)?;
    eyre::ensure!(
        kind == ErrorKind::Validation,
        "expected a validation error, got {kind:?}"
    );
    Ok(())
}
