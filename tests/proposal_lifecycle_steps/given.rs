//! Given steps for proposal lifecycle BDD scenarios.

use super::world::{ProposalLifecycleWorld, run_async};
use billwright::{
    directory::{
        domain::{Client, CompanyId, UserId},
        ports::ClientDirectory,
    },
    project::{
        domain::{ProjectTemplate, TemplatePhase, TemplateTask},
        ports::TemplateRepository,
        services::InstantiateTemplateRequest,
    },
    proposal::{
        domain::{ContractingType, NewProposal, ServiceType},
        services::TransitionProposalRequest,
    },
};
use chrono::NaiveDate;
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given(r#"a client named "{name}""#)]
fn client_named(world: &mut ProposalLifecycleWorld, name: String) -> Result<(), eyre::Report> {
    let client = Client::new(CompanyId::new(), name).wrap_err("build scenario client")?;
    run_async(world.app.clients().store(&client)).wrap_err("store scenario client")?;
    world.client = Some(client);
    Ok(())
}

#[given(r#"a "{contracting}" proposal for that client"#)]
fn proposal_for_client(
    world: &mut ProposalLifecycleWorld,
    contracting: String,
) -> Result<(), eyre::Report> {
    let client = world
        .client
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing client in scenario world"))?;
    let contracting_type = ContractingType::try_from(contracting.as_str())
        .map_err(|err| eyre::eyre!("invalid contracting type in scenario: {err}"))?;
    let proposal = run_async(
        world.app.proposals().draft(NewProposal::new(
            client.company_id(),
            client.id(),
            UserId::new(),
            "Commerce platform",
            ServiceType::SoftwareDevelopment,
            contracting_type,
        )),
    )
    .wrap_err("draft scenario proposal")?;
    world.proposal = Some(proposal);
    Ok(())
}

#[given(r#"the proposal has been moved to "{status}""#)]
fn proposal_moved(world: &mut ProposalLifecycleWorld, status: String) -> Result<(), eyre::Report> {
    let proposal = world
        .proposal
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing proposal in scenario world"))?;
    let outcome = run_async(
        world
            .app
            .transition_proposal(TransitionProposalRequest::new(proposal.id(), status)),
    )
    .wrap_err("transition proposal in scenario setup")?;
    world.proposal = Some(outcome.proposal);
    Ok(())
}

#[given("a project was instantiated from a three-task template")]
fn project_instantiated(world: &mut ProposalLifecycleWorld) -> Result<(), eyre::Report> {
    let proposal = world
        .proposal
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing proposal in scenario world"))?;
    let discovery = TemplateTask::new("Discovery", 1, 3)?;
    let build = TemplateTask::new("Build", 2, 5)?.with_predecessor(discovery.id());
    let handover = TemplateTask::new("Handover", 1, 2)?.with_days_after_start(10);
    let template = ProjectTemplate::new(proposal.company_id(), "Delivery")?
        .with_phase(
            TemplatePhase::new("Execution", 1)?
                .with_task(discovery)
                .with_task(build),
        )
        .with_phase(TemplatePhase::new("Closing", 2)?.with_task(handover));
    run_async(world.app.templates().store(&template)).wrap_err("store scenario template")?;

    let start = NaiveDate::from_ymd_opt(2024, 1, 1)
        .ok_or_else(|| eyre::eyre!("invalid scenario start date"))?;
    let graph = run_async(world.app.instantiate_project_from_template(
        InstantiateTemplateRequest::new(proposal.id(), template.id(), start),
    ))
    .wrap_err("instantiate scenario project")?;
    world.graph = Some(graph);
    Ok(())
}
