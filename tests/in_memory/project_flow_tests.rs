//! Proposal transitions and template instantiation through the command
//! surface.

use billwright::{
    app::CommandError,
    error::ErrorKind,
    project::{
        domain::{ProjectStatus, TaskStatus, TemplateId},
        services::{InstantiateTemplateRequest, TemplateInstantiationError},
    },
    proposal::{
        domain::{ContractingType, ProposalCascade, ProposalStatus},
        services::TransitionProposalRequest,
    },
};
use rstest::rstest;

use super::helpers::{Workspace, date, workspace};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn closed_proposal_becomes_dated_project(#[future(awt)] workspace: Workspace) {
    let proposal = workspace.draft_proposal(ContractingType::Hours).await;
    let template = workspace.store_template().await;
    workspace
        .app
        .transition_proposal(TransitionProposalRequest::new(proposal.id(), "CLOSED"))
        .await
        .expect("proposal closed");

    let graph = workspace
        .app
        .instantiate_project_from_template(InstantiateTemplateRequest::new(
            proposal.id(),
            template.id(),
            date(2024, 1, 1),
        ))
        .await
        .expect("project instantiated");

    assert_eq!(graph.project.name(), "ACME LTDA - Software development");
    assert_eq!(graph.project.end_date(), Some(date(2024, 1, 13)));
    assert_eq!(graph.phases.len(), 2);
    let windows: Vec<_> = graph
        .tasks
        .iter()
        .map(|task| (task.name().to_owned(), task.start_date(), task.end_date()))
        .collect();
    assert_eq!(
        windows,
        vec![
            ("Discovery".to_owned(), date(2024, 1, 1), date(2024, 1, 4)),
            ("Build".to_owned(), date(2024, 1, 4), date(2024, 1, 9)),
            ("Handover".to_owned(), date(2024, 1, 11), date(2024, 1, 13)),
        ]
    );
    assert!(graph.tasks.iter().all(|task| task.requires_time_logging()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn canceling_keeps_project_rows(#[future(awt)] workspace: Workspace) {
    let proposal = workspace.draft_proposal(ContractingType::Fixed).await;
    let template = workspace.store_template().await;
    workspace
        .app
        .transition_proposal(TransitionProposalRequest::new(proposal.id(), "CLOSED"))
        .await
        .expect("proposal closed");
    let graph = workspace
        .app
        .instantiate_project_from_template(InstantiateTemplateRequest::new(
            proposal.id(),
            template.id(),
            date(2024, 1, 1),
        ))
        .await
        .expect("project instantiated");

    let outcome = workspace
        .app
        .transition_proposal(
            TransitionProposalRequest::new(proposal.id(), "canceled").with_reason("budget frozen"),
        )
        .await
        .expect("proposal canceled");

    assert_eq!(outcome.transition.cascade, ProposalCascade::CancelProjects);
    assert_eq!(outcome.proposal.status(), ProposalStatus::Canceled);
    let kept = workspace
        .app
        .instantiation()
        .find_graph(graph.project.id())
        .await
        .expect("lookup succeeds")
        .expect("project kept");
    assert_eq!(kept.project.status(), ProjectStatus::NegotiationCanceled);
    assert!(
        kept.tasks
            .iter()
            .all(|task| task.status() == TaskStatus::Canceled)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reopening_negotiation_removes_project(#[future(awt)] workspace: Workspace) {
    let proposal = workspace.draft_proposal(ContractingType::Fixed).await;
    let template = workspace.store_template().await;
    workspace
        .app
        .transition_proposal(TransitionProposalRequest::new(proposal.id(), "CLOSED"))
        .await
        .expect("proposal closed");
    let graph = workspace
        .app
        .instantiate_project_from_template(InstantiateTemplateRequest::new(
            proposal.id(),
            template.id(),
            date(2024, 1, 1),
        ))
        .await
        .expect("project instantiated");

    let outcome = workspace
        .app
        .transition_proposal(TransitionProposalRequest::new(proposal.id(), "REVISED"))
        .await
        .expect("proposal revised");

    assert_eq!(outcome.affected.projects, 1);
    assert_eq!(outcome.affected.tasks, 3);
    let removed = workspace
        .app
        .instantiation()
        .find_graph(graph.project.id())
        .await
        .expect("lookup succeeds");
    assert!(removed.is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn errors_keep_their_classification(#[future(awt)] workspace: Workspace) {
    let proposal = workspace.draft_proposal(ContractingType::Fixed).await;

    let unknown_status = workspace
        .app
        .transition_proposal(TransitionProposalRequest::new(proposal.id(), "WON"))
        .await
        .expect_err("unknown status must fail");
    assert_eq!(unknown_status.kind(), ErrorKind::Validation);

    let missing_template = workspace
        .app
        .instantiate_project_from_template(InstantiateTemplateRequest::new(
            proposal.id(),
            TemplateId::new(),
            date(2024, 1, 1),
        ))
        .await
        .expect_err("unknown template must fail");
    assert!(matches!(
        missing_template,
        CommandError::Instantiation(TemplateInstantiationError::TemplateNotFound(_))
    ));
    assert_eq!(missing_template.kind(), ErrorKind::NotFound);
}
