//! Service tests for proposal transitions and their project cascades.

use std::sync::Arc;

use chrono::NaiveDate;
use mockable::DefaultClock;
use rstest::{fixture, rstest};

use crate::directory::domain::{ClientId, CompanyId, UserId};
use crate::error::ErrorKind;
use crate::project::{
    adapters::memory::InMemoryProjectRepository,
    domain::{
        PlanContext, ProjectGraph, ProjectStatus, ProjectTemplate, TaskStatus, TemplatePhase,
        TemplateTask,
    },
    ports::ProjectRepository,
};
use crate::proposal::{
    adapters::memory::InMemoryProposalRepository,
    domain::{
        ContractingType, NewProposal, Proposal, ProposalCascade, ProposalDomainError, ProposalId,
        ProposalStatus, ServiceType,
    },
    services::{ProposalLifecycleError, ProposalLifecycleService, TransitionProposalRequest},
};

type TestService =
    ProposalLifecycleService<InMemoryProposalRepository, InMemoryProjectRepository, DefaultClock>;

struct Harness {
    service: TestService,
    projects: Arc<InMemoryProjectRepository>,
}

#[fixture]
fn harness() -> Harness {
    let projects = Arc::new(InMemoryProjectRepository::new());
    let service = ProposalLifecycleService::new(
        Arc::new(InMemoryProposalRepository::new()),
        Arc::clone(&projects),
        Arc::new(DefaultClock),
    );
    Harness { service, projects }
}

fn new_proposal() -> NewProposal {
    NewProposal::new(
        CompanyId::new(),
        ClientId::new(),
        UserId::new(),
        "Platform rollout",
        ServiceType::SoftwareDevelopment,
        ContractingType::Fixed,
    )
}

fn two_task_template(company_id: CompanyId) -> ProjectTemplate {
    let analysis = TemplateTask::new("Analysis", 1, 3).expect("valid task");
    let build = TemplateTask::new("Build", 2, 5)
        .expect("valid task")
        .with_predecessor(analysis.id());
    let phase = TemplatePhase::new("Delivery", 1)
        .expect("valid phase")
        .with_task(analysis)
        .with_task(build);
    ProjectTemplate::new(company_id, "Standard delivery")
        .expect("valid template")
        .with_phase(phase)
}

async fn seed_project(harness: &Harness, proposal: &Proposal) -> ProjectGraph {
    let context = PlanContext {
        company_id: proposal.company_id(),
        client_id: proposal.client_id(),
        proposal_id: proposal.id(),
        project_name: "ACME - Software development".to_owned(),
        start_date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"),
        requires_time_logging: false,
    };
    let graph = ProjectGraph::from_template(
        &two_task_template(proposal.company_id()),
        &context,
        &DefaultClock,
    )
    .expect("template expands");
    harness
        .projects
        .store_graph(&graph)
        .await
        .expect("graph stored");
    graph
}

async fn closed_proposal_with_project(harness: &Harness) -> (Proposal, ProjectGraph) {
    let proposal = harness
        .service
        .draft(new_proposal())
        .await
        .expect("proposal drafted");
    harness
        .service
        .transition(TransitionProposalRequest::new(proposal.id(), "CLOSED"))
        .await
        .expect("proposal closed");
    let graph = seed_project(harness, &proposal).await;
    (proposal, graph)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn transition_of_unknown_proposal_is_not_found(harness: Harness) {
    let missing = ProposalId::new();
    let err = harness
        .service
        .transition(TransitionProposalRequest::new(missing, "SENT"))
        .await
        .expect_err("unknown proposal must fail");

    assert!(matches!(err, ProposalLifecycleError::NotFound(id) if id == missing));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_status_string_is_a_validation_error(harness: Harness) {
    let proposal = harness
        .service
        .draft(new_proposal())
        .await
        .expect("proposal drafted");
    let err = harness
        .service
        .transition(TransitionProposalRequest::new(proposal.id(), "ARCHIVED"))
        .await
        .expect_err("unknown status must fail");

    assert!(matches!(err, ProposalLifecycleError::InvalidStatus(_)));
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn same_status_is_a_conflict_and_leaves_proposal_untouched(harness: Harness) {
    let proposal = harness
        .service
        .draft(new_proposal())
        .await
        .expect("proposal drafted");
    let err = harness
        .service
        .transition(TransitionProposalRequest::new(proposal.id(), "draft"))
        .await
        .expect_err("same status must fail");

    assert!(matches!(
        err,
        ProposalLifecycleError::Domain(ProposalDomainError::UnchangedStatus { .. })
    ));
    assert_eq!(err.kind(), ErrorKind::Conflict);
    let stored = harness
        .service
        .find_by_id(proposal.id())
        .await
        .expect("lookup succeeds")
        .expect("proposal exists");
    assert_eq!(stored, proposal);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn transition_persists_status_and_stamp(harness: Harness) {
    let proposal = harness
        .service
        .draft(new_proposal())
        .await
        .expect("proposal drafted");
    let outcome = harness
        .service
        .transition(TransitionProposalRequest::new(proposal.id(), "sent"))
        .await
        .expect("transition succeeds");

    assert_eq!(outcome.transition.cascade, ProposalCascade::None);
    assert_eq!(outcome.affected.projects, 0);
    let stored = harness
        .service
        .find_by_id(proposal.id())
        .await
        .expect("lookup succeeds")
        .expect("proposal exists");
    assert_eq!(stored.status(), ProposalStatus::Sent);
    assert!(stored.sent_at().is_some());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn canceling_closed_proposal_soft_cancels_projects(harness: Harness) {
    let (proposal, graph) = closed_proposal_with_project(&harness).await;

    let outcome = harness
        .service
        .transition(
            TransitionProposalRequest::new(proposal.id(), "CANCELED").with_reason("client paused"),
        )
        .await
        .expect("cancel succeeds");

    assert_eq!(outcome.transition.cascade, ProposalCascade::CancelProjects);
    assert_eq!(outcome.affected.projects, 1);
    assert_eq!(outcome.affected.tasks, 2);
    assert_eq!(outcome.proposal.cancel_reason(), Some("client paused"));

    let stored = harness
        .projects
        .find_graph(graph.project.id())
        .await
        .expect("lookup succeeds")
        .expect("project kept");
    assert_eq!(stored.project.status(), ProjectStatus::NegotiationCanceled);
    assert_eq!(stored.tasks.len(), 2);
    assert!(
        stored
            .tasks
            .iter()
            .all(|task| task.status() == TaskStatus::Canceled)
    );
    assert_eq!(stored.phases.len(), 1);
}

#[rstest]
#[case("DECLINED")]
#[case("SENT")]
#[case("REVISED")]
#[tokio::test(flavor = "multi_thread")]
async fn leaving_closed_removes_projects(harness: Harness, #[case] target: &str) {
    let (proposal, graph) = closed_proposal_with_project(&harness).await;

    let outcome = harness
        .service
        .transition(TransitionProposalRequest::new(proposal.id(), target))
        .await
        .expect("transition succeeds");

    assert_eq!(outcome.transition.cascade, ProposalCascade::RemoveProjects);
    assert_eq!(outcome.affected.projects, 1);
    assert_eq!(outcome.affected.phases, 1);
    assert_eq!(outcome.affected.tasks, 2);
    let remaining = harness
        .projects
        .find_graph(graph.project.id())
        .await
        .expect("lookup succeeds");
    assert!(remaining.is_none());
    let by_proposal = harness
        .projects
        .graphs_for_proposal(proposal.id())
        .await
        .expect("lookup succeeds");
    assert!(by_proposal.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn declining_one_proposal_keeps_other_proposals_projects(harness: Harness) {
    let (_, other_graph) = closed_proposal_with_project(&harness).await;
    let (proposal, _) = closed_proposal_with_project(&harness).await;

    harness
        .service
        .transition(TransitionProposalRequest::new(proposal.id(), "DECLINED"))
        .await
        .expect("decline succeeds");

    let kept = harness
        .projects
        .find_graph(other_graph.project.id())
        .await
        .expect("lookup succeeds");
    assert!(kept.is_some());
}
