//! Unit tests for task scheduling and project graph expansion.

use chrono::NaiveDate;
use eyre::{OptionExt, ensure};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

use crate::directory::domain::{ClientId, CompanyId};
use crate::project::domain::{
    PlanContext, ProjectDomainError, ProjectGraph, ProjectStatus, ProjectTemplate, TaskScheduler,
    TaskStatus, TemplatePhase, TemplateTask,
};
use crate::proposal::domain::ProposalId;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

#[fixture]
fn context() -> PlanContext {
    PlanContext {
        company_id: CompanyId::new(),
        client_id: ClientId::new(),
        proposal_id: ProposalId::new(),
        project_name: "ACME LTDA - Consulting".to_owned(),
        start_date: date(2024, 1, 1),
        requires_time_logging: true,
    }
}

/// Two phases: A holds A1 (3 days) and A2 chained after A1 (5 days); B holds
/// one task starting ten days after the project start.
fn phased_template() -> Result<ProjectTemplate, ProjectDomainError> {
    let first = TemplateTask::new("A1", 1, 3)?;
    let second = TemplateTask::new("A2", 2, 5)?.with_predecessor(first.id());
    let offset = TemplateTask::new("B1", 1, 2)?.with_days_after_start(10);
    let phase_b = TemplatePhase::new("B", 2)?.with_task(offset);
    let phase_a = TemplatePhase::new("A", 1)?
        .with_task(second)
        .with_task(first);
    Ok(ProjectTemplate::new(CompanyId::new(), "Phased")?
        .with_phase(phase_b)
        .with_phase(phase_a))
}

#[rstest]
fn scheduler_defaults_to_project_start() -> eyre::Result<()> {
    let mut scheduler = TaskScheduler::new(date(2024, 5, 10));
    let window = scheduler.schedule(&TemplateTask::new("Kickoff", 1, 0)?)?;

    ensure!(window.start == date(2024, 5, 10));
    ensure!(window.end == date(2024, 5, 10));
    Ok(())
}

#[rstest]
fn offset_takes_precedence_over_predecessor() -> eyre::Result<()> {
    let mut scheduler = TaskScheduler::new(date(2024, 1, 1));
    let first = TemplateTask::new("First", 1, 4)?;
    scheduler.schedule(&first)?;
    let both = TemplateTask::new("Both", 2, 1)?
        .with_predecessor(first.id())
        .with_days_after_start(2);

    let window = scheduler.schedule(&both)?;
    ensure!(window.start == date(2024, 1, 3));
    ensure!(window.end == date(2024, 1, 4));
    Ok(())
}

#[rstest]
fn unscheduled_predecessor_is_ignored() -> eyre::Result<()> {
    let mut scheduler = TaskScheduler::new(date(2024, 1, 1));
    let later = TemplateTask::new("Later", 2, 3)?;
    let early = TemplateTask::new("Early", 1, 2)?.with_predecessor(later.id());

    let window = scheduler.schedule(&early)?;
    ensure!(window.start == date(2024, 1, 1));
    ensure!(scheduler.window_of(later.id()).is_none());
    Ok(())
}

#[rstest]
fn date_overflow_is_reported() -> eyre::Result<()> {
    let mut scheduler = TaskScheduler::new(NaiveDate::MAX);
    let result = scheduler.schedule(&TemplateTask::new("Forever", 1, 1)?);

    ensure!(matches!(result, Err(ProjectDomainError::DateOutOfRange { .. })));
    Ok(())
}

#[rstest]
fn phased_template_expands_in_order(context: PlanContext) -> eyre::Result<()> {
    let graph = ProjectGraph::from_template(&phased_template()?, &context, &DefaultClock)?;

    let names: Vec<&str> = graph.tasks.iter().map(|task| task.name()).collect();
    ensure!(names == ["A1", "A2", "B1"], "unexpected order {names:?}");

    let first = graph.tasks.first().ok_or_eyre("missing A1")?;
    ensure!(first.start_date() == date(2024, 1, 1));
    ensure!(first.end_date() == date(2024, 1, 4));

    let second = graph.tasks.get(1).ok_or_eyre("missing A2")?;
    ensure!(second.start_date() == date(2024, 1, 4));
    ensure!(second.end_date() == date(2024, 1, 9));

    let third = graph.tasks.get(2).ok_or_eyre("missing B1")?;
    ensure!(third.start_date() == date(2024, 1, 11));
    ensure!(third.end_date() == date(2024, 1, 13));

    ensure!(graph.project.end_date() == Some(date(2024, 1, 13)));
    ensure!(graph.project.status() == ProjectStatus::Pending);
    ensure!(graph.phases.len() == 2);
    Ok(())
}

#[rstest]
fn tasks_link_to_their_phase_and_proposal(context: PlanContext) -> eyre::Result<()> {
    let graph = ProjectGraph::from_template(&phased_template()?, &context, &DefaultClock)?;
    let phase_a = graph.phases.first().ok_or_eyre("missing phase A")?;

    let first = graph.tasks.first().ok_or_eyre("missing A1")?;
    ensure!(first.phase_id() == Some(phase_a.id()));
    ensure!(first.project_id() == Some(graph.project.id()));
    ensure!(first.links().proposal_id == Some(context.proposal_id));
    ensure!(first.requires_time_logging());
    ensure!(first.status() == TaskStatus::Pending);
    Ok(())
}

#[rstest]
fn end_date_is_last_created_task_not_latest(context: PlanContext) -> eyre::Result<()> {
    let long = TemplateTask::new("Long", 1, 30)?;
    let short = TemplateTask::new("Short", 2, 1)?;
    let template = ProjectTemplate::new(CompanyId::new(), "Legacy")?
        .with_legacy_task(short)
        .with_legacy_task(long);

    let graph = ProjectGraph::from_template(&template, &context, &DefaultClock)?;
    ensure!(graph.phases.is_empty());
    ensure!(graph.tasks.iter().all(|task| task.phase_id().is_none()));
    ensure!(graph.project.end_date() == Some(date(2024, 1, 2)));
    Ok(())
}

#[rstest]
fn empty_template_has_no_end_date(context: PlanContext) -> eyre::Result<()> {
    let template = ProjectTemplate::new(CompanyId::new(), "Empty")?;
    let graph = ProjectGraph::from_template(&template, &context, &DefaultClock)?;

    ensure!(graph.tasks.is_empty());
    ensure!(graph.project.end_date().is_none());
    Ok(())
}

#[rstest]
fn cancel_negotiation_cancels_project_and_tasks(context: PlanContext) -> eyre::Result<()> {
    let mut graph = ProjectGraph::from_template(&phased_template()?, &context, &DefaultClock)?;
    graph.cancel_negotiation(&DefaultClock);

    ensure!(graph.project.status() == ProjectStatus::NegotiationCanceled);
    ensure!(
        graph
            .tasks
            .iter()
            .all(|task| task.status() == TaskStatus::Canceled)
    );
    ensure!(graph.summary().tasks == 3);
    Ok(())
}

#[rstest]
fn blank_template_names_are_rejected() {
    assert_eq!(
        TemplateTask::new("  ", 1, 1).map(|task| task.order()),
        Err(ProjectDomainError::EmptyName("template task"))
    );
    assert!(TemplatePhase::new("", 1).is_err());
    assert!(ProjectTemplate::new(CompanyId::new(), " ").is_err());
}
