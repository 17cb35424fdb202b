//! Time entry approval and rejection through the command surface.

use billwright::{
    app::CommandError,
    billing::{
        domain::{InvoiceStatus, NewTimeEntry, TimeEntry, TimeEntryStatus},
        services::{ApproveTimeEntryRequest, RejectTimeEntryRequest, TimeEntryApprovalError},
    },
    directory::domain::UserId,
    error::ErrorKind,
    proposal::domain::ContractingType,
};
use rstest::rstest;
use rust_decimal::Decimal;

use super::helpers::{Workspace, date, workspace};

impl Workspace {
    async fn client_entry(&self, hours: i64) -> TimeEntry {
        self.app
            .approvals()
            .record(
                NewTimeEntry::new(UserId::new(), date(2024, 3, 4), Decimal::from(hours))
                    .with_client(self.client.id())
                    .billable()
                    .with_hourly_rate(Decimal::from(100)),
            )
            .await
            .expect("entry recorded")
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn approvals_share_a_draft_until_rejection_empties_it(
    #[future(awt)] workspace: Workspace,
) {
    let first = workspace.client_entry(5).await;
    let second = workspace.client_entry(3).await;

    let opened = workspace
        .app
        .approve_time_entry(ApproveTimeEntryRequest::new(first.id()))
        .await
        .expect("first approval");
    let draft = opened.invoice.expect("draft opened");
    let grown = workspace
        .app
        .approve_time_entry(ApproveTimeEntryRequest::new(second.id()))
        .await
        .expect("second approval")
        .invoice
        .expect("draft grown");
    assert_eq!(grown.id(), draft.id());
    assert_eq!(grown.gross_value(), Decimal::from(800));
    assert_eq!(grown.status(), InvoiceStatus::Provisioned);

    let partial = workspace
        .app
        .reject_time_entry(RejectTimeEntryRequest::new(first.id()).with_reason("duplicate"))
        .await
        .expect("first rejection");
    assert_eq!(partial.time_entry.status(), TimeEntryStatus::Rejected);
    let released = partial.released.expect("contribution released");
    assert_eq!(released.amount, Decimal::from(500));
    assert_eq!(
        released.invoice.map(|invoice| invoice.gross_value()),
        Some(Decimal::from(300))
    );

    let emptied = workspace
        .app
        .reject_time_entry(RejectTimeEntryRequest::new(second.id()))
        .await
        .expect("second rejection")
        .released
        .expect("contribution released");
    assert!(emptied.invoice.is_none());
    let gone = workspace
        .app
        .ledger()
        .find_by_id(draft.id())
        .await
        .expect("lookup succeeds");
    assert!(gone.is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn hourly_proposal_time_lands_on_proposal_draft(#[future(awt)] workspace: Workspace) {
    let proposal = workspace.draft_proposal(ContractingType::Hours).await;
    let entry = workspace
        .app
        .approvals()
        .record(
            NewTimeEntry::new(UserId::new(), date(2024, 3, 4), Decimal::from(2))
                .with_proposal(proposal.id())
                .billable()
                .with_hourly_rate(Decimal::from(150)),
        )
        .await
        .expect("entry recorded");

    let outcome = workspace
        .app
        .approve_time_entry(ApproveTimeEntryRequest::new(entry.id()))
        .await
        .expect("approval");

    assert_eq!(outcome.company_id, workspace.company_id);
    let draft = outcome.invoice.expect("draft opened");
    assert_eq!(draft.proposal_id(), Some(proposal.id()));
    assert_eq!(draft.client_id(), workspace.client.id());
    assert_eq!(draft.gross_value(), Decimal::from(300));
    let tracked = workspace
        .app
        .ledger()
        .tracked_entries(draft.id())
        .await
        .expect("links readable");
    assert_eq!(tracked.len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn approving_twice_is_a_conflict(#[future(awt)] workspace: Workspace) {
    let entry = workspace.client_entry(1).await;
    workspace
        .app
        .approve_time_entry(ApproveTimeEntryRequest::new(entry.id()))
        .await
        .expect("first approval");

    let err = workspace
        .app
        .approve_time_entry(ApproveTimeEntryRequest::new(entry.id()))
        .await
        .expect_err("second approval must fail");

    assert!(matches!(err, CommandError::Approval(TimeEntryApprovalError::Domain(_))));
    assert_eq!(err.kind(), ErrorKind::Conflict);
}
