//! Invoice finalization, tax posting and the payable sweep through the
//! command surface.

use billwright::{
    app::CommandError,
    billing::{
        domain::{Invoice, InvoiceId, InvoiceStatus, NewTimeEntry},
        ports::TaxPostingOutcome,
        services::{ApproveTimeEntryRequest, IssueInvoiceRequest},
    },
    directory::domain::UserId,
    error::ErrorKind,
    payable::domain::AccountPayableStatus,
};
use rstest::rstest;
use rust_decimal::Decimal;
use std::time::Duration;

use super::helpers::{Workspace, date, workspace};

impl Workspace {
    async fn approved_draft(&self, hours: i64) -> Invoice {
        let entry = self
            .app
            .approvals()
            .record(
                NewTimeEntry::new(UserId::new(), date(2024, 3, 4), Decimal::from(hours))
                    .with_client(self.client.id())
                    .billable()
                    .with_hourly_rate(Decimal::from(100)),
            )
            .await
            .expect("entry recorded");
        self.app
            .approve_time_entry(ApproveTimeEntryRequest::new(entry.id()))
            .await
            .expect("entry approved")
            .invoice
            .expect("draft opened")
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn issuing_posts_statutory_contribution(#[future(awt)] workspace: Workspace) {
    let draft = workspace.approved_draft(100).await;
    assert_eq!(draft.gross_value(), Decimal::from(10_000));

    let issued = workspace
        .app
        .issue_invoice(IssueInvoiceRequest::new(draft.id()).billed_on(date(2024, 3, 15)))
        .await
        .expect("invoice issued");

    assert_eq!(issued.invoice.status(), InvoiceStatus::Issued);
    let Some(TaxPostingOutcome::Posted {
        account_payable_id,
        amount,
    }) = issued.tax
    else {
        panic!("expected a tax posting, got {:?}", issued.tax);
    };
    assert_eq!(amount, Decimal::from(600));

    let payables = workspace
        .app
        .payables()
        .list_for_company(workspace.company_id)
        .await
        .expect("payables listed");
    assert_eq!(payables.len(), 1);
    let payable = payables.first().expect("one payable");
    assert_eq!(payable.id(), account_payable_id);
    assert_eq!(payable.due_date(), date(2024, 4, 25));
    assert_eq!(payable.status(), AccountPayableStatus::Provisioned);

    let repost = workspace
        .app
        .post_tax_obligation(draft.id(), None)
        .await
        .expect("reprocessing succeeds");
    assert_eq!(repost, TaxPostingOutcome::AlreadyPosted);

    let received = workspace
        .app
        .mark_invoice_received(draft.id(), date(2024, 4, 2), None)
        .await
        .expect("receipt recorded");
    assert_eq!(received.status(), InvoiceStatus::Received);
    assert_eq!(received.received_on(), Some(date(2024, 4, 2)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reprocessing_unknown_invoice_is_not_found(#[future(awt)] workspace: Workspace) {
    let missing = InvoiceId::new();

    let err = workspace
        .app
        .post_tax_obligation(missing, Some(date(2024, 3, 15)))
        .await
        .expect_err("unknown invoice must fail");

    assert!(matches!(err, CommandError::InvoiceNotFound(id) if id == missing));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sweep_promotes_obligation_near_its_due_date(#[future(awt)] workspace: Workspace) {
    let draft = workspace.approved_draft(10).await;
    workspace
        .app
        .issue_invoice(IssueInvoiceRequest::new(draft.id()).billed_on(date(2024, 3, 15)))
        .await
        .expect("invoice issued");

    let early = workspace
        .app
        .sweep_payables(date(2024, 4, 1))
        .await
        .expect("sweep runs");
    assert_eq!((early.due_soon, early.overdue), (0, 0));

    let near = workspace
        .app
        .sweep_payables(date(2024, 4, 22))
        .await
        .expect("sweep runs");
    assert_eq!((near.due_soon, near.overdue), (1, 0));

    let late = workspace
        .app
        .sweep_payables(date(2024, 4, 26))
        .await
        .expect("sweep runs");
    assert_eq!((late.due_soon, late.overdue), (0, 1));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn canceling_draft_keeps_payables_untouched(#[future(awt)] workspace: Workspace) {
    let draft = workspace.approved_draft(4).await;

    let canceled = workspace
        .app
        .cancel_invoice(draft.id(), Some("  client withdrew  "), None)
        .await
        .expect("draft canceled");

    assert_eq!(canceled.status(), InvoiceStatus::Canceled);
    let payables = workspace
        .app
        .payables()
        .list_for_company(workspace.company_id)
        .await
        .expect("payables listed");
    assert!(payables.is_empty());

    let err = workspace
        .app
        .issue_invoice(IssueInvoiceRequest::new(draft.id()))
        .await
        .expect_err("canceled invoice cannot be issued");
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn spawned_sweep_can_be_stopped(#[future(awt)] workspace: Workspace) {
    let handle = workspace.app.spawn_payable_sweep();
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!handle.is_finished());

    handle.abort();
    let joined = handle.await.expect_err("aborted task reports cancellation");
    assert!(joined.is_cancelled());
}
