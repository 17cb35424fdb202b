//! Service tests for obligation settlement and the due-date sweep.

use std::sync::Arc;

use chrono::NaiveDate;
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use rust_decimal::Decimal;

use crate::directory::domain::{CompanyId, UserId};
use crate::error::ErrorKind;
use crate::payable::{
    adapters::memory::InMemoryAccountPayableRepository,
    domain::{
        AccountPayable, AccountPayableAction, AccountPayableId, AccountPayableStatus, Competency,
        ExpenseClassificationId, NewAccountPayable, PayableDomainError, SupplierId,
    },
    ports::{AccountPayableRepository, AccountPayableWrite, PayableCommit},
    services::{AccountsPayableError, AccountsPayableService, DueSoonSweep},
};

type TestService = AccountsPayableService<InMemoryAccountPayableRepository, DefaultClock>;
type TestSweep = DueSoonSweep<InMemoryAccountPayableRepository, DefaultClock>;

struct Harness {
    service: TestService,
    sweep: TestSweep,
    payables: Arc<InMemoryAccountPayableRepository>,
    company_id: CompanyId,
}

#[fixture]
fn harness() -> Harness {
    let payables = Arc::new(InMemoryAccountPayableRepository::new());
    let clock = Arc::new(DefaultClock);
    Harness {
        service: AccountsPayableService::new(Arc::clone(&payables), Arc::clone(&clock)),
        sweep: DueSoonSweep::new(Arc::clone(&payables), 5, clock),
        payables,
        company_id: CompanyId::new(),
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

impl Harness {
    async fn obligation(&self, label: &str, due_date: NaiveDate) -> AccountPayable {
        let payable = AccountPayable::new(
            NewAccountPayable {
                company_id: self.company_id,
                supplier_id: SupplierId::new(),
                classification_id: ExpenseClassificationId::new(),
                description: label.to_owned(),
                competency: Competency::from_date(due_date),
                due_date,
                total_value: Decimal::from(100),
            },
            &DefaultClock,
        )
        .expect("valid obligation");
        self.payables
            .commit(PayableCommit::new(AccountPayableWrite::Create(payable.clone())))
            .await
            .expect("obligation stored");
        payable
    }

    async fn status_of(&self, id: AccountPayableId) -> AccountPayableStatus {
        self.service
            .find_by_id(id)
            .await
            .expect("lookup succeeds")
            .expect("obligation exists")
            .status()
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sweep_promotes_by_due_date(harness: Harness) {
    let near = harness.obligation("near", date(2024, 4, 25)).await;
    let late = harness.obligation("late", date(2024, 4, 10)).await;
    let far = harness.obligation("far", date(2024, 5, 25)).await;

    let report = harness
        .sweep
        .run_once(date(2024, 4, 22))
        .await
        .expect("sweep succeeds");

    assert_eq!(report.due_soon, 1);
    assert_eq!(report.overdue, 1);
    assert_eq!(report.skipped, 0);
    assert_eq!(harness.status_of(near.id()).await, AccountPayableStatus::DueSoon);
    assert_eq!(harness.status_of(late.id()).await, AccountPayableStatus::Overdue);
    assert_eq!(harness.status_of(far.id()).await, AccountPayableStatus::Provisioned);

    let history = harness.service.history(near.id()).await.expect("history readable");
    assert!(
        history
            .iter()
            .any(|row| row.action() == AccountPayableAction::Promoted && row.field() == "status")
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sweep_is_stable_until_dates_move(harness: Harness) {
    let near = harness.obligation("near", date(2024, 4, 25)).await;
    harness
        .sweep
        .run_once(date(2024, 4, 22))
        .await
        .expect("first sweep");

    let repeat = harness
        .sweep
        .run_once(date(2024, 4, 22))
        .await
        .expect("second sweep");
    assert_eq!(repeat.due_soon, 0);
    assert_eq!(repeat.overdue, 0);

    let later = harness
        .sweep
        .run_once(date(2024, 4, 26))
        .await
        .expect("later sweep");
    assert_eq!(later.overdue, 1);
    assert_eq!(harness.status_of(near.id()).await, AccountPayableStatus::Overdue);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn settled_obligations_are_not_swept(harness: Harness) {
    let paid = harness.obligation("paid", date(2024, 4, 1)).await;
    let canceled = harness.obligation("canceled", date(2024, 4, 2)).await;
    harness
        .service
        .mark_paid(paid.id(), date(2024, 3, 30), None)
        .await
        .expect("payment recorded");
    harness
        .service
        .cancel(canceled.id(), None)
        .await
        .expect("cancel succeeds");

    let report = harness
        .sweep
        .run_once(date(2024, 6, 1))
        .await
        .expect("sweep succeeds");

    assert_eq!(report.overdue, 0);
    assert_eq!(harness.status_of(paid.id()).await, AccountPayableStatus::Paid);
    assert_eq!(harness.status_of(canceled.id()).await, AccountPayableStatus::Canceled);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_never_changes_status(harness: Harness) {
    let overdue = harness.obligation("overdue", date(2020, 1, 25)).await;

    let listed = harness
        .service
        .list_for_company(harness.company_id)
        .await
        .expect("list succeeds");

    assert_eq!(listed.len(), 1);
    assert!(
        listed
            .iter()
            .all(|payable| payable.status() == AccountPayableStatus::Provisioned)
    );
    assert_eq!(
        harness.status_of(overdue.id()).await,
        AccountPayableStatus::Provisioned
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn payment_is_recorded_once(harness: Harness) {
    let payable = harness.obligation("tax", date(2024, 4, 25)).await;
    let actor = UserId::new();

    let paid = harness
        .service
        .mark_paid(payable.id(), date(2024, 4, 24), Some(actor))
        .await
        .expect("payment recorded");
    assert_eq!(paid.status(), AccountPayableStatus::Paid);
    assert_eq!(paid.paid_on(), Some(date(2024, 4, 24)));

    let err = harness
        .service
        .cancel(payable.id(), Some(actor))
        .await
        .expect_err("paid obligation cannot be canceled");
    assert!(matches!(
        err,
        AccountsPayableError::Domain(PayableDomainError::InvalidTransition {
            from: AccountPayableStatus::Paid,
            to: AccountPayableStatus::Canceled,
            ..
        })
    ));
    assert_eq!(err.kind(), ErrorKind::Conflict);

    let history = harness.service.history(payable.id()).await.expect("history readable");
    assert!(
        history
            .iter()
            .any(|row| row.action() == AccountPayableAction::Paid && row.changed_by() == Some(actor))
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_obligation_is_not_found(harness: Harness) {
    let missing = AccountPayableId::new();

    let err = harness
        .service
        .mark_paid(missing, date(2024, 4, 24), None)
        .await
        .expect_err("unknown obligation must fail");

    assert!(matches!(err, AccountsPayableError::NotFound(id) if id == missing));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn spawned_sweep_runs_immediately(harness: Harness) {
    let late = harness.obligation("late", date(2020, 1, 25)).await;

    let handle = harness.sweep.clone().spawn(std::time::Duration::from_secs(3600));
    let mut promoted = false;
    for _ in 0..50 {
        if harness.status_of(late.id()).await == AccountPayableStatus::Overdue {
            promoted = true;
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    handle.abort();

    assert!(promoted, "background sweep should promote the overdue obligation");
}
