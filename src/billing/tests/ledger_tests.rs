//! Service tests for invoice finalization, receipt and cancellation.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use mockable::DefaultClock;
use mockall::mock;
use rstest::rstest;
use rust_decimal::Decimal;
use serde_json::json;

use crate::billing::{
    adapters::memory::InMemoryInvoiceRepository,
    domain::{
        BillingDomainError, EmissionType, Invoice, InvoiceAction, InvoiceId, InvoiceStatus,
        NewInvoice,
    },
    ports::{TaxPosting, TaxPostingError, TaxPostingOutcome},
    services::{InvoiceLedgerError, InvoiceLedgerService, IssueInvoiceRequest},
};
use crate::directory::domain::{ClientId, CompanyId, UserId};
use crate::error::ErrorKind;
use crate::payable::domain::AccountPayableId;

mock! {
    TaxLedger {}

    #[async_trait]
    impl TaxPosting for TaxLedger {
        async fn post_invoice(
            &self,
            invoice: &Invoice,
            effective_date: NaiveDate,
        ) -> Result<TaxPostingOutcome, TaxPostingError>;
    }
}

type TestLedger = InvoiceLedgerService<InMemoryInvoiceRepository, MockTaxLedger, DefaultClock>;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

fn ledger(tax: MockTaxLedger) -> TestLedger {
    InvoiceLedgerService::new(
        Arc::new(InMemoryInvoiceRepository::new()),
        Arc::new(tax),
        Arc::new(DefaultClock),
    )
}

fn manual_invoice() -> NewInvoice {
    NewInvoice::new(
        CompanyId::new(),
        ClientId::new(),
        Decimal::from(10_000),
        date(2024, 3, 15),
    )
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn issue_posts_tax_on_billing_date() {
    let payable_id = AccountPayableId::new();
    let mut tax = MockTaxLedger::new();
    tax.expect_post_invoice()
        .withf(|invoice, effective_date| {
            invoice.status() == InvoiceStatus::Issued && *effective_date == date(2024, 3, 20)
        })
        .times(1)
        .returning(move |_, _| {
            Ok(TaxPostingOutcome::Posted {
                account_payable_id: payable_id,
                amount: Decimal::from(600),
            })
        });
    let service = ledger(tax);
    let invoice = service
        .create_manual(manual_invoice(), None)
        .await
        .expect("invoice created");

    let outcome = service
        .issue(IssueInvoiceRequest::new(invoice.id()).billed_on(date(2024, 3, 20)))
        .await
        .expect("issue succeeds");

    assert_eq!(outcome.invoice.status(), InvoiceStatus::Issued);
    assert_eq!(outcome.invoice.billed_on(), Some(date(2024, 3, 20)));
    assert_eq!(
        outcome.tax,
        Some(TaxPostingOutcome::Posted {
            account_payable_id: payable_id,
            amount: Decimal::from(600),
        })
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn tax_is_dated_by_emission_without_billing_date() {
    let mut tax = MockTaxLedger::new();
    tax.expect_post_invoice()
        .withf(|_, effective_date| *effective_date == date(2024, 3, 15))
        .times(1)
        .returning(|_, _| Ok(TaxPostingOutcome::AlreadyPosted));
    let service = ledger(tax);
    let invoice = service
        .create_manual(manual_invoice(), None)
        .await
        .expect("invoice created");

    let outcome = service
        .issue(IssueInvoiceRequest::new(invoice.id()))
        .await
        .expect("issue succeeds");

    assert!(outcome.invoice.billed_on().is_some());
    assert_eq!(outcome.tax, Some(TaxPostingOutcome::AlreadyPosted));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn tax_failure_does_not_fail_issue() {
    let mut tax = MockTaxLedger::new();
    tax.expect_post_invoice()
        .times(1)
        .returning(|_, _| Err(TaxPostingError::new(std::io::Error::other("ledger offline"))));
    let service = ledger(tax);
    let invoice = service
        .create_manual(manual_invoice(), None)
        .await
        .expect("invoice created");

    let outcome = service
        .issue(IssueInvoiceRequest::new(invoice.id()))
        .await
        .expect("issue succeeds despite tax failure");

    assert!(outcome.tax.is_none());
    let stored = service
        .find_by_id(invoice.id())
        .await
        .expect("lookup succeeds")
        .expect("invoice exists");
    assert_eq!(stored.status(), InvoiceStatus::Issued);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn fee_exempt_invoice_skips_tax() {
    let mut tax = MockTaxLedger::new();
    tax.expect_post_invoice().never();
    let service = ledger(tax);
    let invoice = service
        .create_manual(
            manual_invoice().with_emission_type(EmissionType::FeeExempt),
            None,
        )
        .await
        .expect("invoice created");

    let outcome = service
        .issue(IssueInvoiceRequest::new(invoice.id()))
        .await
        .expect("issue succeeds");

    assert!(outcome.tax.is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn receipt_requires_issued_invoice() {
    let mut tax = MockTaxLedger::new();
    tax.expect_post_invoice()
        .returning(|_, _| Ok(TaxPostingOutcome::Skipped));
    let service = ledger(tax);
    let invoice = service
        .create_manual(manual_invoice(), None)
        .await
        .expect("invoice created");

    let err = service
        .mark_received(invoice.id(), date(2024, 4, 1), None)
        .await
        .expect_err("provisioned invoice cannot be received");
    assert!(matches!(
        err,
        InvoiceLedgerError::Domain(BillingDomainError::InvalidInvoiceTransition {
            from: InvoiceStatus::Provisioned,
            to: InvoiceStatus::Received,
            ..
        })
    ));
    assert_eq!(err.kind(), ErrorKind::Conflict);

    service
        .issue(IssueInvoiceRequest::new(invoice.id()))
        .await
        .expect("issue succeeds");
    let received = service
        .mark_received(invoice.id(), date(2024, 4, 1), None)
        .await
        .expect("receipt succeeds");
    assert_eq!(received.status(), InvoiceStatus::Received);
    assert_eq!(received.received_on(), Some(date(2024, 4, 1)));

    let cancel = service
        .cancel(invoice.id(), None, None)
        .await
        .expect_err("received invoice cannot be canceled");
    assert_eq!(cancel.kind(), ErrorKind::Conflict);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cancel_records_reason_once() {
    let service = ledger(MockTaxLedger::new());
    let invoice = service
        .create_manual(manual_invoice(), None)
        .await
        .expect("invoice created");

    let canceled = service
        .cancel(invoice.id(), Some("  issued by mistake "), None)
        .await
        .expect("cancel succeeds");
    assert_eq!(canceled.status(), InvoiceStatus::Canceled);
    assert_eq!(canceled.cancel_reason(), Some("issued by mistake"));

    let err = service
        .cancel(invoice.id(), None, None)
        .await
        .expect_err("second cancel must fail");
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_invoice_is_not_found() {
    let service = ledger(MockTaxLedger::new());
    let missing = InvoiceId::new();

    let err = service
        .issue(IssueInvoiceRequest::new(missing))
        .await
        .expect_err("unknown invoice must fail");
    assert!(matches!(err, InvoiceLedgerError::NotFound(id) if id == missing));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_manual_invoice_is_not_stored() {
    let service = ledger(MockTaxLedger::new());
    let params = manual_invoice().with_due_date(date(2024, 3, 1));
    let company_id = params.company_id;

    let err = service
        .create_manual(params, None)
        .await
        .expect_err("due date before emission must fail");
    assert_eq!(err.kind(), ErrorKind::Validation);
    let listed = service
        .list_for_company(company_id)
        .await
        .expect("list succeeds");
    assert!(listed.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn history_records_each_status_change() {
    let mut tax = MockTaxLedger::new();
    tax.expect_post_invoice()
        .returning(|_, _| Ok(TaxPostingOutcome::Skipped));
    let service = ledger(tax);
    let actor = UserId::new();
    let invoice = service
        .create_manual(manual_invoice(), Some(actor))
        .await
        .expect("invoice created");
    service
        .issue(IssueInvoiceRequest::new(invoice.id()).by(actor))
        .await
        .expect("issue succeeds");

    let history = service.history(invoice.id()).await.expect("history readable");

    assert!(history.iter().any(|row| row.action() == InvoiceAction::Created));
    let status_change = history
        .iter()
        .find(|row| row.action() == InvoiceAction::Issued && row.field() == "status")
        .expect("status change recorded");
    assert_eq!(status_change.old_value(), Some(&json!("PROVISIONED")));
    assert_eq!(status_change.new_value(), Some(&json!("ISSUED")));
    assert_eq!(status_change.changed_by(), Some(actor));
    assert!(
        history
            .iter()
            .filter(|row| row.action() == InvoiceAction::Issued)
            .all(|row| row.field() != "version" && row.field() != "updated_at")
    );
}
