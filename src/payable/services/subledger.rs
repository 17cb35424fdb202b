//! Derives statutory obligations from issued invoices.

use super::history::payable_history;
use crate::billing::{
    domain::Invoice,
    ports::{TaxPosting, TaxPostingError, TaxPostingOutcome},
};
use crate::error::ErrorKind;
use crate::payable::{
    domain::{
        AccountPayable, AccountPayableAction, Competency, ExpenseClassification,
        InvoiceAccountPayable, NewAccountPayable, PayableDomainError, Supplier, TaxRule,
    },
    ports::{
        AccountPayableRepository, AccountPayableRepositoryError, AccountPayableWrite,
        ExpenseCatalog, ExpenseCatalogError, PayableCommit,
    },
};
use async_trait::async_trait;
use chrono::NaiveDate;
use mockable::Clock;
use rust_decimal::Decimal;
use std::sync::Arc;
use thiserror::Error;

/// Attempts made before a posting gives up on contention.
const MAX_COMMIT_ATTEMPTS: usize = 5;

/// Service-level errors for tax posting.
#[derive(Debug, Error)]
pub enum TaxSubledgerError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] PayableDomainError),
    /// Concurrent postings kept moving the obligation.
    #[error("obligation for competency {0} kept changing concurrently")]
    Contention(Competency),
    /// Obligation persistence failed.
    #[error(transparent)]
    Payables(#[from] AccountPayableRepositoryError),
    /// Catalog lookup failed.
    #[error(transparent)]
    Catalog(#[from] ExpenseCatalogError),
}

impl TaxSubledgerError {
    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) => err.kind(),
            Self::Contention(_) => ErrorKind::Conflict,
            Self::Payables(_) | Self::Catalog(_) => ErrorKind::Internal,
        }
    }
}

/// Result type for tax posting operations.
pub type TaxSubledgerResult<T> = Result<T, TaxSubledgerError>;

/// Posts issued invoices into monthly statutory obligations.
#[derive(Clone)]
pub struct TaxSubledgerService<A, X, C>
where
    A: AccountPayableRepository,
    X: ExpenseCatalog,
    C: Clock + Send + Sync,
{
    payables: Arc<A>,
    catalog: Arc<X>,
    rule: TaxRule,
    clock: Arc<C>,
}

impl<A, X, C> TaxSubledgerService<A, X, C>
where
    A: AccountPayableRepository,
    X: ExpenseCatalog,
    C: Clock + Send + Sync,
{
    /// Creates a new sub-ledger service.
    #[must_use]
    pub const fn new(payables: Arc<A>, catalog: Arc<X>, rule: TaxRule, clock: Arc<C>) -> Self {
        Self {
            payables,
            catalog,
            rule,
            clock,
        }
    }

    /// Returns the rule applied to postings.
    #[must_use]
    pub const fn rule(&self) -> &TaxRule {
        &self.rule
    }

    /// Posts an invoice's contribution to its competency month.
    ///
    /// Posting is idempotent per invoice: the contribution link is written
    /// in the same atomic commit as the obligation, and an invoice that
    /// already has one returns [`TaxPostingOutcome::AlreadyPosted`].
    ///
    /// # Errors
    ///
    /// Returns [`TaxSubledgerError`] when the due date cannot be computed,
    /// the catalog or repository fails, or contention persists.
    pub async fn post(
        &self,
        invoice: &Invoice,
        effective_date: NaiveDate,
    ) -> TaxSubledgerResult<TaxPostingOutcome> {
        let contribution = self.rule.contribution(invoice.gross_value());
        if contribution <= Decimal::ZERO {
            tracing::debug!(invoice_id = %invoice.id(), "no statutory contribution to post");
            return Ok(TaxPostingOutcome::Skipped);
        }

        let competency = Competency::from_date(effective_date);
        let due_date = competency.due_date(self.rule.due_day)?;
        let company_id = invoice.company_id();
        let supplier = self
            .catalog
            .find_or_create_supplier(Supplier::new(
                company_id,
                self.rule.supplier_name.as_str(),
                &*self.clock,
            )?)
            .await?;
        let classification = self
            .catalog
            .find_or_create_classification(ExpenseClassification::new(
                company_id,
                self.rule.classification_name.as_str(),
                &*self.clock,
            )?)
            .await?;
        let description = self.rule.description(competency);

        for attempt in 1..=MAX_COMMIT_ATTEMPTS {
            if self.payables.link_for_invoice(invoice.id()).await?.is_some() {
                return Ok(TaxPostingOutcome::AlreadyPosted);
            }

            let open = self
                .payables
                .find_open(company_id, supplier.id(), &description)
                .await?;
            let (payable, write, history) = match open {
                Some(current) => {
                    let mut payable = current.clone();
                    payable.accrue(contribution, &*self.clock)?;
                    let write = AccountPayableWrite::Update {
                        account_payable: payable.clone(),
                        expected_version: current.version(),
                    };
                    let history = payable_history(
                        Some(&current),
                        &payable,
                        AccountPayableAction::Accrued,
                        None,
                        &*self.clock,
                    );
                    (payable, write, history)
                }
                None => {
                    let payable = AccountPayable::new(
                        NewAccountPayable {
                            company_id,
                            supplier_id: supplier.id(),
                            classification_id: classification.id(),
                            description: description.clone(),
                            competency,
                            due_date,
                            total_value: contribution,
                        },
                        &*self.clock,
                    )?;
                    let history = payable_history(
                        None,
                        &payable,
                        AccountPayableAction::Created,
                        None,
                        &*self.clock,
                    );
                    (
                        payable.clone(),
                        AccountPayableWrite::Create(payable),
                        history,
                    )
                }
            };

            let link =
                InvoiceAccountPayable::new(invoice.id(), payable.id(), contribution, &*self.clock);
            let commit = PayableCommit::new(write)
                .with_link(link)
                .with_history(history);
            match self.payables.commit(commit).await {
                Ok(()) => {
                    tracing::info!(
                        invoice_id = %invoice.id(),
                        account_payable_id = %payable.id(),
                        competency = %competency,
                        amount = %contribution,
                        total_value = %payable.total_value(),
                        "statutory contribution posted"
                    );
                    return Ok(TaxPostingOutcome::Posted {
                        account_payable_id: payable.id(),
                        amount: contribution,
                    });
                }
                Err(AccountPayableRepositoryError::InvoiceAlreadyPosted { .. }) => {
                    return Ok(TaxPostingOutcome::AlreadyPosted);
                }
                Err(err) if err.is_contention() => {
                    tracing::debug!(
                        invoice_id = %invoice.id(),
                        attempt,
                        error = %err,
                        "obligation changed concurrently, retrying posting"
                    );
                }
                Err(err) => return Err(err.into()),
            }
        }
        Err(TaxSubledgerError::Contention(competency))
    }
}

#[async_trait]
impl<A, X, C> TaxPosting for TaxSubledgerService<A, X, C>
where
    A: AccountPayableRepository,
    X: ExpenseCatalog,
    C: Clock + Send + Sync,
{
    async fn post_invoice(
        &self,
        invoice: &Invoice,
        effective_date: NaiveDate,
    ) -> Result<TaxPostingOutcome, TaxPostingError> {
        self.post(invoice, effective_date)
            .await
            .map_err(TaxPostingError::new)
    }
}
