//! Service layer for reading, settling and voiding obligations.

use super::history::payable_history;
use crate::directory::domain::{CompanyId, UserId};
use crate::error::ErrorKind;
use crate::payable::{
    domain::{
        AccountPayable, AccountPayableAction, AccountPayableHistory, AccountPayableId,
        InvoiceAccountPayable, PayableDomainError,
    },
    ports::{
        AccountPayableRepository, AccountPayableRepositoryError, AccountPayableWrite,
        PayableCommit,
    },
};
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for obligation maintenance.
#[derive(Debug, Error)]
pub enum AccountsPayableError {
    /// The status machine refused the change.
    #[error(transparent)]
    Domain(#[from] PayableDomainError),
    /// No obligation exists with the given identifier.
    #[error("account payable {0} not found")]
    NotFound(AccountPayableId),
    /// Obligation persistence failed.
    #[error(transparent)]
    Repository(#[from] AccountPayableRepositoryError),
}

impl AccountsPayableError {
    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) => err.kind(),
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Repository(AccountPayableRepositoryError::VersionConflict { .. }) => {
                ErrorKind::Conflict
            }
            Self::Repository(_) => ErrorKind::Internal,
        }
    }
}

/// Result type for obligation maintenance operations.
pub type AccountsPayableResult<T> = Result<T, AccountsPayableError>;

/// Obligation maintenance service.
#[derive(Clone)]
pub struct AccountsPayableService<A, C>
where
    A: AccountPayableRepository,
    C: Clock + Send + Sync,
{
    payables: Arc<A>,
    clock: Arc<C>,
}

impl<A, C> AccountsPayableService<A, C>
where
    A: AccountPayableRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new maintenance service.
    #[must_use]
    pub const fn new(payables: Arc<A>, clock: Arc<C>) -> Self {
        Self { payables, clock }
    }

    /// Lists a company's obligations without changing any status.
    ///
    /// # Errors
    ///
    /// Returns [`AccountsPayableError::Repository`] when the lookup fails.
    pub async fn list_for_company(
        &self,
        company_id: CompanyId,
    ) -> AccountsPayableResult<Vec<AccountPayable>> {
        Ok(self.payables.list_for_company(company_id).await?)
    }

    /// Retrieves an obligation by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AccountsPayableError::Repository`] when the lookup fails.
    pub async fn find_by_id(
        &self,
        id: AccountPayableId,
    ) -> AccountsPayableResult<Option<AccountPayable>> {
        Ok(self.payables.find_by_id(id).await?)
    }

    /// Lists the invoice contributions an obligation received.
    ///
    /// # Errors
    ///
    /// Returns [`AccountsPayableError::Repository`] when the lookup fails.
    pub async fn contributions(
        &self,
        id: AccountPayableId,
    ) -> AccountsPayableResult<Vec<InvoiceAccountPayable>> {
        Ok(self.payables.links_for(id).await?)
    }

    /// Returns an obligation's history in write order.
    ///
    /// # Errors
    ///
    /// Returns [`AccountsPayableError::Repository`] when the lookup fails.
    pub async fn history(
        &self,
        id: AccountPayableId,
    ) -> AccountsPayableResult<Vec<AccountPayableHistory>> {
        Ok(self.payables.history(id).await?)
    }

    /// Settles an open obligation.
    ///
    /// # Errors
    ///
    /// Returns [`AccountsPayableError::NotFound`] for an unknown obligation,
    /// [`PayableDomainError::InvalidTransition`] for paid or canceled ones,
    /// or persistence errors.
    pub async fn mark_paid(
        &self,
        id: AccountPayableId,
        paid_on: NaiveDate,
        actor: Option<UserId>,
    ) -> AccountsPayableResult<AccountPayable> {
        let payable = self
            .mutate(id, AccountPayableAction::Paid, actor, |payable, clock| {
                payable.mark_paid(paid_on, clock)
            })
            .await?;
        tracing::info!(account_payable_id = %id, paid_on = %paid_on, "account payable paid");
        Ok(payable)
    }

    /// Voids an unpaid obligation as a whole.
    ///
    /// # Errors
    ///
    /// Returns [`AccountsPayableError::NotFound`] for an unknown obligation,
    /// [`PayableDomainError::InvalidTransition`] for paid or canceled ones,
    /// or persistence errors.
    pub async fn cancel(
        &self,
        id: AccountPayableId,
        actor: Option<UserId>,
    ) -> AccountsPayableResult<AccountPayable> {
        let payable = self
            .mutate(id, AccountPayableAction::Canceled, actor, |payable, clock| {
                payable.cancel(clock)
            })
            .await?;
        tracing::info!(
            account_payable_id = %id,
            total_value = %payable.total_value(),
            "account payable canceled"
        );
        Ok(payable)
    }

    async fn mutate<F>(
        &self,
        id: AccountPayableId,
        action: AccountPayableAction,
        actor: Option<UserId>,
        change: F,
    ) -> AccountsPayableResult<AccountPayable>
    where
        F: FnOnce(&mut AccountPayable, &C) -> Result<(), PayableDomainError> + Send,
    {
        let current = self
            .payables
            .find_by_id(id)
            .await?
            .ok_or(AccountsPayableError::NotFound(id))?;
        let mut payable = current.clone();
        change(&mut payable, &*self.clock)?;
        let history = payable_history(Some(&current), &payable, action, actor, &*self.clock);
        let write = AccountPayableWrite::Update {
            account_payable: payable.clone(),
            expected_version: current.version(),
        };
        self.payables
            .commit(PayableCommit::new(write).with_history(history))
            .await?;
        Ok(payable)
    }
}
