//! Statutory obligation aggregate root.

use super::{
    AccountPayableId, AccountPayableStatus, Competency, ExpenseClassificationId,
    PayableDomainError, SupplierId,
};
use crate::directory::domain::CompanyId;
use chrono::{DateTime, Days, NaiveDate, Utc};
use mockable::Clock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Parameter object for opening an obligation record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccountPayable {
    /// Owning company.
    pub company_id: CompanyId,
    /// Creditor.
    pub supplier_id: SupplierId,
    /// Chart-of-accounts classification.
    pub classification_id: ExpenseClassificationId,
    /// Description identifying the obligation within its supplier.
    pub description: String,
    /// Month the obligation accrues to.
    pub competency: Competency,
    /// Payment due date.
    pub due_date: NaiveDate,
    /// Opening value.
    pub total_value: Decimal,
}

/// Effect of a due-date sweep on one obligation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Promotion {
    /// Status unchanged.
    Unchanged,
    /// Moved to [`AccountPayableStatus::DueSoon`].
    DueSoon,
    /// Moved to [`AccountPayableStatus::Overdue`].
    Overdue,
}

/// A statutory obligation that grows as invoices of its month are issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountPayable {
    id: AccountPayableId,
    company_id: CompanyId,
    supplier_id: SupplierId,
    classification_id: ExpenseClassificationId,
    description: String,
    competency: Competency,
    total_value: Decimal,
    due_date: NaiveDate,
    paid_on: Option<NaiveDate>,
    status: AccountPayableStatus,
    version: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AccountPayable {
    /// Opens a provisioned obligation.
    ///
    /// # Errors
    ///
    /// Returns [`PayableDomainError::EmptyName`] for a blank description or
    /// [`PayableDomainError::NegativeAmount`] for a negative value.
    pub fn new(params: NewAccountPayable, clock: &impl Clock) -> Result<Self, PayableDomainError> {
        let description = params.description.trim();
        if description.is_empty() {
            return Err(PayableDomainError::EmptyName("description"));
        }
        if params.total_value < Decimal::ZERO {
            return Err(PayableDomainError::NegativeAmount(params.total_value));
        }
        let timestamp = clock.utc();
        Ok(Self {
            id: AccountPayableId::new(),
            company_id: params.company_id,
            supplier_id: params.supplier_id,
            classification_id: params.classification_id,
            description: description.to_owned(),
            competency: params.competency,
            total_value: params.total_value,
            due_date: params.due_date,
            paid_on: None,
            status: AccountPayableStatus::Provisioned,
            version: 0,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Returns the obligation identifier.
    #[must_use]
    pub const fn id(&self) -> AccountPayableId {
        self.id
    }

    /// Returns the owning company.
    #[must_use]
    pub const fn company_id(&self) -> CompanyId {
        self.company_id
    }

    /// Returns the creditor.
    #[must_use]
    pub const fn supplier_id(&self) -> SupplierId {
        self.supplier_id
    }

    /// Returns the expense classification.
    #[must_use]
    pub const fn classification_id(&self) -> ExpenseClassificationId {
        self.classification_id
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the competency month.
    #[must_use]
    pub const fn competency(&self) -> Competency {
        self.competency
    }

    /// Returns the accumulated value.
    #[must_use]
    pub const fn total_value(&self) -> Decimal {
        self.total_value
    }

    /// Returns the due date.
    #[must_use]
    pub const fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    /// Returns the payment date, once paid.
    #[must_use]
    pub const fn paid_on(&self) -> Option<NaiveDate> {
        self.paid_on
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> AccountPayableStatus {
        self.status
    }

    /// Returns the optimistic concurrency version.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Adds a contribution to an open obligation.
    ///
    /// # Errors
    ///
    /// Returns [`PayableDomainError::NotAccruable`] for paid or canceled
    /// obligations, or [`PayableDomainError::NegativeAmount`] for a negative
    /// amount.
    pub fn accrue(&mut self, amount: Decimal, clock: &impl Clock) -> Result<(), PayableDomainError> {
        if !self.status.is_open() {
            return Err(PayableDomainError::NotAccruable(self.id));
        }
        if amount < Decimal::ZERO {
            return Err(PayableDomainError::NegativeAmount(amount));
        }
        self.total_value += amount;
        self.touch(clock);
        Ok(())
    }

    /// Promotes an open obligation by how close `today` is to its due date.
    ///
    /// Past-due obligations become overdue; provisioned obligations due
    /// within `window_days` become due soon.
    pub fn promote(&mut self, today: NaiveDate, window_days: u64, clock: &impl Clock) -> Promotion {
        if !self.status.is_open() {
            return Promotion::Unchanged;
        }
        if self.due_date < today {
            if self.status == AccountPayableStatus::Overdue {
                return Promotion::Unchanged;
            }
            self.status = AccountPayableStatus::Overdue;
            self.touch(clock);
            return Promotion::Overdue;
        }
        let within_window = today
            .checked_add_days(Days::new(window_days))
            .is_none_or(|limit| self.due_date <= limit);
        if self.status == AccountPayableStatus::Provisioned && within_window {
            self.status = AccountPayableStatus::DueSoon;
            self.touch(clock);
            return Promotion::DueSoon;
        }
        Promotion::Unchanged
    }

    /// Settles the obligation.
    ///
    /// # Errors
    ///
    /// Returns [`PayableDomainError::InvalidTransition`] for paid or
    /// canceled obligations.
    pub fn mark_paid(&mut self, paid_on: NaiveDate, clock: &impl Clock) -> Result<(), PayableDomainError> {
        self.move_to(AccountPayableStatus::Paid)?;
        self.paid_on = Some(paid_on);
        self.touch(clock);
        Ok(())
    }

    /// Voids the obligation as a whole.
    ///
    /// # Errors
    ///
    /// Returns [`PayableDomainError::InvalidTransition`] for paid or
    /// canceled obligations.
    pub fn cancel(&mut self, clock: &impl Clock) -> Result<(), PayableDomainError> {
        self.move_to(AccountPayableStatus::Canceled)?;
        self.touch(clock);
        Ok(())
    }

    fn move_to(&mut self, target: AccountPayableStatus) -> Result<(), PayableDomainError> {
        if !self.status.can_transition_to(target) {
            return Err(PayableDomainError::InvalidTransition {
                account_payable_id: self.id,
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        Ok(())
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.version += 1;
        self.updated_at = clock.utc();
    }
}
