//! Invoice aggregate, its status machine and the draft aggregation bucket.

use super::{BillingDomainError, InvoiceId, ParseInvoiceStatusError};
use crate::directory::domain::{ClientId, CompanyId};
use crate::proposal::domain::ProposalId;
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    /// Draft, still accepting value.
    Provisioned,
    /// Finalized and billed to the client.
    Issued,
    /// Payment received.
    Received,
    /// Voided.
    Canceled,
}

impl InvoiceStatus {
    /// Every status.
    pub const ALL: [Self; 4] = [
        Self::Provisioned,
        Self::Issued,
        Self::Received,
        Self::Canceled,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Provisioned => "PROVISIONED",
            Self::Issued => "ISSUED",
            Self::Received => "RECEIVED",
            Self::Canceled => "CANCELED",
        }
    }

    /// Returns whether a transition to `target` is allowed.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Provisioned, Self::Issued | Self::Canceled)
                | (Self::Issued, Self::Received | Self::Canceled)
        )
    }

    /// Returns whether the invoice still counts as open.
    #[must_use]
    pub const fn is_open(self) -> bool {
        !matches!(self, Self::Canceled)
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for InvoiceStatus {
    type Error = ParseInvoiceStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| ParseInvoiceStatusError(value.to_owned()))
    }
}

/// Where an invoice's value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceOrigin {
    /// Negotiated milestone or fee.
    Negotiation,
    /// Aggregated approved time entries.
    Timesheet,
    /// Entered by hand.
    Manual,
}

/// Tax treatment of an invoice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmissionType {
    /// Regular invoice; finalization posts the statutory tax.
    #[default]
    Standard,
    /// Exempt from the statutory tax.
    FeeExempt,
}

/// Aggregation key for draft timesheet invoices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvoiceBucket {
    /// Billing company.
    pub company_id: CompanyId,
    /// Billed client.
    pub client_id: ClientId,
    /// Proposal the time was logged against, if any.
    pub proposal_id: Option<ProposalId>,
}

/// Parameter object for a hand-entered invoice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInvoice {
    /// Billing company.
    pub company_id: CompanyId,
    /// Billed client.
    pub client_id: ClientId,
    /// Related proposal.
    pub proposal_id: Option<ProposalId>,
    /// Total value.
    pub gross_value: Decimal,
    /// Emission date.
    pub emission_date: NaiveDate,
    /// Due date.
    pub due_date: NaiveDate,
    /// Tax treatment.
    pub emission_type: EmissionType,
    /// Origin; timesheet origin is refused.
    pub origin: InvoiceOrigin,
    /// Free-text description.
    pub description: Option<String>,
}

impl NewInvoice {
    /// Creates a standard manual invoice due on its emission date.
    #[must_use]
    pub const fn new(
        company_id: CompanyId,
        client_id: ClientId,
        gross_value: Decimal,
        emission_date: NaiveDate,
    ) -> Self {
        Self {
            company_id,
            client_id,
            proposal_id: None,
            gross_value,
            emission_date,
            due_date: emission_date,
            emission_type: EmissionType::Standard,
            origin: InvoiceOrigin::Manual,
            description: None,
        }
    }

    /// Links a proposal.
    #[must_use]
    pub const fn with_proposal(mut self, proposal_id: ProposalId) -> Self {
        self.proposal_id = Some(proposal_id);
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = due_date;
        self
    }

    /// Sets the tax treatment.
    #[must_use]
    pub const fn with_emission_type(mut self, emission_type: EmissionType) -> Self {
        self.emission_type = emission_type;
        self
    }

    /// Sets the origin.
    #[must_use]
    pub const fn with_origin(mut self, origin: InvoiceOrigin) -> Self {
        self.origin = origin;
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Invoice aggregate root.
///
/// `version` increments on every mutation and backs the optimistic
/// concurrency check performed by the invoice store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    id: InvoiceId,
    company_id: CompanyId,
    client_id: ClientId,
    proposal_id: Option<ProposalId>,
    status: InvoiceStatus,
    origin: InvoiceOrigin,
    emission_type: EmissionType,
    gross_value: Decimal,
    emission_date: NaiveDate,
    due_date: NaiveDate,
    billed_on: Option<NaiveDate>,
    received_on: Option<NaiveDate>,
    description: Option<String>,
    cancel_reason: Option<String>,
    version: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Invoice {
    /// Creates a hand-entered provisioned invoice.
    ///
    /// # Errors
    ///
    /// Returns [`BillingDomainError::NegativeAmount`] for a negative value,
    /// [`BillingDomainError::DueBeforeEmission`] when the due date precedes
    /// the emission date, or [`BillingDomainError::ManualTimesheetInvoice`]
    /// for timesheet origin.
    pub fn new(params: NewInvoice, clock: &impl Clock) -> Result<Self, BillingDomainError> {
        if params.origin == InvoiceOrigin::Timesheet {
            return Err(BillingDomainError::ManualTimesheetInvoice);
        }
        if params.gross_value < Decimal::ZERO {
            return Err(BillingDomainError::NegativeAmount(params.gross_value));
        }
        if params.due_date < params.emission_date {
            return Err(BillingDomainError::DueBeforeEmission {
                emission: params.emission_date,
                due: params.due_date,
            });
        }
        let timestamp = clock.utc();
        Ok(Self {
            id: InvoiceId::new(),
            company_id: params.company_id,
            client_id: params.client_id,
            proposal_id: params.proposal_id,
            status: InvoiceStatus::Provisioned,
            origin: params.origin,
            emission_type: params.emission_type,
            gross_value: params.gross_value,
            emission_date: params.emission_date,
            due_date: params.due_date,
            billed_on: None,
            received_on: None,
            description: params.description,
            cancel_reason: None,
            version: 0,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Opens a draft timesheet invoice for a bucket with its first value.
    ///
    /// # Errors
    ///
    /// Returns [`BillingDomainError::NegativeAmount`] for a negative amount.
    pub fn open_timesheet(
        bucket: InvoiceBucket,
        amount: Decimal,
        dated: NaiveDate,
        clock: &impl Clock,
    ) -> Result<Self, BillingDomainError> {
        if amount < Decimal::ZERO {
            return Err(BillingDomainError::NegativeAmount(amount));
        }
        let timestamp = clock.utc();
        Ok(Self {
            id: InvoiceId::new(),
            company_id: bucket.company_id,
            client_id: bucket.client_id,
            proposal_id: bucket.proposal_id,
            status: InvoiceStatus::Provisioned,
            origin: InvoiceOrigin::Timesheet,
            emission_type: EmissionType::Standard,
            gross_value: amount,
            emission_date: dated,
            due_date: dated,
            billed_on: None,
            received_on: None,
            description: None,
            cancel_reason: None,
            version: 0,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Returns the invoice identifier.
    #[must_use]
    pub const fn id(&self) -> InvoiceId {
        self.id
    }

    /// Returns the billing company.
    #[must_use]
    pub const fn company_id(&self) -> CompanyId {
        self.company_id
    }

    /// Returns the billed client.
    #[must_use]
    pub const fn client_id(&self) -> ClientId {
        self.client_id
    }

    /// Returns the related proposal, if any.
    #[must_use]
    pub const fn proposal_id(&self) -> Option<ProposalId> {
        self.proposal_id
    }

    /// Returns the aggregation bucket this invoice belongs to.
    #[must_use]
    pub const fn bucket(&self) -> InvoiceBucket {
        InvoiceBucket {
            company_id: self.company_id,
            client_id: self.client_id,
            proposal_id: self.proposal_id,
        }
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> InvoiceStatus {
        self.status
    }

    /// Returns the origin.
    #[must_use]
    pub const fn origin(&self) -> InvoiceOrigin {
        self.origin
    }

    /// Returns the tax treatment.
    #[must_use]
    pub const fn emission_type(&self) -> EmissionType {
        self.emission_type
    }

    /// Returns the total value.
    #[must_use]
    pub const fn gross_value(&self) -> Decimal {
        self.gross_value
    }

    /// Returns the emission date.
    #[must_use]
    pub const fn emission_date(&self) -> NaiveDate {
        self.emission_date
    }

    /// Returns the due date.
    #[must_use]
    pub const fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    /// Returns the billing date, once issued.
    #[must_use]
    pub const fn billed_on(&self) -> Option<NaiveDate> {
        self.billed_on
    }

    /// Returns the payment date, once received.
    #[must_use]
    pub const fn received_on(&self) -> Option<NaiveDate> {
        self.received_on
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the cancel reason, once canceled.
    #[must_use]
    pub fn cancel_reason(&self) -> Option<&str> {
        self.cancel_reason.as_deref()
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

    /// Returns whether this is a draft timesheet invoice.
    #[must_use]
    pub fn is_timesheet_draft(&self) -> bool {
        self.status == InvoiceStatus::Provisioned && self.origin == InvoiceOrigin::Timesheet
    }

    /// Returns whether finalizing this invoice posts the statutory tax.
    #[must_use]
    pub fn posts_tax(&self) -> bool {
        self.emission_type != EmissionType::FeeExempt
    }

    /// Returns whether a draft with `remaining_entries` tracked entries can
    /// be deleted.
    #[must_use]
    pub fn is_disposable(&self, remaining_entries: usize) -> bool {
        remaining_entries == 0
            && self.gross_value.is_zero()
            && self.status == InvoiceStatus::Provisioned
    }

    /// Adds an approved entry's value to a draft timesheet invoice.
    ///
    /// Emission and due dates move to `reference_date` when it is earlier.
    ///
    /// # Errors
    ///
    /// Returns [`BillingDomainError::NotAccruable`] unless the invoice is a
    /// provisioned timesheet draft, or
    /// [`BillingDomainError::NegativeAmount`] for a negative amount.
    pub fn accrue(
        &mut self,
        amount: Decimal,
        reference_date: Option<NaiveDate>,
        clock: &impl Clock,
    ) -> Result<(), BillingDomainError> {
        if !self.is_timesheet_draft() {
            return Err(BillingDomainError::NotAccruable(self.id));
        }
        if amount < Decimal::ZERO {
            return Err(BillingDomainError::NegativeAmount(amount));
        }
        self.gross_value += amount;
        if let Some(date) = reference_date {
            self.emission_date = self.emission_date.min(date);
            self.due_date = self.due_date.min(date);
        }
        self.touch(clock);
        Ok(())
    }

    /// Removes a released entry's value, never going below zero.
    ///
    /// # Errors
    ///
    /// Returns [`BillingDomainError::NotAccruable`] unless the invoice is a
    /// provisioned timesheet draft.
    pub fn release(&mut self, amount: Decimal, clock: &impl Clock) -> Result<(), BillingDomainError> {
        if !self.is_timesheet_draft() {
            return Err(BillingDomainError::NotAccruable(self.id));
        }
        self.gross_value = (self.gross_value - amount).max(Decimal::ZERO);
        self.touch(clock);
        Ok(())
    }

    /// Finalizes the invoice on the given billing date.
    ///
    /// # Errors
    ///
    /// Returns [`BillingDomainError::InvalidInvoiceTransition`] unless the
    /// invoice is provisioned.
    pub fn issue(&mut self, billed_on: NaiveDate, clock: &impl Clock) -> Result<(), BillingDomainError> {
        self.move_to(InvoiceStatus::Issued)?;
        self.billed_on = Some(billed_on);
        self.touch(clock);
        Ok(())
    }

    /// Records payment of an issued invoice.
    ///
    /// # Errors
    ///
    /// Returns [`BillingDomainError::InvalidInvoiceTransition`] unless the
    /// invoice is issued.
    pub fn mark_received(
        &mut self,
        received_on: NaiveDate,
        clock: &impl Clock,
    ) -> Result<(), BillingDomainError> {
        self.move_to(InvoiceStatus::Received)?;
        self.received_on = Some(received_on);
        self.touch(clock);
        Ok(())
    }

    /// Voids a provisioned or issued invoice.
    ///
    /// # Errors
    ///
    /// Returns [`BillingDomainError::InvalidInvoiceTransition`] for received
    /// or already canceled invoices.
    pub fn cancel(
        &mut self,
        reason: Option<&str>,
        clock: &impl Clock,
    ) -> Result<(), BillingDomainError> {
        self.move_to(InvoiceStatus::Canceled)?;
        self.cancel_reason = reason
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(ToOwned::to_owned);
        self.touch(clock);
        Ok(())
    }

    fn move_to(&mut self, target: InvoiceStatus) -> Result<(), BillingDomainError> {
        if !self.status.can_transition_to(target) {
            return Err(BillingDomainError::InvalidInvoiceTransition {
                invoice_id: self.id,
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
