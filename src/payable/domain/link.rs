//! Lineage from an issued invoice to the obligation it fed.

use super::AccountPayableId;
use crate::billing::domain::InvoiceId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Records the exact amount an invoice contributed to an obligation.
///
/// At most one link exists per invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceAccountPayable {
    invoice_id: InvoiceId,
    account_payable_id: AccountPayableId,
    amount: Decimal,
    created_at: DateTime<Utc>,
}

impl InvoiceAccountPayable {
    /// Creates a contribution link.
    #[must_use]
    pub fn new(
        invoice_id: InvoiceId,
        account_payable_id: AccountPayableId,
        amount: Decimal,
        clock: &impl Clock,
    ) -> Self {
        Self {
            invoice_id,
            account_payable_id,
            amount,
            created_at: clock.utc(),
        }
    }

    /// Returns the contributing invoice.
    #[must_use]
    pub const fn invoice_id(&self) -> InvoiceId {
        self.invoice_id
    }

    /// Returns the receiving obligation.
    #[must_use]
    pub const fn account_payable_id(&self) -> AccountPayableId {
        self.account_payable_id
    }

    /// Returns the contributed amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns when the contribution was posted.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
