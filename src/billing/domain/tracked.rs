//! Association between timesheet invoices and the entries they bill.

use super::{InvoiceId, TimeEntryId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One time entry tracked by an invoice, with the exact amount it added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceTimeEntry {
    invoice_id: InvoiceId,
    time_entry_id: TimeEntryId,
    amount: Decimal,
    tracked_at: DateTime<Utc>,
}

impl InvoiceTimeEntry {
    /// Creates a tracking link.
    #[must_use]
    pub fn new(
        invoice_id: InvoiceId,
        time_entry_id: TimeEntryId,
        amount: Decimal,
        clock: &impl Clock,
    ) -> Self {
        Self {
            invoice_id,
            time_entry_id,
            amount,
            tracked_at: clock.utc(),
        }
    }

    /// Returns the tracking invoice.
    #[must_use]
    pub const fn invoice_id(&self) -> InvoiceId {
        self.invoice_id
    }

    /// Returns the tracked entry.
    #[must_use]
    pub const fn time_entry_id(&self) -> TimeEntryId {
        self.time_entry_id
    }

    /// Returns the amount the entry contributed.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns when the entry was tracked.
    #[must_use]
    pub const fn tracked_at(&self) -> DateTime<Utc> {
        self.tracked_at
    }
}
