//! Append-only invoice history rows.

use super::{InvoiceHistoryId, InvoiceId};
use crate::audit::FieldChange;
use crate::directory::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Mutating action recorded in invoice history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceAction {
    /// Invoice created.
    Created,
    /// Approved time added to a draft.
    Accrued,
    /// Rejected time removed from a draft.
    Released,
    /// Invoice finalized.
    Issued,
    /// Payment recorded.
    Received,
    /// Invoice voided.
    Canceled,
    /// Empty draft removed.
    Deleted,
}

impl InvoiceAction {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::Accrued => "ACCRUED",
            Self::Released => "RELEASED",
            Self::Issued => "ISSUED",
            Self::Received => "RECEIVED",
            Self::Canceled => "CANCELED",
            Self::Deleted => "DELETED",
        }
    }
}

impl fmt::Display for InvoiceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One changed field of one invoice mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceHistory {
    id: InvoiceHistoryId,
    invoice_id: InvoiceId,
    action: InvoiceAction,
    field: String,
    old_value: Option<Value>,
    new_value: Option<Value>,
    changed_by: Option<UserId>,
    changed_at: DateTime<Utc>,
}

impl InvoiceHistory {
    /// Builds one row per field change, all sharing the same timestamp.
    #[must_use]
    pub fn from_changes(
        invoice_id: InvoiceId,
        action: InvoiceAction,
        changes: Vec<FieldChange>,
        changed_by: Option<UserId>,
        clock: &impl Clock,
    ) -> Vec<Self> {
        let changed_at = clock.utc();
        changes
            .into_iter()
            .map(|change| Self {
                id: InvoiceHistoryId::new(),
                invoice_id,
                action,
                field: change.field,
                old_value: change.old_value,
                new_value: change.new_value,
                changed_by,
                changed_at,
            })
            .collect()
    }

    /// Returns the row identifier.
    #[must_use]
    pub const fn id(&self) -> InvoiceHistoryId {
        self.id
    }

    /// Returns the invoice the row describes.
    #[must_use]
    pub const fn invoice_id(&self) -> InvoiceId {
        self.invoice_id
    }

    /// Returns the recorded action.
    #[must_use]
    pub const fn action(&self) -> InvoiceAction {
        self.action
    }

    /// Returns the changed field name.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Returns the previous value.
    #[must_use]
    pub const fn old_value(&self) -> Option<&Value> {
        self.old_value.as_ref()
    }

    /// Returns the new value.
    #[must_use]
    pub const fn new_value(&self) -> Option<&Value> {
        self.new_value.as_ref()
    }

    /// Returns the acting user, if known.
    #[must_use]
    pub const fn changed_by(&self) -> Option<UserId> {
        self.changed_by
    }

    /// Returns when the change happened.
    #[must_use]
    pub const fn changed_at(&self) -> DateTime<Utc> {
        self.changed_at
    }
}
