//! Append-only obligation history rows.

use super::{AccountPayableHistoryId, AccountPayableId};
use crate::audit::FieldChange;
use crate::directory::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Mutating action recorded in obligation history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountPayableAction {
    /// Obligation opened.
    Created,
    /// Contribution added.
    Accrued,
    /// Status promoted by the due-date sweep.
    Promoted,
    /// Obligation settled.
    Paid,
    /// Obligation voided.
    Canceled,
}

impl AccountPayableAction {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::Accrued => "ACCRUED",
            Self::Promoted => "PROMOTED",
            Self::Paid => "PAID",
            Self::Canceled => "CANCELED",
        }
    }
}

impl fmt::Display for AccountPayableAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One changed field of one obligation mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountPayableHistory {
    id: AccountPayableHistoryId,
    account_payable_id: AccountPayableId,
    action: AccountPayableAction,
    field: String,
    old_value: Option<Value>,
    new_value: Option<Value>,
    changed_by: Option<UserId>,
    changed_at: DateTime<Utc>,
}

impl AccountPayableHistory {
    /// Builds one row per field change, all sharing the same timestamp.
    #[must_use]
    pub fn from_changes(
        account_payable_id: AccountPayableId,
        action: AccountPayableAction,
        changes: Vec<FieldChange>,
        changed_by: Option<UserId>,
        clock: &impl Clock,
    ) -> Vec<Self> {
        let changed_at = clock.utc();
        changes
            .into_iter()
            .map(|change| Self {
                id: AccountPayableHistoryId::new(),
                account_payable_id,
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
    pub const fn id(&self) -> AccountPayableHistoryId {
        self.id
    }

    /// Returns the obligation the row describes.
    #[must_use]
    pub const fn account_payable_id(&self) -> AccountPayableId {
        self.account_payable_id
    }

    /// Returns the recorded action.
    #[must_use]
    pub const fn action(&self) -> AccountPayableAction {
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
