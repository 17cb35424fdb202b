//! Obligation status enumeration.

use super::ParseAccountPayableStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of an obligation record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountPayableStatus {
    /// Accruing, due date not yet near.
    Provisioned,
    /// Due date within the warning window.
    DueSoon,
    /// Due date has passed.
    Overdue,
    /// Settled.
    Paid,
    /// Voided.
    Canceled,
}

impl AccountPayableStatus {
    /// Every status.
    pub const ALL: [Self; 5] = [
        Self::Provisioned,
        Self::DueSoon,
        Self::Overdue,
        Self::Paid,
        Self::Canceled,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Provisioned => "PROVISIONED",
            Self::DueSoon => "DUE_SOON",
            Self::Overdue => "OVERDUE",
            Self::Paid => "PAID",
            Self::Canceled => "CANCELED",
        }
    }

    /// Returns whether the obligation still accepts contributions.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Provisioned | Self::DueSoon | Self::Overdue)
    }

    /// Returns whether a transition to `target` is allowed.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        match self {
            Self::Provisioned => !matches!(target, Self::Provisioned),
            Self::DueSoon => matches!(target, Self::Overdue | Self::Paid | Self::Canceled),
            Self::Overdue => matches!(target, Self::Paid | Self::Canceled),
            Self::Paid | Self::Canceled => false,
        }
    }
}

impl fmt::Display for AccountPayableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for AccountPayableStatus {
    type Error = ParseAccountPayableStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| ParseAccountPayableStatusError(value.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::AccountPayableStatus;
    use rstest::rstest;

    #[rstest]
    #[case(AccountPayableStatus::Provisioned, AccountPayableStatus::DueSoon, true)]
    #[case(AccountPayableStatus::Provisioned, AccountPayableStatus::Overdue, true)]
    #[case(AccountPayableStatus::DueSoon, AccountPayableStatus::Provisioned, false)]
    #[case(AccountPayableStatus::Overdue, AccountPayableStatus::DueSoon, false)]
    #[case(AccountPayableStatus::Overdue, AccountPayableStatus::Paid, true)]
    #[case(AccountPayableStatus::Paid, AccountPayableStatus::Canceled, false)]
    #[case(AccountPayableStatus::Canceled, AccountPayableStatus::Paid, false)]
    fn transitions_follow_the_payment_lifecycle(
        #[case] from: AccountPayableStatus,
        #[case] to: AccountPayableStatus,
        #[case] allowed: bool,
    ) {
        assert_eq!(from.can_transition_to(to), allowed);
    }

    #[rstest]
    #[case("due_soon", AccountPayableStatus::DueSoon)]
    #[case(" OVERDUE ", AccountPayableStatus::Overdue)]
    fn parses_case_insensitively(#[case] raw: &str, #[case] expected: AccountPayableStatus) {
        assert_eq!(AccountPayableStatus::try_from(raw), Ok(expected));
    }
}
