//! History row construction shared by payable services.

use crate::audit::diff_fields;
use crate::directory::domain::UserId;
use crate::payable::domain::{AccountPayable, AccountPayableAction, AccountPayableHistory};
use mockable::Clock;

/// Builds history rows for an obligation mutation.
///
/// A snapshot that cannot be serialized yields no rows; the failure is
/// logged and the mutation proceeds.
pub(super) fn payable_history(
    before: Option<&AccountPayable>,
    after: &AccountPayable,
    action: AccountPayableAction,
    changed_by: Option<UserId>,
    clock: &impl Clock,
) -> Vec<AccountPayableHistory> {
    match diff_fields(before, Some(after)) {
        Ok(changes) => {
            AccountPayableHistory::from_changes(after.id(), action, changes, changed_by, clock)
        }
        Err(err) => {
            tracing::warn!(
                account_payable_id = %after.id(),
                action = %action,
                error = %err,
                "account payable history diff failed"
            );
            Vec::new()
        }
    }
}
