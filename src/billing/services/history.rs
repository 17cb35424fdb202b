//! History row construction shared by billing services.

use crate::audit::diff_fields;
use crate::billing::domain::{Invoice, InvoiceAction, InvoiceHistory, InvoiceId};
use crate::directory::domain::UserId;
use mockable::Clock;

/// Builds history rows for an invoice mutation.
///
/// A snapshot that cannot be serialized yields no rows; the failure is
/// logged and the mutation proceeds.
pub(super) fn invoice_history(
    invoice_id: InvoiceId,
    before: Option<&Invoice>,
    after: Option<&Invoice>,
    action: InvoiceAction,
    changed_by: Option<UserId>,
    clock: &impl Clock,
) -> Vec<InvoiceHistory> {
    match diff_fields(before, after) {
        Ok(changes) => InvoiceHistory::from_changes(invoice_id, action, changes, changed_by, clock),
        Err(err) => {
            tracing::warn!(
                invoice_id = %invoice_id,
                action = %action,
                error = %err,
                "invoice history diff failed"
            );
            Vec::new()
        }
    }
}
