//! Domain model for time entries, invoices and invoice history.

mod error;
mod history;
mod ids;
mod invoice;
mod resolver;
mod time_entry;
mod tracked;

pub use error::{BillingDomainError, ParseInvoiceStatusError, ParseTimeEntryStatusError};
pub use history::{InvoiceAction, InvoiceHistory};
pub use ids::{InvoiceHistoryId, InvoiceId, TimeEntryId};
pub use invoice::{EmissionType, Invoice, InvoiceBucket, InvoiceOrigin, InvoiceStatus, NewInvoice};
pub use resolver::IdentitySources;
pub use time_entry::{Approval, NewTimeEntry, Rejection, TimeEntry, TimeEntryStatus};
pub use tracked::InvoiceTimeEntry;
