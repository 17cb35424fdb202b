//! Port contracts for billing persistence and tax posting.

pub mod invoice;
pub mod tax;
pub mod time_entry;

pub use invoice::{
    EntryLinkChange, InvoiceCommit, InvoiceRepository, InvoiceRepositoryError,
    InvoiceRepositoryResult, InvoiceWrite,
};
pub use tax::{TaxPosting, TaxPostingError, TaxPostingOutcome};
pub use time_entry::{TimeEntryRepository, TimeEntryRepositoryError, TimeEntryRepositoryResult};
