//! In-memory billing adapters.

mod invoice;
mod time_entry;

pub use invoice::InMemoryInvoiceRepository;
pub use time_entry::InMemoryTimeEntryRepository;
