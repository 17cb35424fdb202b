//! In-memory payable adapters.

mod account_payable;
mod catalog;

pub use account_payable::InMemoryAccountPayableRepository;
pub use catalog::InMemoryExpenseCatalog;
