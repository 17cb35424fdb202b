//! Port contracts for obligation persistence and the expense catalog.

pub mod catalog;
pub mod repository;

pub use catalog::{ExpenseCatalog, ExpenseCatalogError, ExpenseCatalogResult};
pub use repository::{
    AccountPayableRepository, AccountPayableRepositoryError, AccountPayableRepositoryResult,
    AccountPayableWrite, PayableCommit,
};
