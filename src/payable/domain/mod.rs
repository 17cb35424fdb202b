//! Domain model for statutory obligations and their catalog entities.

mod account_payable;
mod catalog;
mod competency;
mod error;
mod history;
mod ids;
mod link;
mod status;
mod tax_rule;

pub use account_payable::{AccountPayable, NewAccountPayable, Promotion};
pub use catalog::{ExpenseClassification, Supplier};
pub use competency::Competency;
pub use error::{ParseAccountPayableStatusError, PayableDomainError};
pub use history::{AccountPayableAction, AccountPayableHistory};
pub use ids::{AccountPayableHistoryId, AccountPayableId, ExpenseClassificationId, SupplierId};
pub use link::InvoiceAccountPayable;
pub use status::AccountPayableStatus;
pub use tax_rule::TaxRule;
