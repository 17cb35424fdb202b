//! Payable orchestration services.

mod history;
mod maintenance;
mod subledger;
mod sweep;

pub use maintenance::{AccountsPayableError, AccountsPayableResult, AccountsPayableService};
pub use subledger::{TaxSubledgerError, TaxSubledgerResult, TaxSubledgerService};
pub use sweep::{DueSoonSweep, SweepReport};
