//! Outbound port through which finalized invoices reach the tax sub-ledger.

use crate::billing::domain::Invoice;
use crate::payable::domain::AccountPayableId;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::Arc;
use thiserror::Error;

/// What a posting request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxPostingOutcome {
    /// The contribution was zero or negative; nothing was posted.
    Skipped,
    /// The invoice had already been posted; nothing changed.
    AlreadyPosted,
    /// The contribution was added to an obligation record.
    Posted {
        /// Obligation that received the contribution.
        account_payable_id: AccountPayableId,
        /// Contributed amount.
        amount: Decimal,
    },
}

/// Failure reported by a tax posting implementation.
#[derive(Debug, Clone, Error)]
#[error("tax posting failed: {0}")]
pub struct TaxPostingError(pub Arc<dyn std::error::Error + Send + Sync>);

impl TaxPostingError {
    /// Wraps an underlying error.
    pub fn new(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self(Arc::new(err))
    }
}

/// Posts a finalized invoice's statutory contribution.
#[async_trait]
pub trait TaxPosting: Send + Sync {
    /// Posts the contribution of `invoice` for the competency month of
    /// `effective_date`.
    ///
    /// # Errors
    ///
    /// Returns [`TaxPostingError`] when the sub-ledger rejects the posting.
    async fn post_invoice(
        &self,
        invoice: &Invoice,
        effective_date: NaiveDate,
    ) -> Result<TaxPostingOutcome, TaxPostingError>;
}
