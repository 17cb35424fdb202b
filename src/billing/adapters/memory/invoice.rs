//! In-memory repository for invoices.
//!
//! A single write lock covers invoices, tracking links and history, so each
//! [`InvoiceCommit`] is validated in full before any of it is applied.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::billing::{
    domain::{Invoice, InvoiceBucket, InvoiceHistory, InvoiceId, InvoiceTimeEntry, TimeEntryId},
    ports::{
        EntryLinkChange, InvoiceCommit, InvoiceRepository, InvoiceRepositoryError,
        InvoiceRepositoryResult, InvoiceWrite,
    },
};
use crate::directory::domain::CompanyId;

/// Thread-safe in-memory invoice repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryInvoiceRepository {
    state: Arc<RwLock<InvoiceState>>,
}

#[derive(Debug, Default)]
struct InvoiceState {
    invoices: HashMap<InvoiceId, Invoice>,
    creation_order: Vec<InvoiceId>,
    links: Vec<InvoiceTimeEntry>,
    history: Vec<InvoiceHistory>,
}

impl InMemoryInvoiceRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> InvoiceRepositoryError {
    InvoiceRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

impl InvoiceState {
    fn stored_version(&self, invoice_id: InvoiceId) -> InvoiceRepositoryResult<u64> {
        self.invoices
            .get(&invoice_id)
            .map(Invoice::version)
            .ok_or(InvoiceRepositoryError::NotFound(invoice_id))
    }

    fn check_version(&self, invoice_id: InvoiceId, expected: u64) -> InvoiceRepositoryResult<()> {
        let found = self.stored_version(invoice_id)?;
        if found != expected {
            return Err(InvoiceRepositoryError::VersionConflict {
                invoice_id,
                expected,
                found,
            });
        }
        Ok(())
    }

    fn open_link_for(&self, time_entry_id: TimeEntryId) -> Option<&InvoiceTimeEntry> {
        self.links.iter().find(|link| {
            link.time_entry_id() == time_entry_id
                && self
                    .invoices
                    .get(&link.invoice_id())
                    .is_some_and(|invoice| invoice.status().is_open())
        })
    }

    fn check(&self, commit: &InvoiceCommit) -> InvoiceRepositoryResult<()> {
        let invoice_id = commit.write.invoice_id();
        match &commit.write {
            InvoiceWrite::Create(invoice) => {
                if self.invoices.contains_key(&invoice_id) {
                    return Err(InvoiceRepositoryError::DuplicateInvoice(invoice_id));
                }
                let competing = invoice
                    .is_timesheet_draft()
                    .then(|| self.latest_draft(&invoice.bucket()))
                    .flatten();
                if let Some(existing) = competing {
                    return Err(InvoiceRepositoryError::DuplicateDraft(existing.id()));
                }
            }
            InvoiceWrite::Update {
                expected_version, ..
            }
            | InvoiceWrite::Delete {
                expected_version, ..
            } => self.check_version(invoice_id, *expected_version)?,
        }

        match &commit.link {
            None => Ok(()),
            Some(EntryLinkChange::Track(link)) => {
                if link.invoice_id() != invoice_id {
                    return Err(InvoiceRepositoryError::persistence(std::io::Error::other(
                        format!(
                            "link for invoice {} committed with invoice {invoice_id}",
                            link.invoice_id()
                        ),
                    )));
                }
                match self.open_link_for(link.time_entry_id()) {
                    Some(existing) => Err(InvoiceRepositoryError::EntryAlreadyTracked {
                        time_entry_id: link.time_entry_id(),
                        invoice_id: existing.invoice_id(),
                    }),
                    None => Ok(()),
                }
            }
            Some(EntryLinkChange::Untrack(time_entry_id)) => {
                let tracked = self.links.iter().any(|link| {
                    link.invoice_id() == invoice_id && link.time_entry_id() == *time_entry_id
                });
                if tracked {
                    Ok(())
                } else {
                    Err(InvoiceRepositoryError::EntryNotTracked {
                        time_entry_id: *time_entry_id,
                        invoice_id,
                    })
                }
            }
        }
    }

    fn apply(&mut self, commit: InvoiceCommit) {
        let invoice_id = commit.write.invoice_id();
        match commit.write {
            InvoiceWrite::Create(invoice) => {
                self.creation_order.push(invoice_id);
                self.invoices.insert(invoice_id, invoice);
            }
            InvoiceWrite::Update { invoice, .. } => {
                self.invoices.insert(invoice_id, invoice);
            }
            InvoiceWrite::Delete { .. } => {
                self.invoices.remove(&invoice_id);
                self.creation_order.retain(|id| *id != invoice_id);
                self.links.retain(|link| link.invoice_id() != invoice_id);
            }
        }
        match commit.link {
            None => {}
            Some(EntryLinkChange::Track(link)) => self.links.push(link),
            Some(EntryLinkChange::Untrack(time_entry_id)) => self.links.retain(|link| {
                !(link.invoice_id() == invoice_id && link.time_entry_id() == time_entry_id)
            }),
        }
        self.history.extend(commit.history);
    }

    fn latest_draft(&self, bucket: &InvoiceBucket) -> Option<&Invoice> {
        self.creation_order
            .iter()
            .rev()
            .filter_map(|id| self.invoices.get(id))
            .find(|invoice| invoice.is_timesheet_draft() && invoice.bucket() == *bucket)
    }
}

#[async_trait]
impl InvoiceRepository for InMemoryInvoiceRepository {
    async fn commit(&self, commit: InvoiceCommit) -> InvoiceRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.check(&commit)?;
        state.apply(commit);
        Ok(())
    }

    async fn find_by_id(&self, id: InvoiceId) -> InvoiceRepositoryResult<Option<Invoice>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.invoices.get(&id).cloned())
    }

    async fn find_draft(&self, bucket: &InvoiceBucket) -> InvoiceRepositoryResult<Option<Invoice>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.latest_draft(bucket).cloned())
    }

    async fn find_open_by_time_entry(
        &self,
        time_entry_id: TimeEntryId,
    ) -> InvoiceRepositoryResult<Option<(Invoice, InvoiceTimeEntry)>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.open_link_for(time_entry_id).and_then(|link| {
            state
                .invoices
                .get(&link.invoice_id())
                .map(|invoice| (invoice.clone(), link.clone()))
        }))
    }

    async fn tracked_entries(
        &self,
        invoice_id: InvoiceId,
    ) -> InvoiceRepositoryResult<Vec<InvoiceTimeEntry>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .links
            .iter()
            .filter(|link| link.invoice_id() == invoice_id)
            .cloned()
            .collect())
    }

    async fn list_for_company(
        &self,
        company_id: CompanyId,
    ) -> InvoiceRepositoryResult<Vec<Invoice>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .creation_order
            .iter()
            .filter_map(|id| state.invoices.get(id))
            .filter(|invoice| invoice.company_id() == company_id)
            .cloned()
            .collect())
    }

    async fn history(&self, invoice_id: InvoiceId) -> InvoiceRepositoryResult<Vec<InvoiceHistory>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .history
            .iter()
            .filter(|row| row.invoice_id() == invoice_id)
            .cloned()
            .collect())
    }
}
