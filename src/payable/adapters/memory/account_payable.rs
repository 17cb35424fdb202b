//! In-memory repository for obligations.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::billing::domain::InvoiceId;
use crate::directory::domain::CompanyId;
use crate::payable::{
    domain::{
        AccountPayable, AccountPayableHistory, AccountPayableId, InvoiceAccountPayable,
        SupplierId,
    },
    ports::{
        AccountPayableRepository, AccountPayableRepositoryError, AccountPayableRepositoryResult,
        AccountPayableWrite, PayableCommit,
    },
};

/// Thread-safe in-memory obligation repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAccountPayableRepository {
    state: Arc<RwLock<PayableState>>,
}

#[derive(Debug, Default)]
struct PayableState {
    payables: HashMap<AccountPayableId, AccountPayable>,
    creation_order: Vec<AccountPayableId>,
    links: HashMap<InvoiceId, InvoiceAccountPayable>,
    history: Vec<AccountPayableHistory>,
}

impl InMemoryAccountPayableRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> AccountPayableRepositoryError {
    AccountPayableRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

impl PayableState {
    fn ordered(&self) -> impl Iterator<Item = &AccountPayable> {
        self.creation_order
            .iter()
            .filter_map(|id| self.payables.get(id))
    }

    fn open_with_key(
        &self,
        company_id: CompanyId,
        supplier_id: SupplierId,
        description: &str,
    ) -> Option<&AccountPayable> {
        self.ordered().find(|payable| {
            payable.status().is_open()
                && payable.company_id() == company_id
                && payable.supplier_id() == supplier_id
                && payable.description() == description
        })
    }

    fn check(&self, commit: &PayableCommit) -> AccountPayableRepositoryResult<()> {
        let target = commit.write.account_payable();
        match &commit.write {
            AccountPayableWrite::Create(payable) => {
                if self.payables.contains_key(&payable.id()) {
                    return Err(AccountPayableRepositoryError::DuplicatePayable(payable.id()));
                }
                if let Some(existing) =
                    self.open_with_key(payable.company_id(), payable.supplier_id(), payable.description())
                {
                    return Err(AccountPayableRepositoryError::DuplicateOpenObligation(
                        existing.id(),
                    ));
                }
            }
            AccountPayableWrite::Update {
                account_payable,
                expected_version,
            } => {
                let found = self
                    .payables
                    .get(&account_payable.id())
                    .map(AccountPayable::version)
                    .ok_or(AccountPayableRepositoryError::NotFound(account_payable.id()))?;
                if found != *expected_version {
                    return Err(AccountPayableRepositoryError::VersionConflict {
                        account_payable_id: account_payable.id(),
                        expected: *expected_version,
                        found,
                    });
                }
            }
        }

        match &commit.link {
            Some(link) if link.account_payable_id() != target.id() => {
                Err(AccountPayableRepositoryError::persistence(std::io::Error::other(format!(
                    "link for account payable {} committed with account payable {}",
                    link.account_payable_id(),
                    target.id()
                ))))
            }
            Some(link) => match self.links.get(&link.invoice_id()) {
                Some(existing) => Err(AccountPayableRepositoryError::InvoiceAlreadyPosted {
                    invoice_id: link.invoice_id(),
                    account_payable_id: existing.account_payable_id(),
                }),
                None => Ok(()),
            },
            None => Ok(()),
        }
    }

    fn apply(&mut self, commit: PayableCommit) {
        match commit.write {
            AccountPayableWrite::Create(payable) => {
                self.creation_order.push(payable.id());
                self.payables.insert(payable.id(), payable);
            }
            AccountPayableWrite::Update {
                account_payable, ..
            } => {
                self.payables.insert(account_payable.id(), account_payable);
            }
        }
        if let Some(link) = commit.link {
            self.links.insert(link.invoice_id(), link);
        }
        self.history.extend(commit.history);
    }
}

#[async_trait]
impl AccountPayableRepository for InMemoryAccountPayableRepository {
    async fn commit(&self, commit: PayableCommit) -> AccountPayableRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.check(&commit)?;
        state.apply(commit);
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: AccountPayableId,
    ) -> AccountPayableRepositoryResult<Option<AccountPayable>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.payables.get(&id).cloned())
    }

    async fn find_open(
        &self,
        company_id: CompanyId,
        supplier_id: SupplierId,
        description: &str,
    ) -> AccountPayableRepositoryResult<Option<AccountPayable>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .open_with_key(company_id, supplier_id, description)
            .cloned())
    }

    async fn link_for_invoice(
        &self,
        invoice_id: InvoiceId,
    ) -> AccountPayableRepositoryResult<Option<InvoiceAccountPayable>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.links.get(&invoice_id).cloned())
    }

    async fn links_for(
        &self,
        account_payable_id: AccountPayableId,
    ) -> AccountPayableRepositoryResult<Vec<InvoiceAccountPayable>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut links: Vec<InvoiceAccountPayable> = state
            .links
            .values()
            .filter(|link| link.account_payable_id() == account_payable_id)
            .cloned()
            .collect();
        links.sort_by_key(InvoiceAccountPayable::created_at);
        Ok(links)
    }

    async fn list_for_company(
        &self,
        company_id: CompanyId,
    ) -> AccountPayableRepositoryResult<Vec<AccountPayable>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .ordered()
            .filter(|payable| payable.company_id() == company_id)
            .cloned()
            .collect())
    }

    async fn list_open(&self) -> AccountPayableRepositoryResult<Vec<AccountPayable>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .ordered()
            .filter(|payable| payable.status().is_open())
            .cloned()
            .collect())
    }

    async fn history(
        &self,
        account_payable_id: AccountPayableId,
    ) -> AccountPayableRepositoryResult<Vec<AccountPayableHistory>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .history
            .iter()
            .filter(|row| row.account_payable_id() == account_payable_id)
            .cloned()
            .collect())
    }
}
