//! Periodic promotion of obligations as their due dates approach.

use super::history::payable_history;
use crate::payable::{
    domain::{AccountPayableAction, Promotion},
    ports::{
        AccountPayableRepository, AccountPayableRepositoryError, AccountPayableWrite,
        PayableCommit,
    },
};
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Counts of obligations promoted by one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Obligations moved to due soon.
    pub due_soon: usize,
    /// Obligations moved to overdue.
    pub overdue: usize,
    /// Obligations skipped because they changed during the sweep.
    pub skipped: usize,
}

/// Explicit job promoting open obligations by due date.
///
/// Reads never change obligation status; only this job does.
pub struct DueSoonSweep<A, C>
where
    A: AccountPayableRepository,
    C: Clock + Send + Sync,
{
    payables: Arc<A>,
    window_days: u64,
    clock: Arc<C>,
}

impl<A, C> Clone for DueSoonSweep<A, C>
where
    A: AccountPayableRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            payables: Arc::clone(&self.payables),
            window_days: self.window_days,
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<A, C> DueSoonSweep<A, C>
where
    A: AccountPayableRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a sweep flagging obligations due within `window_days`.
    #[must_use]
    pub const fn new(payables: Arc<A>, window_days: u64, clock: Arc<C>) -> Self {
        Self {
            payables,
            window_days,
            clock,
        }
    }

    /// Promotes every open obligation once, as of `today`.
    ///
    /// An obligation changed concurrently is skipped and picked up by the
    /// next run.
    ///
    /// # Errors
    ///
    /// Returns [`AccountPayableRepositoryError`] when listing or writing
    /// fails for a reason other than a version conflict.
    pub async fn run_once(
        &self,
        today: NaiveDate,
    ) -> Result<SweepReport, AccountPayableRepositoryError> {
        let mut report = SweepReport::default();
        for current in self.payables.list_open().await? {
            let mut payable = current.clone();
            let promotion = payable.promote(today, self.window_days, &*self.clock);
            if promotion == Promotion::Unchanged {
                continue;
            }
            let history = payable_history(
                Some(&current),
                &payable,
                AccountPayableAction::Promoted,
                None,
                &*self.clock,
            );
            let write = AccountPayableWrite::Update {
                account_payable: payable,
                expected_version: current.version(),
            };
            match self
                .payables
                .commit(PayableCommit::new(write).with_history(history))
                .await
            {
                Ok(()) => match promotion {
                    Promotion::DueSoon => report.due_soon += 1,
                    Promotion::Overdue => report.overdue += 1,
                    Promotion::Unchanged => {}
                },
                Err(err) if err.is_contention() => {
                    tracing::debug!(
                        account_payable_id = %current.id(),
                        error = %err,
                        "account payable changed during sweep, skipping"
                    );
                    report.skipped += 1;
                }
                Err(err) => return Err(err),
            }
        }
        tracing::info!(
            today = %today,
            due_soon = report.due_soon,
            overdue = report.overdue,
            skipped = report.skipped,
            "payable sweep finished"
        );
        Ok(report)
    }

    /// Runs the sweep on a fixed interval until the handle is aborted.
    ///
    /// The first run happens immediately. Failed runs are logged and retried
    /// on the next tick. Intervals shorter than one second are raised to one
    /// second.
    #[must_use]
    pub fn spawn(self, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            tracing::info!(
                interval_secs = interval.as_secs(),
                window_days = self.window_days,
                "payable sweep started"
            );
            let mut ticker = tokio::time::interval(interval.max(MIN_INTERVAL));
            loop {
                ticker.tick().await;
                let today = self.clock.utc().date_naive();
                if let Err(err) = self.run_once(today).await {
                    tracing::error!(error = %err, "payable sweep failed");
                }
            }
        })
    }
}
