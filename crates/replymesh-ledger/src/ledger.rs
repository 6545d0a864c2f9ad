//! The usage ledger: quota reads and consumes over a non-transactional
//! store.
//!
//! Every operation takes the ledger mutex for its whole read-modify-write.
//! The store itself only offers whole-record load/save, so the mutex is
//! what keeps two near-simultaneous consumes from both observing the same
//! count.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info};

use replymesh_protocols::error::LedgerError;

use crate::record::UsageRecord;
use crate::store::LedgerStore;

#[cfg(test)]
#[path = "ledger_tests.rs"]
mod tests;

/// Outcome of a consume attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumeOutcome {
    /// A unit was consumed; the updated record is returned.
    Granted(UsageRecord),
    /// The limit is already reached for this window.
    Denied { retry_after: std::time::Duration },
}

/// Single owner of the persisted usage record.
pub struct UsageLedger {
    store: Arc<dyn LedgerStore>,
    guard: Mutex<()>,
    default_limit: u32,
}

impl UsageLedger {
    /// Create a ledger over a store. `default_limit` seeds the record the
    /// first time the ledger is ever touched; after that the stored limit
    /// is authoritative.
    pub fn new(store: Arc<dyn LedgerStore>, default_limit: u32) -> Self {
        Self {
            store,
            guard: Mutex::new(()),
            default_limit,
        }
    }

    /// Current record, rolling the window forward first if it expired.
    pub async fn read(&self) -> Result<UsageRecord, LedgerError> {
        self.read_at(Utc::now()).await
    }

    pub async fn read_at(&self, now: DateTime<Utc>) -> Result<UsageRecord, LedgerError> {
        let _guard = self.guard.lock().await;
        self.current(now).await
    }

    /// Consume one unit, or report denial with the time left in the
    /// window.
    pub async fn try_consume(&self) -> Result<ConsumeOutcome, LedgerError> {
        self.try_consume_at(Utc::now()).await
    }

    pub async fn try_consume_at(
        &self,
        now: DateTime<Utc>,
    ) -> Result<ConsumeOutcome, LedgerError> {
        let _guard = self.guard.lock().await;
        let record = self.current(now).await?;

        if record.count >= record.limit {
            debug!(
                count = record.count,
                limit = record.limit,
                "Usage limit reached"
            );
            return Ok(ConsumeOutcome::Denied {
                retry_after: record.remaining_window(now),
            });
        }

        let updated = UsageRecord {
            count: record.count + 1,
            ..record
        };
        self.store.save(&updated).await?;
        Ok(ConsumeOutcome::Granted(updated))
    }

    /// Zero the counter and start a fresh window, regardless of expiry.
    pub async fn reset(&self) -> Result<UsageRecord, LedgerError> {
        self.reset_at(Utc::now()).await
    }

    pub async fn reset_at(&self, now: DateTime<Utc>) -> Result<UsageRecord, LedgerError> {
        let _guard = self.guard.lock().await;
        let limit = match self.store.load().await? {
            Some(record) => record.limit,
            None => self.default_limit,
        };
        let fresh = UsageRecord::fresh(limit, now);
        self.store.save(&fresh).await?;
        info!(limit, "Usage counter reset");
        Ok(fresh)
    }

    /// Change the limit in force. Count and window are untouched.
    pub async fn set_limit(&self, limit: u32) -> Result<UsageRecord, LedgerError> {
        self.set_limit_at(limit, Utc::now()).await
    }

    pub async fn set_limit_at(
        &self,
        limit: u32,
        now: DateTime<Utc>,
    ) -> Result<UsageRecord, LedgerError> {
        let _guard = self.guard.lock().await;
        let updated = match self.store.load().await? {
            Some(record) => UsageRecord { limit, ..record },
            None => UsageRecord::fresh(limit, now),
        };
        self.store.save(&updated).await?;
        Ok(updated)
    }

    /// Load-or-create with lazy window rollover. Callers must hold the
    /// guard.
    async fn current(&self, now: DateTime<Utc>) -> Result<UsageRecord, LedgerError> {
        match self.store.load().await? {
            Some(record) if !record.is_expired(now) => Ok(record),
            Some(record) => {
                let rolled = UsageRecord::fresh(record.limit, now);
                self.store.save(&rolled).await?;
                debug!(limit = rolled.limit, "Usage window rolled over");
                Ok(rolled)
            }
            None => {
                let fresh = UsageRecord::fresh(self.default_limit, now);
                self.store.save(&fresh).await?;
                debug!(limit = fresh.limit, "Usage record created");
                Ok(fresh)
            }
        }
    }
}
