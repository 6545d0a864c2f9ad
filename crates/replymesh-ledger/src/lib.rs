//! # ReplyMesh Ledger
//!
//! The persisted usage counter behind the daily reply quota: one record,
//! one rolling 24-hour window, one owner. Every read-modify-write runs
//! inside a single async mutex because the backing store has no native
//! transaction primitive and near-simultaneous requests would otherwise
//! interleave on the counter.

mod ledger;
mod record;
mod store;

pub use ledger::{ConsumeOutcome, UsageLedger};
pub use record::{USAGE_WINDOW_HOURS, UsageRecord};
pub use store::{FileLedgerStore, LedgerStore, MemoryLedgerStore};
