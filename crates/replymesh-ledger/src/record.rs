//! The usage record.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use replymesh_protocols::UsageSnapshot;

/// Length of one usage window.
pub const USAGE_WINDOW_HOURS: i64 = 24;

/// The persisted quota state: how many replies were generated in the
/// current window, when the window rolls over, and the limit in force.
///
/// `count` may reach `limit` exactly; the limit trips on the next consume
/// attempt, not on the one that hits it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub count: u32,
    pub window_end: DateTime<Utc>,
    pub limit: u32,
}

impl UsageRecord {
    /// A zeroed record whose window ends 24h from `now`.
    pub fn fresh(limit: u32, now: DateTime<Utc>) -> Self {
        Self {
            count: 0,
            window_end: now + Duration::hours(USAGE_WINDOW_HOURS),
            limit,
        }
    }

    /// Whether the window has rolled over.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.window_end
    }

    /// Time left until the window rolls over; zero when already expired.
    pub fn remaining_window(&self, now: DateTime<Utc>) -> std::time::Duration {
        (self.window_end - now).to_std().unwrap_or_default()
    }

    /// Read-only view for the page side.
    pub fn snapshot(&self) -> UsageSnapshot {
        UsageSnapshot {
            count: self.count,
            limit: self.limit,
            window_end: self.window_end,
        }
    }
}
