//! The continuous injection engine.
//!
//! Subscribes to the document's mutation broadcast and coalesces bursts
//! into one rescan per debounce window. Feed pages mutate constantly —
//! virtualized scrolling, live updates, lazy hydration — so reacting to
//! individual mutations would rescan hundreds of times a second.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tracing::{debug, info};

use crate::dom::{Mutation, PageDocument};
use crate::locator::LocatorProfile;
use crate::scan::scan;

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;

/// Quiet period that turns a burst of mutations into a single rescan.
pub const SCAN_DEBOUNCE: Duration = Duration::from_millis(300);

/// Watches one document and keeps its insertion points injected.
pub struct Engine {
    doc: Arc<PageDocument>,
    profile: LocatorProfile,
}

impl Engine {
    pub fn new(doc: Arc<PageDocument>, profile: LocatorProfile) -> Self {
        Self { doc, profile }
    }

    /// Scan once, then rescan after every debounced mutation burst, until
    /// the document closes.
    ///
    /// A scan's own marker writes land on the mutation stream too; they
    /// trigger at most one follow-up rescan, which finds every point
    /// marked and injects nothing, so the engine always settles.
    pub async fn run(self) {
        let mut mutations = self.doc.subscribe();

        let injected = scan(&self.doc, &self.profile);
        info!(injected, "Initial scan complete");

        'outer: loop {
            // Sleep until the document changes at all.
            match mutations.recv().await {
                Ok(Mutation::Closed) => break,
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "Mutation stream lagged");
                }
                Err(RecvError::Closed) => break,
            }

            // One debounce window per burst, then drain whatever else
            // queued up so it does not retrigger immediately.
            tokio::time::sleep(SCAN_DEBOUNCE).await;
            loop {
                match mutations.try_recv() {
                    Ok(Mutation::Closed) => break 'outer,
                    Ok(_) => {}
                    Err(TryRecvError::Lagged(_)) => {}
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Closed) => break 'outer,
                }
            }

            let injected = scan(&self.doc, &self.profile);
            if injected > 0 {
                debug!(injected, "Rescan injected controls");
            }
        }
        info!("Engine stopped: document closed");
    }
}
