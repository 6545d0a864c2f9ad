//! The privileged-context run loop.

use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{debug, info, trace};

use replymesh_channel::WorkerEndpoint;
use replymesh_protocols::PageRequest;

use crate::gateway::Gateway;

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;

/// How often the worker pings itself to stay resident.
pub const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(20);

/// Drains the worker endpoint, strictly one request at a time, and ticks
/// the keepalive in between. The keepalive is pure liveness — it runs the
/// ping through the normal dispatch path but nothing leaves the worker.
pub struct Worker {
    gateway: Gateway,
    endpoint: WorkerEndpoint,
}

impl Worker {
    pub fn new(gateway: Gateway, endpoint: WorkerEndpoint) -> Self {
        Self { gateway, endpoint }
    }

    /// Run until every page endpoint is gone.
    pub async fn run(mut self) {
        let mut keepalive = tokio::time::interval(KEEPALIVE_INTERVAL);
        keepalive.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick of an interval fires immediately; swallow it so
        // the keepalive really starts one interval from now.
        keepalive.tick().await;

        info!("Worker started");
        loop {
            tokio::select! {
                incoming = self.endpoint.recv() => {
                    let Some(incoming) = incoming else {
                        break;
                    };
                    debug!(id = %incoming.id, kind = incoming.request.kind(), "Handling request");
                    let response = self.gateway.dispatch(incoming.request).await;
                    incoming.responder.respond(response);
                }
                _ = keepalive.tick() => {
                    let _ = self.gateway.dispatch(PageRequest::Ping).await;
                    trace!("Keepalive self-ping");
                }
            }
        }
        info!("Worker stopped: all page endpoints closed");
    }
}
