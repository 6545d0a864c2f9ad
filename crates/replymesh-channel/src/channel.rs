//! Channel endpoints and envelopes.

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};
use uuid::Uuid;

use replymesh_protocols::error::ChannelError;
use replymesh_protocols::{PageRequest, PageResponse};

#[cfg(test)]
#[path = "channel_tests.rs"]
mod tests;

/// Build a connected endpoint pair.
///
/// `capacity` bounds the number of requests queued ahead of the worker;
/// senders wait for a slot rather than failing when the queue is full.
pub fn channel(capacity: usize) -> (PageEndpoint, WorkerEndpoint) {
    let (tx, rx) = mpsc::channel(capacity);
    (PageEndpoint { tx }, WorkerEndpoint { rx })
}

struct Envelope {
    id: Uuid,
    request: PageRequest,
    reply_tx: oneshot::Sender<PageResponse>,
}

/// Page-side sender. Cheap to clone; every control shares one.
#[derive(Clone)]
pub struct PageEndpoint {
    tx: mpsc::Sender<Envelope>,
}

impl PageEndpoint {
    /// Send a request and wait for its correlated response.
    pub async fn request(&self, request: PageRequest) -> Result<PageResponse, ChannelError> {
        let id = Uuid::new_v4();
        let (reply_tx, reply_rx) = oneshot::channel();

        debug!(%id, kind = request.kind(), "Sending request");
        self.tx
            .send(Envelope {
                id,
                request,
                reply_tx,
            })
            .await
            .map_err(|_| ChannelError::NotDelivered)?;

        let response = reply_rx.await.map_err(|_| ChannelError::Disconnected)?;
        debug!(%id, "Response received");
        Ok(response)
    }
}

/// Worker-side receiver.
pub struct WorkerEndpoint {
    rx: mpsc::Receiver<Envelope>,
}

impl WorkerEndpoint {
    /// Next incoming request, or `None` once every page endpoint is gone.
    pub async fn recv(&mut self) -> Option<Incoming> {
        self.rx.recv().await.map(|envelope| Incoming {
            id: envelope.id,
            request: envelope.request,
            responder: Responder {
                id: envelope.id,
                reply_tx: envelope.reply_tx,
            },
        })
    }
}

/// A received request plus the one-shot slot for its answer.
pub struct Incoming {
    pub id: Uuid,
    pub request: PageRequest,
    pub responder: Responder,
}

/// Answer slot for one request. Consumed on use; dropping it unanswered
/// surfaces as [`ChannelError::Disconnected`] on the page side.
pub struct Responder {
    id: Uuid,
    reply_tx: oneshot::Sender<PageResponse>,
}

impl Responder {
    /// Deliver the response. If the caller stopped waiting the response is
    /// dropped; that is not an error the worker can act on.
    pub fn respond(self, response: PageResponse) {
        if self.reply_tx.send(response).is_err() {
            warn!(id = %self.id, "Caller went away before the response arrived");
        }
    }
}
