//! # ReplyMesh Channel
//!
//! One-shot, correlated request/response between the page context and the
//! privileged worker. The two sides share no memory; a request travels as
//! an envelope over an mpsc queue and the response comes back over a
//! oneshot reserved for exactly that request.
//!
//! Delivery failures are distinguishable, never silent:
//!
//! - the worker is gone before the request is queued → [`ChannelError::NotDelivered`]
//! - the worker picked the request up but dropped it unanswered →
//!   [`ChannelError::Disconnected`]
//!
//! The channel imposes no round-trip timeout; a caller that wants one
//! wraps its await.
//!
//! [`ChannelError::NotDelivered`]: replymesh_protocols::error::ChannelError::NotDelivered
//! [`ChannelError::Disconnected`]: replymesh_protocols::error::ChannelError::Disconnected

mod channel;

pub use channel::{Incoming, PageEndpoint, Responder, WorkerEndpoint, channel};
