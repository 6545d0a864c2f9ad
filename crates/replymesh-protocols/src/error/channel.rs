//! Request channel errors.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChannelError {
    /// The receiving end was unreachable; the request never arrived.
    #[error("Message not delivered: receiving end unreachable")]
    NotDelivered,

    /// The request was delivered but the responder went away before
    /// answering.
    #[error("Channel disconnected before a response arrived")]
    Disconnected,
}
