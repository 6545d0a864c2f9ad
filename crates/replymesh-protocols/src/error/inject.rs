//! Injection engine errors.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InjectError {
    /// The referenced node is no longer part of the document.
    #[error("Node is gone: {0}")]
    NodeGone(String),

    /// The document's mutation stream closed; the engine cannot continue.
    #[error("Document closed")]
    DocumentClosed,

    /// The enclosing post had no usable text to reply to.
    #[error("No usable post text at this insertion point")]
    UnusableText,
}
