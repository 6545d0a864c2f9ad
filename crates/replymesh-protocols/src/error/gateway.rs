//! Gateway errors.
//!
//! Each variant corresponds to one of the hard gates a generation request
//! passes through in the worker. Input and configuration failures happen
//! before the ledger is touched; rate limiting happens before the provider
//! is called; provider failures happen after a usage unit was consumed.

use std::time::Duration;

use thiserror::Error;

use super::{ConfigError, LedgerError, ProviderError};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum GatewayError {
    #[error("Post text is empty")]
    EmptyInput,

    #[error("Post text is too short ({len} chars, minimum {min})")]
    InputTooShort { len: usize, min: usize },

    #[error("Post text is too long ({len} chars, maximum {max})")]
    InputTooLong { len: usize, max: usize },

    #[error("No API credential configured")]
    MissingCredential,

    #[error("Daily reply limit reached")]
    RateLimited { retry_after: Duration },

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl GatewayError {
    /// Whether this failure is the quota trip (so the UI can render the
    /// dedicated rate-limit message).
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, GatewayError::RateLimited { .. })
    }
}
