//! Generative-text provider errors.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider rate limited: {0}")]
    RateLimited(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Provider returned no candidates")]
    EmptyCandidates,

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Network error: {0}")]
    Network(String),
}

impl ProviderError {
    /// Map a non-2xx API response onto the taxonomy, keeping the provider
    /// message verbatim so the UI can surface it.
    pub fn from_api_response(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => ProviderError::AuthenticationFailed(message),
            429 => ProviderError::RateLimited(message),
            400 => ProviderError::InvalidRequest(message),
            _ => ProviderError::ApiError { status, message },
        }
    }
}
