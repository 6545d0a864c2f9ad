//! Wire messages exchanged between the page context and the worker.
//!
//! Every request carries a `type` discriminator; responses mirror the shape
//! the page-side UI consumes. Settings travel as raw JSON documents so this
//! crate stays schema-agnostic — the worker is the one that validates them
//! against the preferences schema.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::UsageSnapshot;

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;

/// Request sent from the page context to the worker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PageRequest {
    /// Generate a reply to the given post.
    GenerateReply {
        post_text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        author_name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        post_date: Option<String>,
    },
    /// Fetch the current preferences document.
    GetSettings,
    /// Validate and persist a full preferences document.
    SaveSettings { settings: Value },
    /// Fetch the current usage snapshot.
    GetUsage,
    /// Reset the usage counter and start a fresh window.
    ResetUsage,
    /// Liveness no-op. Never originated by page callers.
    Ping,
}

impl PageRequest {
    /// Discriminator string as it appears on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            PageRequest::GenerateReply { .. } => "GENERATE_REPLY",
            PageRequest::GetSettings => "GET_SETTINGS",
            PageRequest::SaveSettings { .. } => "SAVE_SETTINGS",
            PageRequest::GetUsage => "GET_USAGE",
            PageRequest::ResetUsage => "RESET_USAGE",
            PageRequest::Ping => "PING",
        }
    }
}

/// Response returned to the page context.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PageResponse {
    /// Outcome of a `GenerateReply` request.
    Reply {
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reply: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        usage_count: Option<u32>,
        #[serde(default)]
        rate_limit_reached: bool,
    },
    /// Current preferences document.
    Settings { settings: Value },
    /// Current usage snapshot.
    Usage { usage: UsageSnapshot },
    /// Generic acknowledgement for requests with no payload to return.
    Ack,
    /// Failure of a settings or usage request.
    Failure { error: String },
    /// Liveness answer to [`PageRequest::Ping`].
    Pong,
}

impl PageResponse {
    /// Successful reply payload.
    pub fn reply_ok(reply: impl Into<String>, usage_count: u32) -> Self {
        PageResponse::Reply {
            success: true,
            reply: Some(reply.into()),
            error: None,
            usage_count: Some(usage_count),
            rate_limit_reached: false,
        }
    }

    /// Failed reply payload.
    pub fn reply_err(error: impl Into<String>, rate_limit_reached: bool) -> Self {
        PageResponse::Reply {
            success: false,
            reply: None,
            error: Some(error.into()),
            usage_count: None,
            rate_limit_reached,
        }
    }
}
