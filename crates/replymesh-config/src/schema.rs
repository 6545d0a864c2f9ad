//! Preferences schema definition.

use serde::{Deserialize, Serialize};

use replymesh_protocols::error::ConfigError;
use replymesh_protocols::{ReplyAction, Tone};

/// Bounds for the reply length ceiling, in characters.
pub const MIN_REPLY_LENGTH: u32 = 100;
pub const MAX_REPLY_LENGTH: u32 = 1000;

/// Bounds for the daily reply limit.
pub const MIN_DAILY_LIMIT: u32 = 1;
pub const MAX_DAILY_LIMIT: u32 = 10_000;

/// User preferences. The single configuration surface of the system.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Preferences {
    /// API credential for the generative-text provider.
    #[serde(default)]
    pub credential: String,

    /// Writing tone applied to generated replies.
    #[serde(default)]
    pub tone: Tone,

    /// Maximum reply length in characters.
    #[serde(default = "default_max_length")]
    pub max_length: u32,

    /// What to do with an accepted reply.
    #[serde(default)]
    pub default_action: ReplyAction,

    /// Maximum replies per 24h usage window.
    #[serde(default = "default_daily_limit")]
    pub daily_limit: u32,

    /// Type replies character by character instead of setting the value at
    /// once.
    #[serde(default)]
    pub paced_insertion: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            credential: String::new(),
            tone: Tone::default(),
            max_length: default_max_length(),
            default_action: ReplyAction::default(),
            daily_limit: default_daily_limit(),
            paced_insertion: false,
        }
    }
}

fn default_max_length() -> u32 {
    500
}

fn default_daily_limit() -> u32 {
    50
}

impl Preferences {
    /// Whether a usable credential is configured.
    pub fn has_credential(&self) -> bool {
        !self.credential.trim().is_empty()
    }

    /// Build preferences from a raw JSON document, merging over defaults.
    ///
    /// Missing fields take their defaults; unknown fields are ignored. A
    /// document that is not an object, or whose fields have the wrong
    /// shape, is malformed.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        serde_json::from_value(value).map_err(|e| ConfigError::Malformed(e.to_string()))
    }
}
