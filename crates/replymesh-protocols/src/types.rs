//! Core value types shared across the workspace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;

/// Writing tone applied to generated replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Professional,
    Polite,
    Friendly,
    Concise,
}

impl Tone {
    /// All supported tones, in display order.
    pub const ALL: [Tone; 4] = [
        Tone::Professional,
        Tone::Polite,
        Tone::Friendly,
        Tone::Concise,
    ];

    /// Stable lowercase name used on the wire and in the CLI.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Professional => "professional",
            Tone::Polite => "polite",
            Tone::Friendly => "friendly",
            Tone::Concise => "concise",
        }
    }
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "professional" => Ok(Tone::Professional),
            "polite" => Ok(Tone::Polite),
            "friendly" => Ok(Tone::Friendly),
            "concise" => Ok(Tone::Concise),
            other => Err(format!("unknown tone: {}", other)),
        }
    }
}

/// What to do with an accepted reply by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReplyAction {
    #[default]
    Insert,
    Copy,
}

impl std::fmt::Display for ReplyAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReplyAction::Insert => f.write_str("insert"),
            ReplyAction::Copy => f.write_str("copy"),
        }
    }
}

impl std::str::FromStr for ReplyAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "insert" => Ok(ReplyAction::Insert),
            "copy" => Ok(ReplyAction::Copy),
            other => Err(format!("unknown reply action: {}", other)),
        }
    }
}

/// Read-only view of the usage ledger returned to the page side.
///
/// The worker owns the underlying record; the page only ever sees this
/// snapshot inside a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    /// Replies generated inside the current window.
    pub count: u32,
    /// Maximum replies per window.
    pub limit: u32,
    /// When the current window rolls over.
    pub window_end: DateTime<Utc>,
}

impl UsageSnapshot {
    /// Remaining replies before the limit trips.
    pub fn remaining(&self) -> u32 {
        self.limit.saturating_sub(self.count)
    }
}
