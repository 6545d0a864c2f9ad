//! Request handling: the gates every generation request passes through,
//! and the settings/usage operations the worker answers.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use replymesh_config::{Preferences, SettingsService};
use replymesh_ledger::{ConsumeOutcome, UsageLedger};
use replymesh_protocols::error::{ConfigError, GatewayError};
use replymesh_protocols::{PageRequest, PageResponse, UsageSnapshot};

use crate::generator::{GenerateRequest, Generator};
use crate::sanitize::{MAX_SOURCE_CHARS, MIN_SOURCE_CHARS, sanitize_source_text};

#[cfg(test)]
#[path = "gateway_tests.rs"]
mod tests;

/// A generation request as it arrives from the page side.
#[derive(Debug, Clone, Default)]
pub struct GenerateInput {
    pub post_text: String,
    pub author_name: Option<String>,
    pub post_date: Option<String>,
}

/// A successful generation.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedReply {
    pub text: String,
    /// Usage count as of the consume that paid for this reply — not
    /// re-read afterwards.
    pub usage_count: u32,
}

/// Human-readable time until the quota window rolls over.
pub fn format_retry_after(retry_after: Duration) -> String {
    let secs = retry_after.as_secs();
    if secs == 0 {
        return "now".to_string();
    }
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes.max(1))
    }
}

/// The privileged-context request handler.
///
/// Holds no request state: preferences and the usage record are reloaded
/// from their stores on every call.
#[derive(Clone)]
pub struct Gateway {
    settings: SettingsService,
    ledger: Arc<UsageLedger>,
    generator: Arc<dyn Generator>,
}

impl Gateway {
    pub fn new(
        settings: SettingsService,
        ledger: Arc<UsageLedger>,
        generator: Arc<dyn Generator>,
    ) -> Self {
        Self {
            settings,
            ledger,
            generator,
        }
    }

    /// Run a generation request through its gates, in order. Each gate is
    /// hard: input shape, configured credential, quota, provider call.
    ///
    /// The quota unit consumed at gate three is not refunded if the
    /// provider call afterwards fails.
    pub async fn handle_generate(
        &self,
        input: GenerateInput,
    ) -> Result<GeneratedReply, GatewayError> {
        let trimmed = input.post_text.trim();
        if trimmed.is_empty() {
            return Err(GatewayError::EmptyInput);
        }
        let len = trimmed.chars().count();
        if len < MIN_SOURCE_CHARS {
            return Err(GatewayError::InputTooShort {
                len,
                min: MIN_SOURCE_CHARS,
            });
        }
        if len > MAX_SOURCE_CHARS {
            return Err(GatewayError::InputTooLong {
                len,
                max: MAX_SOURCE_CHARS,
            });
        }

        let prefs = self.settings.load_or_default().await?;
        if !prefs.has_credential() {
            return Err(GatewayError::MissingCredential);
        }

        let record = match self.ledger.try_consume().await? {
            ConsumeOutcome::Granted(record) => record,
            ConsumeOutcome::Denied { retry_after } => {
                debug!("Generation denied: quota exhausted");
                return Err(GatewayError::RateLimited { retry_after });
            }
        };

        let request = GenerateRequest {
            text: sanitize_source_text(trimmed),
            tone: prefs.tone,
            max_length: prefs.max_length,
            author_name: input.author_name,
            post_date: input.post_date,
        };
        let text = self
            .generator
            .generate(&prefs.credential, &request)
            .await?;

        info!(usage_count = record.count, "Reply generated");
        Ok(GeneratedReply {
            text,
            usage_count: record.count,
        })
    }

    pub async fn get_settings(&self) -> Result<Preferences, GatewayError> {
        Ok(self.settings.load_or_default().await?)
    }

    /// Validate and persist a settings document. A changed daily limit is
    /// pushed into the ledger and restarts the usage window.
    pub async fn save_settings(
        &self,
        value: serde_json::Value,
    ) -> Result<Preferences, GatewayError> {
        let previous = self.settings.load_or_default().await?;
        let saved = self.settings.save_value(value).await?;

        if saved.daily_limit != previous.daily_limit {
            self.ledger.set_limit(saved.daily_limit).await?;
            self.ledger.reset().await?;
            info!(limit = saved.daily_limit, "Daily limit changed, counter reset");
        }
        Ok(saved)
    }

    pub async fn usage(&self) -> Result<UsageSnapshot, GatewayError> {
        Ok(self.ledger.read().await?.snapshot())
    }

    pub async fn reset_usage(&self) -> Result<UsageSnapshot, GatewayError> {
        Ok(self.ledger.reset().await?.snapshot())
    }

    /// Answer one wire request. Failures are folded into the response
    /// shape; this function never errors.
    pub async fn dispatch(&self, request: PageRequest) -> PageResponse {
        match request {
            PageRequest::GenerateReply {
                post_text,
                author_name,
                post_date,
            } => {
                let input = GenerateInput {
                    post_text,
                    author_name,
                    post_date,
                };
                match self.handle_generate(input).await {
                    Ok(reply) => PageResponse::reply_ok(reply.text, reply.usage_count),
                    Err(err) => {
                        warn!(%err, "Generation failed");
                        PageResponse::reply_err(user_message(&err), err.is_rate_limit())
                    }
                }
            }
            PageRequest::GetSettings => match self.get_settings().await {
                Ok(prefs) => settings_response(&prefs),
                Err(err) => PageResponse::Failure {
                    error: err.to_string(),
                },
            },
            PageRequest::SaveSettings { settings } => match self.save_settings(settings).await {
                Ok(prefs) => settings_response(&prefs),
                Err(err) => PageResponse::Failure {
                    error: err.to_string(),
                },
            },
            PageRequest::GetUsage => match self.usage().await {
                Ok(usage) => PageResponse::Usage { usage },
                Err(err) => PageResponse::Failure {
                    error: err.to_string(),
                },
            },
            PageRequest::ResetUsage => match self.reset_usage().await {
                Ok(usage) => PageResponse::Usage { usage },
                Err(err) => PageResponse::Failure {
                    error: err.to_string(),
                },
            },
            PageRequest::Ping => PageResponse::Pong,
        }
    }
}

fn settings_response(prefs: &Preferences) -> PageResponse {
    match serde_json::to_value(prefs) {
        Ok(settings) => PageResponse::Settings { settings },
        Err(e) => PageResponse::Failure {
            error: ConfigError::Malformed(e.to_string()).to_string(),
        },
    }
}

/// The message shown to the user for a failed generation.
fn user_message(err: &GatewayError) -> String {
    match err {
        GatewayError::RateLimited { retry_after } => format!(
            "Daily limit reached. Try again in {}.",
            format_retry_after(*retry_after)
        ),
        other => other.to_string(),
    }
}
