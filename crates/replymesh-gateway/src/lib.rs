//! # ReplyMesh Gateway
//!
//! The privileged side of the system: validates generation requests,
//! enforces the usage quota, calls the generative-text provider, and
//! answers settings/usage requests. Every handler invocation reloads
//! preferences and the usage record from their stores — the worker
//! tolerates being torn down and restarted between messages, so nothing
//! is cached in memory across requests.

mod gateway;
mod gemini;
mod generator;
mod sanitize;
mod worker;

pub use gateway::{Gateway, GenerateInput, GeneratedReply, format_retry_after};
pub use gemini::GeminiGenerator;
pub use generator::{GenerateRequest, Generator, build_prompt};
pub use sanitize::{MAX_SOURCE_CHARS, MIN_SOURCE_CHARS, sanitize_source_text};
pub use worker::{KEEPALIVE_INTERVAL, Worker};
