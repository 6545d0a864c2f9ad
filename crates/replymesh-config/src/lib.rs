//! # ReplyMesh Config
//!
//! The preferences record, its validation rules, and the synced-scope
//! store behind it. A preferences document is always handled as a whole:
//! loads merge the stored document over defaults, saves validate the full
//! record first and then replace the stored document atomically. No
//! partial or invalid state ever reaches the store.

mod schema;
mod service;
mod store;
mod validator;

pub use schema::*;
pub use service::SettingsService;
pub use store::{FileSettingsStore, MemorySettingsStore, SettingsStore};
pub use validator::validate;
