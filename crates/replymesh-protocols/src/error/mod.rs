//! Error types for the ReplyMesh protocol layer.

mod channel;
mod config;
mod gateway;
mod inject;
mod ledger;
mod provider;

pub use channel::*;
pub use config::*;
pub use gateway::*;
pub use inject::*;
pub use ledger::*;
pub use provider::*;
