//! # ReplyMesh Inject
//!
//! The page-context half of ReplyMesh: a document model with a mutation
//! broadcast, structural locators, the idempotent injection pass, the
//! debounced rescan engine, per-control lifecycle handling, and reply
//! insertion.
//!
//! Everything here runs untrusted, next to the page: it never sees the
//! API credential and never talks to the network. The only way out is
//! the request channel to the privileged worker.

mod control;
mod dom;
mod engine;
mod extract;
mod insert;
mod locator;
mod scan;
mod toast;

pub use control::{
    Activation, ControlHandler, ControlState, ERROR_DISPLAY, SUCCESS_DISPLAY,
};
pub use dom::{Mutation, NodeId, PageDocument};
pub use engine::{Engine, SCAN_DEBOUNCE};
pub use extract::{PostExtract, extract_post};
pub use insert::{InsertMode, TERMINAL_EVENTS, insert_reply};
pub use locator::{Locator, LocatorProfile};
pub use scan::{
    CONTROL_CLASS, CONTROL_LABEL, MARKER_ATTR, POINT_ATTR, STATE_ATTR, controls, scan,
};
pub use toast::{TOAST_CLASS, TOAST_DISPLAY, show_toast};
