//! Putting an accepted reply into the input surface.
//!
//! Two modes: set the content at once, or type it character by character
//! with human-looking pacing. Both end with the same terminal event
//! sequence so the host page's own reactive state settles identically.

use std::time::Duration;

use rand::Rng;

use replymesh_protocols::error::InjectError;

use crate::dom::{NodeId, PageDocument};

#[cfg(test)]
#[path = "insert_tests.rs"]
mod tests;

/// How a reply lands in the input surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertMode {
    /// Set the full content once.
    Immediate,
    /// Type character by character with randomized delays.
    Paced,
}

impl InsertMode {
    /// Mode for the `paced_insertion` preference flag.
    pub fn from_paced(paced: bool) -> Self {
        if paced {
            InsertMode::Paced
        } else {
            InsertMode::Immediate
        }
    }
}

/// Events fired after the content is in place, in order.
pub const TERMINAL_EVENTS: [&str; 2] = ["input", "change"];

/// Write `text` into `input` using the given mode.
pub async fn insert_reply(
    doc: &PageDocument,
    input: NodeId,
    text: &str,
    mode: InsertMode,
) -> Result<(), InjectError> {
    match mode {
        InsertMode::Immediate => {
            doc.set_text(input, text)?;
        }
        InsertMode::Paced => {
            let mut typed = String::new();
            for ch in text.chars() {
                typed.push(ch);
                doc.set_text(input, &typed)?;
                doc.fire_event(input, "input")?;
                tokio::time::sleep(pause_after(ch)).await;
            }
        }
    }

    for event in TERMINAL_EVENTS {
        doc.fire_event(input, event)?;
    }
    Ok(())
}

/// Delay after typing one character. Punctuation and spaces sometimes get
/// a longer pause, the way a person hesitates between phrases.
fn pause_after(ch: char) -> Duration {
    let mut rng = rand::thread_rng();
    let mut millis: u64 = rng.gen_range(30..=90);
    if (ch.is_whitespace() || ".,!?;:".contains(ch)) && rng.gen_bool(0.3) {
        millis += rng.gen_range(120..=350);
    }
    Duration::from_millis(millis)
}
