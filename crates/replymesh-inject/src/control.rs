//! Per-control lifecycle: `idle -> busy -> success | error -> idle`.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use replymesh_channel::PageEndpoint;
use replymesh_protocols::{PageRequest, PageResponse};

use crate::dom::{NodeId, PageDocument};
use crate::extract::extract_post;
use crate::locator::LocatorProfile;
use crate::scan::{POINT_ATTR, STATE_ATTR};
use crate::toast::show_toast;

#[cfg(test)]
#[path = "control_tests.rs"]
mod tests;

/// How long an error state stays visible before the control goes idle.
pub const ERROR_DISPLAY: Duration = Duration::from_millis(2500);

/// How long a success state stays visible before the control goes idle.
pub const SUCCESS_DISPLAY: Duration = Duration::from_millis(1200);

/// Lifecycle state carried on the control element itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlState {
    Idle,
    Busy,
    Success,
    Error,
}

impl ControlState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlState::Idle => "idle",
            ControlState::Busy => "busy",
            ControlState::Success => "success",
            ControlState::Error => "error",
        }
    }

    pub fn parse(s: &str) -> Option<ControlState> {
        match s {
            "idle" => Some(ControlState::Idle),
            "busy" => Some(ControlState::Busy),
            "success" => Some(ControlState::Success),
            "error" => Some(ControlState::Error),
            _ => None,
        }
    }
}

/// Outcome of one activation, handed to the display surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// A reply came back; the modal takes it from here.
    Completed {
        reply: String,
        usage_count: Option<u32>,
    },
    /// The attempt failed; a toast was shown and the control reverts to
    /// idle shortly.
    Failed { message: String },
    /// The control was already busy; a second activation is a no-op.
    IgnoredBusy,
}

/// Drives activations for the controls of one document.
#[derive(Clone)]
pub struct ControlHandler {
    doc: Arc<PageDocument>,
    profile: LocatorProfile,
    page: PageEndpoint,
}

impl ControlHandler {
    pub fn new(doc: Arc<PageDocument>, profile: LocatorProfile, page: PageEndpoint) -> Self {
        Self { doc, profile, page }
    }

    /// Current lifecycle state of a control.
    pub fn state(&self, control: NodeId) -> Option<ControlState> {
        self.doc
            .attribute(control, STATE_ATTR)
            .and_then(|value| ControlState::parse(&value))
    }

    /// Handle a user activation of `control`.
    ///
    /// A control in the busy state ignores further activations until its
    /// in-flight request resolves. Failures of any kind — unreadable
    /// post, undeliverable request, refused generation — surface as a
    /// toast plus a timed error state; none of them are fatal to the
    /// engine.
    pub async fn activate(&self, control: NodeId) -> Activation {
        if self.state(control) == Some(ControlState::Busy) {
            debug!(%control, "Activation ignored: control is busy");
            return Activation::IgnoredBusy;
        }
        if self.set_state(control, ControlState::Busy).is_none() {
            return Activation::Failed {
                message: "This post is no longer on the page.".to_string(),
            };
        }

        let point = self
            .doc
            .attribute(control, POINT_ATTR)
            .and_then(|value| NodeId::parse(&value))
            .filter(|&point| self.doc.contains(point));
        let extract = match point {
            Some(point) => extract_post(&self.doc, &self.profile, point),
            None => Default::default(),
        };
        let Some(post_text) = extract.text else {
            return self.fail(control, "Couldn't read this post. Try another one.");
        };

        let request = PageRequest::GenerateReply {
            post_text,
            author_name: extract.author,
            post_date: extract.date,
        };
        let response = match self.page.request(request).await {
            Ok(response) => response,
            // Undeliverable requests get the same treatment as provider
            // failures: a visible message and a retry affordance.
            Err(e) => {
                warn!(%control, error = %e, "Request channel failed");
                return self.fail(control, "Reply service unreachable. Try again.");
            }
        };

        match response {
            PageResponse::Reply {
                success: true,
                reply: Some(reply),
                usage_count,
                ..
            } => {
                self.set_state(control, ControlState::Success);
                self.schedule_revert(control, ControlState::Success, SUCCESS_DISPLAY);
                Activation::Completed { reply, usage_count }
            }
            PageResponse::Reply {
                success: false,
                error,
                ..
            } => {
                let message =
                    error.unwrap_or_else(|| "Reply generation failed. Try again.".to_string());
                self.fail(control, &message)
            }
            _ => self.fail(control, "Reply generation failed. Try again."),
        }
    }

    fn fail(&self, control: NodeId, message: &str) -> Activation {
        if let Err(e) = show_toast(&self.doc, message) {
            warn!(error = %e, "Could not show notification");
        }
        self.set_state(control, ControlState::Error);
        self.schedule_revert(control, ControlState::Error, ERROR_DISPLAY);
        Activation::Failed {
            message: message.to_string(),
        }
    }

    fn set_state(&self, control: NodeId, state: ControlState) -> Option<()> {
        self.doc
            .set_attribute(control, STATE_ATTR, state.as_str())
            .ok()
    }

    /// Put the control back to idle after `delay`, unless something else
    /// moved it on in the meantime.
    fn schedule_revert(&self, control: NodeId, from: ControlState, delay: Duration) {
        let doc = Arc::clone(&self.doc);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let current = doc
                .attribute(control, STATE_ATTR)
                .and_then(|value| ControlState::parse(&value));
            if current == Some(from) {
                let _ = doc.set_attribute(control, STATE_ATTR, ControlState::Idle.as_str());
            }
        });
    }
}
