//! The injection pass.
//!
//! One scan walks the document for insertion points that do not carry the
//! marker attribute yet, builds an action control for each, and marks the
//! point. The marker lives on the point itself — when the page drops the
//! point the marker goes with it, so there is no registry to garbage
//! collect and repeated scans are naturally idempotent.

use tracing::{debug, warn};

use crate::control::ControlState;
use crate::dom::{NodeId, PageDocument};
use crate::locator::LocatorProfile;

use replymesh_protocols::error::InjectError;

#[cfg(test)]
#[path = "scan_tests.rs"]
mod tests;

/// Marker set on an insertion point once its control is attached.
pub const MARKER_ATTR: &str = "data-replymesh";

/// Lifecycle state attribute on the control element.
pub const STATE_ATTR: &str = "data-replymesh-state";

/// Back-reference from a control to its insertion point.
pub const POINT_ATTR: &str = "data-replymesh-for";

/// Class carried by every injected control.
pub const CONTROL_CLASS: &str = "replymesh-action";

/// Label shown on an idle control.
pub const CONTROL_LABEL: &str = "Generate reply";

/// Run one pass; returns how many controls were injected.
pub fn scan(doc: &PageDocument, profile: &LocatorProfile) -> usize {
    let mut injected = 0;
    for point in doc.query_all(&profile.insertion_point) {
        if doc.attribute(point, MARKER_ATTR).is_some() {
            continue;
        }
        match inject_control(doc, profile, point) {
            Ok(control) => {
                debug!(%point, %control, "Action control injected");
                injected += 1;
            }
            // The point can vanish mid-pass; skip it and move on.
            Err(e) => warn!(%point, error = %e, "Skipping insertion point"),
        }
    }
    injected
}

/// Build a control for `point` and mark the point. The mark is written
/// last so a failed injection leaves the point eligible for the next
/// pass.
fn inject_control(
    doc: &PageDocument,
    profile: &LocatorProfile,
    point: NodeId,
) -> Result<NodeId, InjectError> {
    let anchor = anchor_for(doc, profile, point);

    let control = doc.create_under(anchor, "button")?;
    doc.set_attribute(control, "class", CONTROL_CLASS)?;
    doc.set_attribute(control, "type", "button")?;
    doc.set_attribute(control, STATE_ATTR, ControlState::Idle.as_str())?;
    doc.set_attribute(control, POINT_ATTR, &point.to_string())?;
    doc.set_text(control, CONTROL_LABEL)?;

    doc.set_attribute(point, MARKER_ATTR, "1")?;
    Ok(control)
}

/// Where the control attaches: an action-area child of the point if one
/// exists, else the nearest enclosing form, else the point itself.
fn anchor_for(doc: &PageDocument, profile: &LocatorProfile, point: NodeId) -> NodeId {
    doc.find_descendant(point, &profile.toolbar)
        .or_else(|| doc.closest(point, &profile.form))
        .unwrap_or(point)
}

/// Every injected control currently in the document.
pub fn controls(doc: &PageDocument) -> Vec<NodeId> {
    doc.query_all(&crate::locator::Locator::attr(STATE_ATTR))
}
