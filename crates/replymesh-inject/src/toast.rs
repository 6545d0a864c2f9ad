//! Auto-dismissing notifications.

use std::sync::Arc;
use std::time::Duration;

use replymesh_protocols::error::InjectError;

use crate::dom::{NodeId, PageDocument};

/// Class carried by every toast element.
pub const TOAST_CLASS: &str = "replymesh-toast";

/// How long a toast stays on screen.
pub const TOAST_DISPLAY: Duration = Duration::from_secs(4);

/// Append a notification to the document and remove it after
/// [`TOAST_DISPLAY`].
pub fn show_toast(doc: &Arc<PageDocument>, message: &str) -> Result<NodeId, InjectError> {
    let toast = doc.create_under(doc.root(), "div")?;
    doc.set_attribute(toast, "class", TOAST_CLASS)?;
    doc.set_attribute(toast, "role", "status")?;
    doc.set_text(toast, message)?;

    let doc = Arc::clone(doc);
    tokio::spawn(async move {
        tokio::time::sleep(TOAST_DISPLAY).await;
        if doc.contains(toast) {
            let _ = doc.remove(toast);
        }
    });
    Ok(toast)
}
