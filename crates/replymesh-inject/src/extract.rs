//! Post extraction, relative to an insertion point.

use crate::dom::{NodeId, PageDocument};
use crate::locator::LocatorProfile;

/// What could be read out of the post enclosing an insertion point. Any
/// piece the page does not expose is simply absent; extraction never
/// fails as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostExtract {
    pub text: Option<String>,
    pub author: Option<String>,
    pub date: Option<String>,
}

impl PostExtract {
    /// A post is only worth replying to if it has body text.
    pub fn is_usable(&self) -> bool {
        self.text.is_some()
    }
}

/// Walk up to the enclosing post container, then read text, author and
/// date out of it.
pub fn extract_post(
    doc: &PageDocument,
    profile: &LocatorProfile,
    point: NodeId,
) -> PostExtract {
    let Some(container) = doc.closest(point, &profile.post_container) else {
        return PostExtract::default();
    };

    let read = |locator| {
        doc.find_descendant(container, locator)
            .map(|node| doc.text_content(node))
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
    };

    PostExtract {
        text: read(&profile.post_text),
        author: read(&profile.post_author),
        date: read(&profile.post_date),
    }
}
