use super::*;
use crate::dom::PageDocument;
use crate::locator::Locator;

fn profile() -> LocatorProfile {
    LocatorProfile::feed_default()
}

/// A feed item containing a comment box; returns (item, point).
fn feed_item_with_point(doc: &PageDocument) -> (NodeId, NodeId) {
    let item = doc.create_under(doc.root(), "article").unwrap();
    doc.set_attribute(item, "class", "feed-item").unwrap();
    let point = doc.create_under(item, "div").unwrap();
    doc.set_attribute(point, "class", "comment-box").unwrap();
    (item, point)
}

#[test]
fn scan_injects_one_control_per_point() {
    let doc = PageDocument::new();
    let (_, a) = feed_item_with_point(&doc);
    let (_, b) = feed_item_with_point(&doc);

    assert_eq!(scan(&doc, &profile()), 2);
    assert_eq!(controls(&doc).len(), 2);
    assert!(doc.attribute(a, MARKER_ATTR).is_some());
    assert!(doc.attribute(b, MARKER_ATTR).is_some());
}

#[test]
fn repeated_scans_are_idempotent() {
    let doc = PageDocument::new();
    feed_item_with_point(&doc);
    feed_item_with_point(&doc);

    assert_eq!(scan(&doc, &profile()), 2);
    for _ in 0..5 {
        assert_eq!(scan(&doc, &profile()), 0);
    }
    assert_eq!(controls(&doc).len(), 2);
}

#[test]
fn new_points_are_picked_up_by_later_scans() {
    let doc = PageDocument::new();
    feed_item_with_point(&doc);
    assert_eq!(scan(&doc, &profile()), 1);

    feed_item_with_point(&doc);
    assert_eq!(scan(&doc, &profile()), 1);
    assert_eq!(controls(&doc).len(), 2);
}

#[test]
fn control_prefers_the_toolbar_anchor() {
    let doc = PageDocument::new();
    let (_, point) = feed_item_with_point(&doc);
    let toolbar = doc.create_under(point, "div").unwrap();
    doc.set_attribute(toolbar, "class", "comment-box__actions")
        .unwrap();

    scan(&doc, &profile());
    let control = controls(&doc)[0];
    assert_eq!(doc.parent(control), Some(toolbar));
}

#[test]
fn control_falls_back_to_the_enclosing_form() {
    let doc = PageDocument::new();
    let item = doc.create_under(doc.root(), "article").unwrap();
    doc.set_attribute(item, "class", "feed-item").unwrap();
    let form = doc.create_under(item, "form").unwrap();
    let point = doc.create_under(form, "div").unwrap();
    doc.set_attribute(point, "class", "comment-box").unwrap();

    scan(&doc, &profile());
    let control = controls(&doc)[0];
    assert_eq!(doc.parent(control), Some(form));
}

#[test]
fn control_lands_on_the_point_when_nothing_better_exists() {
    let doc = PageDocument::new();
    let (_, point) = feed_item_with_point(&doc);

    scan(&doc, &profile());
    let control = controls(&doc)[0];
    assert_eq!(doc.parent(control), Some(point));
}

#[test]
fn control_carries_state_and_back_reference() {
    let doc = PageDocument::new();
    let (_, point) = feed_item_with_point(&doc);

    scan(&doc, &profile());
    let control = controls(&doc)[0];
    assert_eq!(
        doc.attribute(control, STATE_ATTR).as_deref(),
        Some(ControlState::Idle.as_str())
    );
    assert_eq!(
        doc.attribute(control, POINT_ATTR),
        Some(point.to_string())
    );
    assert_eq!(doc.text(control).as_deref(), Some(CONTROL_LABEL));
}

#[test]
fn removed_points_leave_no_state_behind() {
    let doc = PageDocument::new();
    let (item, _) = feed_item_with_point(&doc);
    feed_item_with_point(&doc);

    scan(&doc, &profile());
    assert_eq!(controls(&doc).len(), 2);

    doc.remove(item).unwrap();
    assert_eq!(controls(&doc).len(), 1);
    // Nothing left pointing at the removed subtree; a rescan changes
    // nothing.
    assert_eq!(scan(&doc, &profile()), 0);
    assert_eq!(controls(&doc).len(), 1);
}

#[test]
fn injected_controls_do_not_match_insertion_points() {
    // The control itself must never look like an insertion point to a
    // later scan.
    let doc = PageDocument::new();
    feed_item_with_point(&doc);
    scan(&doc, &profile());

    let points = doc.query_all(&Locator::class("comment-box"));
    assert_eq!(points.len(), 1);
}
