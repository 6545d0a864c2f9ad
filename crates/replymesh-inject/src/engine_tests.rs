use super::*;
use crate::scan::controls;

fn add_feed_item(doc: &PageDocument) {
    let item = doc.create_under(doc.root(), "article").unwrap();
    doc.set_attribute(item, "class", "feed-item").unwrap();
    let point = doc.create_under(item, "div").unwrap();
    doc.set_attribute(point, "class", "comment-box").unwrap();
}

async fn settle() {
    // Enough paused time for debounce windows and follow-up rescans to
    // drain.
    tokio::time::sleep(SCAN_DEBOUNCE * 10).await;
}

#[tokio::test(start_paused = true)]
async fn initial_scan_covers_preexisting_points() {
    let doc = Arc::new(PageDocument::new());
    add_feed_item(&doc);
    add_feed_item(&doc);

    let engine = Engine::new(Arc::clone(&doc), LocatorProfile::feed_default());
    let handle = tokio::spawn(engine.run());

    settle().await;
    assert_eq!(controls(&doc).len(), 2);

    doc.close();
    handle.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn mutation_bursts_end_in_exactly_one_control_per_point() {
    let doc = Arc::new(PageDocument::new());
    let engine = Engine::new(Arc::clone(&doc), LocatorProfile::feed_default());
    let handle = tokio::spawn(engine.run());
    settle().await;

    // A burst of feed updates, far faster than the debounce window.
    for _ in 0..5 {
        add_feed_item(&doc);
    }
    settle().await;
    assert_eq!(controls(&doc).len(), 5);

    // Another burst later on.
    for _ in 0..3 {
        add_feed_item(&doc);
    }
    settle().await;
    assert_eq!(controls(&doc).len(), 8);

    doc.close();
    handle.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn removed_points_disappear_without_residue() {
    let doc = Arc::new(PageDocument::new());
    add_feed_item(&doc);
    add_feed_item(&doc);

    let engine = Engine::new(Arc::clone(&doc), LocatorProfile::feed_default());
    let handle = tokio::spawn(engine.run());
    settle().await;
    assert_eq!(controls(&doc).len(), 2);

    let first_item = doc.children(doc.root())[0];
    doc.remove(first_item).unwrap();
    settle().await;
    assert_eq!(controls(&doc).len(), 1);

    doc.close();
    handle.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn engine_survives_unrelated_mutation_noise() {
    let doc = Arc::new(PageDocument::new());
    let engine = Engine::new(Arc::clone(&doc), LocatorProfile::feed_default());
    let handle = tokio::spawn(engine.run());
    settle().await;

    // Churn that matches no locator.
    for _ in 0..20 {
        let noise = doc.create_under(doc.root(), "div").unwrap();
        doc.set_text(noise, "ticker update").unwrap();
    }
    add_feed_item(&doc);
    settle().await;

    assert_eq!(controls(&doc).len(), 1);

    doc.close();
    handle.await.unwrap();
}
