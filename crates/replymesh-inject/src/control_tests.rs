use super::*;
use crate::locator::Locator;
use crate::scan::{MARKER_ATTR, scan};
use crate::toast::TOAST_CLASS;
use async_trait::async_trait;
use replymesh_channel::channel;
use replymesh_config::{MemorySettingsStore, Preferences, SettingsService};
use replymesh_gateway::{GenerateRequest, Generator, Gateway, Worker};
use replymesh_ledger::{MemoryLedgerStore, UsageLedger, UsageRecord};
use replymesh_protocols::error::ProviderError;

struct StaticGenerator(Result<&'static str, ProviderError>);

#[async_trait]
impl Generator for StaticGenerator {
    async fn generate(
        &self,
        _credential: &str,
        _request: &GenerateRequest,
    ) -> Result<String, ProviderError> {
        self.0.clone().map(str::to_string)
    }
}

struct Fixture {
    doc: Arc<PageDocument>,
    handler: ControlHandler,
    control: NodeId,
    point: NodeId,
    ledger: Arc<UsageLedger>,
}

/// A document with one feed item, a running worker, and one injected
/// control.
fn fixture_with(
    post_text: &str,
    prefs: Preferences,
    record: Option<UsageRecord>,
    generator: StaticGenerator,
) -> Fixture {
    let doc = Arc::new(PageDocument::new());
    let profile = LocatorProfile::feed_default();

    let item = doc.create_under(doc.root(), "article").unwrap();
    doc.set_attribute(item, "class", "feed-item").unwrap();
    let body = doc.create_under(item, "div").unwrap();
    doc.set_attribute(body, "class", "feed-item__text").unwrap();
    doc.set_text(body, post_text).unwrap();
    let point = doc.create_under(item, "div").unwrap();
    doc.set_attribute(point, "class", "comment-box").unwrap();

    assert_eq!(scan(&doc, &profile), 1);
    let control = crate::scan::controls(&doc)[0];

    let settings = SettingsService::new(Arc::new(MemorySettingsStore::with(prefs.clone())));
    let store = match record {
        Some(record) => MemoryLedgerStore::with(record),
        None => MemoryLedgerStore::new(),
    };
    let ledger = Arc::new(UsageLedger::new(Arc::new(store), prefs.daily_limit));
    let gateway = Gateway::new(settings, ledger.clone(), Arc::new(generator));

    let (page, endpoint) = channel(8);
    tokio::spawn(Worker::new(gateway, endpoint).run());

    let handler = ControlHandler::new(Arc::clone(&doc), profile, page);
    Fixture {
        doc,
        handler,
        control,
        point,
        ledger,
    }
}

fn configured_prefs() -> Preferences {
    Preferences {
        credential: "key-abc".to_string(),
        ..Preferences::default()
    }
}

#[tokio::test(start_paused = true)]
async fn activation_completes_and_reverts_to_idle() {
    let f = fixture_with(
        "Great insights on leadership!",
        configured_prefs(),
        None,
        StaticGenerator(Ok("Thanks for sharing!")),
    );

    let activation = f.handler.activate(f.control).await;
    assert_eq!(
        activation,
        Activation::Completed {
            reply: "Thanks for sharing!".to_string(),
            usage_count: Some(1),
        }
    );
    assert_eq!(f.handler.state(f.control), Some(ControlState::Success));

    tokio::time::sleep(SUCCESS_DISPLAY + Duration::from_millis(50)).await;
    assert_eq!(f.handler.state(f.control), Some(ControlState::Idle));
}

#[tokio::test(start_paused = true)]
async fn busy_control_ignores_further_activations() {
    let f = fixture_with(
        "Great insights on leadership!",
        configured_prefs(),
        None,
        StaticGenerator(Ok("unused")),
    );

    f.doc
        .set_attribute(f.control, crate::scan::STATE_ATTR, ControlState::Busy.as_str())
        .unwrap();

    assert_eq!(f.handler.activate(f.control).await, Activation::IgnoredBusy);
    // Nothing was sent; the quota is untouched.
    assert_eq!(f.ledger.read().await.unwrap().count, 0);
}

#[tokio::test(start_paused = true)]
async fn unreadable_post_fails_without_a_request() {
    let f = fixture_with(
        "   ",
        configured_prefs(),
        None,
        StaticGenerator(Ok("unused")),
    );

    let activation = f.handler.activate(f.control).await;
    assert!(matches!(activation, Activation::Failed { .. }));
    assert_eq!(f.handler.state(f.control), Some(ControlState::Error));
    assert_eq!(f.doc.query_all(&Locator::class(TOAST_CLASS)).len(), 1);
    assert_eq!(f.ledger.read().await.unwrap().count, 0);

    tokio::time::sleep(ERROR_DISPLAY + Duration::from_millis(50)).await;
    assert_eq!(f.handler.state(f.control), Some(ControlState::Idle));
}

#[tokio::test(start_paused = true)]
async fn refused_generation_surfaces_the_gateway_message() {
    let now = chrono::Utc::now();
    let f = fixture_with(
        "Great insights on leadership!",
        Preferences {
            daily_limit: 5,
            ..configured_prefs()
        },
        Some(UsageRecord {
            count: 5,
            ..UsageRecord::fresh(5, now)
        }),
        StaticGenerator(Ok("unused")),
    );

    let activation = f.handler.activate(f.control).await;
    match activation {
        Activation::Failed { message } => {
            assert!(message.starts_with("Daily limit reached"));
        }
        other => panic!("expected failure, got {:?}", other),
    }
    assert_eq!(f.handler.state(f.control), Some(ControlState::Error));
}

#[tokio::test(start_paused = true)]
async fn provider_failure_shows_a_toast_and_recovers() {
    let f = fixture_with(
        "Great insights on leadership!",
        configured_prefs(),
        None,
        StaticGenerator(Err(ProviderError::ApiError {
            status: 500,
            message: "overloaded".to_string(),
        })),
    );

    let activation = f.handler.activate(f.control).await;
    match activation {
        Activation::Failed { message } => assert!(message.contains("overloaded")),
        other => panic!("expected failure, got {:?}", other),
    }

    // The failed attempt still consumed its quota unit.
    assert_eq!(f.ledger.read().await.unwrap().count, 1);

    tokio::time::sleep(ERROR_DISPLAY + Duration::from_millis(50)).await;
    assert_eq!(f.handler.state(f.control), Some(ControlState::Idle));
}

#[tokio::test(start_paused = true)]
async fn dead_worker_is_reported_like_a_provider_failure() {
    let doc = Arc::new(PageDocument::new());
    let profile = LocatorProfile::feed_default();

    let item = doc.create_under(doc.root(), "article").unwrap();
    doc.set_attribute(item, "class", "feed-item").unwrap();
    let body = doc.create_under(item, "div").unwrap();
    doc.set_attribute(body, "class", "feed-item__text").unwrap();
    doc.set_text(body, "Great insights on leadership!").unwrap();
    let stray_point = doc.create_under(item, "div").unwrap();
    doc.set_attribute(stray_point, "class", "comment-box").unwrap();
    scan(&doc, &profile);
    let control = crate::scan::controls(&doc)[0];

    let (page, endpoint) = channel(8);
    drop(endpoint);
    let handler = ControlHandler::new(Arc::clone(&doc), profile, page);

    let activation = handler.activate(control).await;
    match activation {
        Activation::Failed { message } => assert!(message.contains("Try again")),
        other => panic!("expected failure, got {:?}", other),
    }
    assert_eq!(doc.query_all(&Locator::class(TOAST_CLASS)).len(), 1);
}

#[tokio::test(start_paused = true)]
async fn vanished_point_fails_gracefully() {
    let f = fixture_with(
        "Great insights on leadership!",
        configured_prefs(),
        None,
        StaticGenerator(Ok("unused")),
    );

    // The control sits on the point here, so removing the point takes
    // the control with it.
    f.doc.remove(f.point).unwrap();
    let activation = f.handler.activate(f.control).await;
    assert!(matches!(activation, Activation::Failed { .. }));
}
