//! Auth session controller behavior against the mock session store.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use agent_hub_core::mocks::MockSessionStore;
use agent_hub_core::ports::{SessionStore, StoredSession};
use agent_hub_core::AuthSessionController;
use url::Url;

fn origin() -> Url {
    Url::parse("https://hub.example.com").unwrap()
}

#[tokio::test]
async fn restores_a_persisted_session_before_rendering() {
    let store = Arc::new(MockSessionStore::new());
    store.put_session("tok-1", Some("a@x.com"));

    let controller = AuthSessionController::init(store, &origin(), Some("tok-1".into()))
        .await
        .unwrap();

    let session = controller.current();
    assert!(session.is_authenticated());
    assert_eq!(session.email.as_deref(), Some("a@x.com"));
}

#[tokio::test]
async fn session_query_errors_read_as_logged_out() {
    let store = Arc::new(MockSessionStore::new());
    store.put_session("tok-1", Some("a@x.com"));
    store.fail_query(true);

    let controller = AuthSessionController::init(store, &origin(), Some("tok-1".into()))
        .await
        .unwrap();

    assert!(!controller.current().is_authenticated());
}

#[tokio::test]
async fn a_session_without_an_email_is_not_authenticated() {
    let store = Arc::new(MockSessionStore::new());
    store.put_session("tok-1", None);

    let controller = AuthSessionController::init(store, &origin(), Some("tok-1".into()))
        .await
        .unwrap();

    assert!(!controller.current().is_authenticated());
}

#[tokio::test]
async fn magic_link_request_targets_the_login_path_and_leaves_the_session_alone() {
    let store = Arc::new(MockSessionStore::new());
    let controller = AuthSessionController::init(Arc::clone(&store) as Arc<dyn SessionStore>, &origin(), None)
        .await
        .unwrap();

    controller.request_magic_link("a@x.com").await.unwrap();

    let sent = store.magic_links_sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "a@x.com");
    assert_eq!(sent[0].1.as_str(), "https://hub.example.com/login");
    drop(sent);
    assert!(!controller.current().is_authenticated());
}

#[tokio::test]
async fn failed_delivery_is_surfaced_as_a_retryable_error() {
    let store = Arc::new(MockSessionStore::new());
    store.fail_delivery(true);
    let controller = AuthSessionController::init(Arc::clone(&store) as Arc<dyn SessionStore>, &origin(), None)
        .await
        .unwrap();

    assert!(controller.request_magic_link("a@x.com").await.is_err());

    // A retry after the outage clears goes through.
    store.fail_delivery(false);
    assert!(controller.request_magic_link("a@x.com").await.is_ok());
}

#[tokio::test]
async fn completing_login_exchanges_the_code_and_applies_the_session() {
    let store = Arc::new(MockSessionStore::new());
    store.put_code("one-time", "tok-9");
    store.put_session("tok-9", Some("a@x.com"));

    let controller = AuthSessionController::init(store, &origin(), None)
        .await
        .unwrap();
    controller.complete_login("one-time").await.unwrap();

    assert_eq!(controller.current().email.as_deref(), Some("a@x.com"));
}

#[tokio::test]
async fn logout_clears_local_state_even_when_the_remote_call_fails() {
    let store = Arc::new(MockSessionStore::new());
    store.put_code("one-time", "tok-9");
    store.put_session("tok-9", Some("a@x.com"));

    let controller = AuthSessionController::init(Arc::clone(&store) as Arc<dyn SessionStore>, &origin(), None)
        .await
        .unwrap();
    controller.complete_login("one-time").await.unwrap();
    assert!(controller.current().is_authenticated());

    store.fail_sign_out(true);
    controller.logout().await;

    assert_eq!(store.sign_outs.load(Ordering::SeqCst), 1);
    assert!(!controller.current().is_authenticated());
}

#[tokio::test]
async fn subscribers_observe_pushed_store_changes() {
    let store = Arc::new(MockSessionStore::new());
    let controller = AuthSessionController::init(Arc::clone(&store) as Arc<dyn SessionStore>, &origin(), None)
        .await
        .unwrap();

    let mut rx = controller.subscribe();
    assert!(!rx.borrow().is_authenticated());

    store.push_change(Some(StoredSession {
        email: Some("a@x.com".to_string()),
    }));

    tokio::time::timeout(Duration::from_secs(1), rx.changed())
        .await
        .expect("change notification must arrive")
        .expect("sender must still be alive");
    assert_eq!(rx.borrow().email.as_deref(), Some("a@x.com"));

    // Logout pushed by the store flows through the same feed.
    store.push_change(None);
    tokio::time::timeout(Duration::from_secs(1), rx.changed())
        .await
        .expect("change notification must arrive")
        .expect("sender must still be alive");
    assert!(!rx.borrow().is_authenticated());
}

#[tokio::test]
async fn dropping_the_receiver_is_the_unsubscribe() {
    let store = Arc::new(MockSessionStore::new());
    let controller = AuthSessionController::init(Arc::clone(&store) as Arc<dyn SessionStore>, &origin(), None)
        .await
        .unwrap();

    let rx = controller.subscribe();
    drop(rx);

    // A change after teardown must be a tolerated no-op, not an error.
    store.push_change(Some(StoredSession {
        email: Some("late@x.com".to_string()),
    }));
    let deadline = tokio::time::Instant::now() + Duration::from_secs(1);
    while controller.current().email.is_none() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "pump must keep applying changes after a receiver is dropped"
        );
        tokio::task::yield_now().await;
    }
    assert_eq!(controller.current().email.as_deref(), Some("late@x.com"));
}
