//! Mock session store for testing.

use async_trait::async_trait;
use futures::channel::mpsc;
use futures::StreamExt;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use url::Url;

use crate::ports::{
    SessionChange, SessionChanges, SessionStore, SessionStoreError, SessionTokens, StoredSession,
};

/// In-memory session store: token -> session, exchangeable codes, and a
/// pushable change feed.
#[derive(Default)]
pub struct MockSessionStore {
    sessions: Mutex<HashMap<String, StoredSession>>,
    codes: Mutex<HashMap<String, SessionTokens>>,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<SessionChange>>>,
    fail_delivery: AtomicBool,
    fail_query: AtomicBool,
    fail_sign_out: AtomicBool,
    pub magic_links_sent: Mutex<Vec<(String, Url)>>,
    pub sign_outs: AtomicUsize,
}

impl MockSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_session(&self, token: &str, email: Option<&str>) {
        self.sessions.lock().unwrap().insert(
            token.to_string(),
            StoredSession {
                email: email.map(str::to_string),
            },
        );
    }

    pub fn put_code(&self, code: &str, access_token: &str) {
        self.codes.lock().unwrap().insert(
            code.to_string(),
            SessionTokens {
                access_token: access_token.to_string(),
                refresh_token: None,
            },
        );
    }

    pub fn fail_delivery(&self, fail: bool) {
        self.fail_delivery.store(fail, Ordering::SeqCst);
    }

    pub fn fail_query(&self, fail: bool) {
        self.fail_query.store(fail, Ordering::SeqCst);
    }

    pub fn fail_sign_out(&self, fail: bool) {
        self.fail_sign_out.store(fail, Ordering::SeqCst);
    }

    /// Pushes a change notification to every live subscriber.
    pub fn push_change(&self, session: Option<StoredSession>) {
        self.subscribers
            .lock()
            .unwrap()
            .retain(|tx| tx.unbounded_send(SessionChange { session: session.clone() }).is_ok());
    }
}

#[async_trait]
impl SessionStore for MockSessionStore {
    async fn send_magic_link(
        &self,
        email: &str,
        redirect_url: &Url,
    ) -> Result<(), SessionStoreError> {
        if self.fail_delivery.load(Ordering::SeqCst) {
            return Err(SessionStoreError::Delivery("provider outage".into()));
        }
        self.magic_links_sent
            .lock()
            .unwrap()
            .push((email.to_string(), redirect_url.clone()));
        Ok(())
    }

    async fn exchange_code(&self, code: &str) -> Result<SessionTokens, SessionStoreError> {
        self.codes
            .lock()
            .unwrap()
            .get(code)
            .cloned()
            .ok_or_else(|| SessionStoreError::Exchange("unknown code".into()))
    }

    async fn session_for(
        &self,
        access_token: &str,
    ) -> Result<Option<StoredSession>, SessionStoreError> {
        if self.fail_query.load(Ordering::SeqCst) {
            return Err(SessionStoreError::Query("store unavailable".into()));
        }
        Ok(self.sessions.lock().unwrap().get(access_token).cloned())
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), SessionStoreError> {
        self.sign_outs.fetch_add(1, Ordering::SeqCst);
        if self.fail_sign_out.load(Ordering::SeqCst) {
            return Err(SessionStoreError::SignOut("store unavailable".into()));
        }
        self.sessions.lock().unwrap().remove(access_token);
        Ok(())
    }

    fn changes(&self) -> SessionChanges {
        let (tx, rx) = mpsc::unbounded();
        self.subscribers.lock().unwrap().push(tx);
        rx.boxed()
    }
}
