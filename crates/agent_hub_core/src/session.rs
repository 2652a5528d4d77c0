//! crates/agent_hub_core/src/session.rs
//!
//! The auth session controller: wraps the session store, keeps a live
//! session snapshot, and re-broadcasts changes to subscribers.

use futures::StreamExt;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use url::Url;

use crate::domain::{Session, LOGIN_PATH};
use crate::ports::{SessionStore, SessionStoreError, StoredSession};

/// Wraps the session store with a synchronously readable snapshot and a
/// watch-channel subscription.
///
/// The change subscription is established before the initial query, so no
/// notification is lost in between; the same state may briefly be applied
/// twice, which is harmless (last writer wins).
pub struct AuthSessionController {
    store: Arc<dyn SessionStore>,
    login_redirect: Url,
    snapshot: Arc<watch::Sender<Session>>,
    access_token: Mutex<Option<String>>,
}

impl AuthSessionController {
    /// Initializes the controller: subscribes to store changes, then
    /// restores the session behind `persisted_token` (if any).
    ///
    /// A query failure is treated as "no session" - the gate must fail
    /// closed, never open.
    pub async fn init(
        store: Arc<dyn SessionStore>,
        origin: &Url,
        persisted_token: Option<String>,
    ) -> Result<Arc<Self>, SessionStoreError> {
        let login_redirect = origin
            .join(LOGIN_PATH)
            .map_err(|e| SessionStoreError::Query(e.to_string()))?;

        let snapshot = Arc::new(watch::channel(Session::anonymous()).0);

        // Subscribe first. The pump ends when the store drops its side.
        let mut changes = store.changes();
        let pump_snapshot = Arc::clone(&snapshot);
        tokio::spawn(async move {
            while let Some(change) = changes.next().await {
                pump_snapshot.send_replace(session_from(change.session));
            }
        });

        let controller = Arc::new(Self {
            store,
            login_redirect,
            snapshot,
            access_token: Mutex::new(None),
        });

        if let Some(token) = persisted_token {
            controller.restore(token).await;
        }

        Ok(controller)
    }

    async fn restore(&self, token: String) {
        let restored = match self.store.session_for(&token).await {
            Ok(stored) => session_from(stored),
            Err(_) => Session::anonymous(),
        };
        if restored.is_authenticated() {
            self.set_token(Some(token));
        }
        self.snapshot.send_replace(restored);
    }

    /// The last known session snapshot, available synchronously.
    pub fn current(&self) -> Session {
        self.snapshot.borrow().clone()
    }

    /// Registers for change notifications. Dropping the receiver
    /// unsubscribes; no explicit teardown call is needed.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.snapshot.subscribe()
    }

    /// Asks the store to send a login link to `email`, returning the user
    /// to this application's `/login` path.
    ///
    /// Does not touch the stored session; a failure is surfaced to the
    /// caller as a retryable delivery error.
    pub async fn request_magic_link(&self, email: &str) -> Result<(), SessionStoreError> {
        self.store
            .send_magic_link(email, &self.login_redirect)
            .await
    }

    /// Exchanges the callback's one-time code for a session and applies it
    /// to the snapshot. Used only by the auth-callback landing flow.
    pub async fn complete_login(&self, code: &str) -> Result<(), SessionStoreError> {
        let tokens = self.store.exchange_code(code).await?;
        let stored = self.store.session_for(&tokens.access_token).await?;
        self.set_token(Some(tokens.access_token));
        self.snapshot.send_replace(session_from(stored));
        Ok(())
    }

    /// Terminates the session. Local state is cleared unconditionally,
    /// even when the remote call fails.
    pub async fn logout(&self) {
        let token = self.set_token(None);
        if let Some(token) = token {
            let _ = self.store.sign_out(&token).await;
        }
        self.snapshot.send_replace(Session::anonymous());
    }

    fn set_token(&self, token: Option<String>) -> Option<String> {
        let mut guard = self
            .access_token
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::replace(&mut *guard, token)
    }
}

fn session_from(stored: Option<StoredSession>) -> Session {
    match stored.and_then(|s| s.email) {
        Some(email) => Session::authenticated(email),
        None => Session::anonymous(),
    }
}
