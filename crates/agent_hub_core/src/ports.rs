//! crates/agent_hub_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the hub's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the hosted identity service, the entitlement tables and
//! the chat webhook behind them.

use async_trait::async_trait;
use futures::stream::{self, Stream, StreamExt};
use std::pin::Pin;
use url::Url;

use crate::domain::{AccessCode, Entitlement, PendingRedirect};

//=========================================================================================
// Session store
//=========================================================================================

/// Errors reported by the session store.
///
/// `Query` failures are always treated as "no session" by callers (fail
/// closed); `Delivery` failures are user-retryable.
#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("magic link delivery failed: {0}")]
    Delivery(String),
    #[error("session query failed: {0}")]
    Query(String),
    #[error("code exchange failed: {0}")]
    Exchange(String),
    #[error("sign-out failed: {0}")]
    SignOut(String),
}

/// Token material returned by a successful code exchange.
#[derive(Debug, Clone)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

/// A session as stored by the identity service. An entry without an email
/// is treated as unauthenticated by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSession {
    pub email: Option<String>,
}

/// A push notification from the session store: the new session, or `None`
/// on logout/expiry.
#[derive(Debug, Clone)]
pub struct SessionChange {
    pub session: Option<StoredSession>,
}

/// A boxed stream of session change notifications. Dropping the stream
/// unsubscribes.
pub type SessionChanges = Pin<Box<dyn Stream<Item = SessionChange> + Send>>;

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Sends a passwordless login link to `email`. The link returns the
    /// user to `redirect_url`.
    async fn send_magic_link(&self, email: &str, redirect_url: &Url)
        -> Result<(), SessionStoreError>;

    /// Exchanges a one-time auth code (from the magic-link callback) for
    /// session tokens.
    async fn exchange_code(&self, code: &str) -> Result<SessionTokens, SessionStoreError>;

    /// Looks up the session behind an access token. `Ok(None)` means the
    /// token no longer names a session.
    async fn session_for(&self, access_token: &str)
        -> Result<Option<StoredSession>, SessionStoreError>;

    /// Terminates the session behind the token on the remote side.
    async fn sign_out(&self, access_token: &str) -> Result<(), SessionStoreError>;

    /// Push-style change feed. Stores that cannot push return an empty
    /// stream; consumers then rely on explicit queries only.
    fn changes(&self) -> SessionChanges {
        stream::empty().boxed()
    }
}

//=========================================================================================
// Entitlement store
//=========================================================================================

#[derive(Debug, thiserror::Error)]
pub enum EntitlementStoreError {
    #[error("entitlement query failed: {0}")]
    Query(String),
    #[error("entitlement write failed: {0}")]
    Write(String),
}

/// Outcome of an entitlement insert. A row that already existed (two tabs
/// redeeming concurrently) is a distinguished outcome, not an error; the
/// backend-specific duplicate detection lives in the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntitlementInsert {
    Created,
    AlreadyEntitled,
}

#[async_trait]
pub trait EntitlementStore: Send + Sync {
    async fn find_entitlement(&self, email: &str)
        -> Result<Option<Entitlement>, EntitlementStoreError>;

    async fn insert_entitlement(&self, email: &str)
        -> Result<EntitlementInsert, EntitlementStoreError>;

    /// Looks up a code that exists AND is active. Inactive codes are
    /// indistinguishable from absent ones.
    async fn find_active_access_code(&self, code: &str)
        -> Result<Option<AccessCode>, EntitlementStoreError>;
}

//=========================================================================================
// Chat backend
//=========================================================================================

#[derive(Debug, thiserror::Error)]
#[error("chat transport failed: {0}")]
pub struct ChatTransportError(pub String);

#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Forwards one question to the webhook. `Ok(None)` means the backend
    /// answered without a text payload.
    async fn ask(&self, pergunta: &str) -> Result<Option<String>, ChatTransportError>;
}

//=========================================================================================
// Pending redirect store
//=========================================================================================

/// Process-wide holder for the post-login navigation intent, with no TTL.
///
/// `peek` does not clear: the `from` fallback is read without consuming,
/// and the resolver clears explicitly (and idempotently) only once a
/// target is found.
pub trait PendingRedirectStore: Send + Sync {
    fn record(&self, pending: PendingRedirect);
    fn peek(&self) -> Option<PendingRedirect>;
    fn clear(&self);
}
