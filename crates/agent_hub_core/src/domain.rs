//! crates/agent_hub_core/src/domain.rs
//!
//! Defines the pure, core data structures for the hub.
//! These structs are independent of any database or serialization format.

/// Route owned by the application: the landing page.
pub const HOME_PATH: &str = "/";
/// Route owned by the application: the login page (also the magic-link
/// return path).
pub const LOGIN_PATH: &str = "/login";
/// Route owned by the application: the gated e-book chat page.
pub const LIVRO_PATH: &str = "/livro";

/// The current user session as seen by every consumer.
///
/// The session store holds the authoritative truth; this is the derived
/// snapshot kept by the [`AuthSessionController`](crate::session::AuthSessionController).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub email: Option<String>,
}

impl Session {
    pub fn authenticated(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self { email: None }
    }

    /// Derived: a session is authenticated exactly when it carries an email.
    pub fn is_authenticated(&self) -> bool {
        self.email.is_some()
    }
}

/// Where the user should land after completing login.
///
/// Both fields are written together by the page that redirected to login
/// and cleared together by the redirect resolver. Stale entries from an
/// abandoned login are accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRedirect {
    pub target: String,
    pub from: String,
}

/// A shared-secret code distributed to purchasers, redeemable once per
/// email. Read-only from this side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessCode {
    pub code: String,
    pub is_active: bool,
}

/// A durable grant record: the existence of a row for an email is the sole
/// authority for "this email may use the e-book chat".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entitlement {
    pub email: String,
}

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// A single message in the e-book chat. Held only in memory, never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}
