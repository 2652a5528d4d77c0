pub mod chat;
pub mod domain;
pub mod gate;
pub mod ports;
pub mod redirect;
pub mod session;

#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

pub use chat::Conversation;
pub use domain::{AccessCode, ChatMessage, Entitlement, PendingRedirect, Role, Session};
pub use gate::{AccessGate, AuthDecision, GateError, GateState};
pub use ports::{
    ChatBackend, ChatTransportError, EntitlementInsert, EntitlementStore, EntitlementStoreError,
    PendingRedirectStore, SessionStore, SessionStoreError,
};
pub use redirect::{resolve_post_login, Destination, InMemoryPendingRedirect, NavState};
pub use session::AuthSessionController;
