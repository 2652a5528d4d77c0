//! Mock collaborator implementations for testing.
//!
//! Simple, in-memory implementations of the port traits, with call
//! counters so tests can assert which network round-trips happened.

pub mod chat;
pub mod entitlement;
pub mod session;

pub use chat::MockChatBackend;
pub use entitlement::MockEntitlementStore;
pub use session::MockSessionStore;
