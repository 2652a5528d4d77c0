//! services/hub/src/web/state.rs
//!
//! Defines the application's shared state and the per-session chat state.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use agent_hub_core::ports::{ChatBackend, EntitlementStore, SessionStore};
use agent_hub_core::Conversation;

use crate::config::Config;

/// The shared application state, created once at startup and passed to all handlers.
pub struct AppState {
    pub sessions: Arc<dyn SessionStore>,
    pub entitlements: Arc<dyn EntitlementStore>,
    pub chat: Arc<dyn ChatBackend>,
    pub config: Arc<Config>,
    /// One conversation per auth session, keyed by the session cookie's
    /// access token. Dropped on logout, otherwise lives as long as the
    /// process.
    conversations: Mutex<HashMap<String, Arc<tokio::sync::Mutex<Conversation>>>>,
}

impl AppState {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        entitlements: Arc<dyn EntitlementStore>,
        chat: Arc<dyn ChatBackend>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            sessions,
            entitlements,
            chat,
            config,
            conversations: Mutex::new(HashMap::new()),
        }
    }

    /// The conversation bound to one auth session, created (with its
    /// greeting) on first use. The per-conversation async mutex is the
    /// single-flight guard: one in-flight send per session.
    pub fn conversation_for(&self, session_key: &str) -> Arc<tokio::sync::Mutex<Conversation>> {
        let mut map = self
            .conversations
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(
            map.entry(session_key.to_string())
                .or_insert_with(|| {
                    Arc::new(tokio::sync::Mutex::new(Conversation::new(Arc::clone(
                        &self.chat,
                    ))))
                }),
        )
    }

    /// Drops the conversation for a session, e.g. on logout.
    pub fn forget_conversation(&self, session_key: &str) {
        self.conversations
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(session_key);
    }
}
