//! crates/agent_hub_core/src/redirect.rs
//!
//! Post-login redirect resolution: decides where the user lands after a
//! successful login, combining in-page navigation state with the pending
//! redirect recorded by whichever page sent the user to login.

use std::sync::Mutex;

use crate::domain::{PendingRedirect, HOME_PATH};
use crate::ports::PendingRedirectStore;

/// Navigation state carried into the login page by the redirecting page.
#[derive(Debug, Clone, Default)]
pub struct NavState {
    pub target: Option<String>,
    pub from: Option<String>,
}

/// Where to send the user after login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Same-origin path: in-app navigation replacing the login history
    /// entry.
    Internal(String),
    /// Absolute URL this application does not own: full browser
    /// navigation.
    External(String),
}

/// Resolves the post-login destination. Runs once per successful
/// authentication transition; re-running is idempotent because the
/// pending entries are cleared as soon as a target is found.
///
/// Priority: navigation-state target, then stored pending target, then
/// the `from` fallback (navigation state, stored, home).
pub fn resolve_post_login(nav: &NavState, pending: &dyn PendingRedirectStore) -> Destination {
    let stored = pending.peek();

    let target = nav
        .target
        .clone()
        .or_else(|| stored.as_ref().map(|p| p.target.clone()));

    if let Some(target) = target {
        // Clearing an already-absent entry is a no-op.
        pending.clear();
        if target.starts_with('/') {
            return Destination::Internal(target);
        }
        return Destination::External(target);
    }

    let from = nav
        .from
        .clone()
        .or_else(|| stored.map(|p| p.from))
        .unwrap_or_else(|| HOME_PATH.to_string());
    Destination::Internal(from)
}

/// Process-wide pending-redirect holder.
///
/// The explicit value object replacing ambient key-value storage: both
/// fields are recorded and cleared together.
#[derive(Default)]
pub struct InMemoryPendingRedirect {
    slot: Mutex<Option<PendingRedirect>>,
}

impl InMemoryPendingRedirect {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<PendingRedirect>> {
        self.slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PendingRedirectStore for InMemoryPendingRedirect {
    fn record(&self, pending: PendingRedirect) {
        *self.slot() = Some(pending);
    }

    fn peek(&self) -> Option<PendingRedirect> {
        self.slot().clone()
    }

    fn clear(&self) {
        *self.slot() = None;
    }
}
