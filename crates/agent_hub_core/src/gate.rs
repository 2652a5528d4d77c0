//! crates/agent_hub_core/src/gate.rs
//!
//! The e-book chat access gate: given an authenticated session, decides
//! whether the user may use the chat, accepting a one-time access code and
//! creating a permanent entitlement on success.

use std::sync::Arc;

use crate::domain::{PendingRedirect, Session, HOME_PATH, LIVRO_PATH};
use crate::ports::{EntitlementInsert, EntitlementStore, PendingRedirectStore};

/// Gate states, in visit order. There is no downgrade path from
/// `Unlocked` within a gate's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    CheckingAuth,
    CheckingEntitlement,
    CodeRequired,
    Unlocked,
}

/// Outcome of the authentication step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthDecision {
    /// Unauthenticated: the caller must route to login. The pending
    /// redirect back to the chat page has already been recorded.
    RedirectToLogin,
    /// Authenticated: proceed to the entitlement check.
    Proceed,
}

/// User-visible gate failures. Every variant leaves the gate in a
/// retryable state; none consumes the submitted code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    #[error("Digite o código do e-book.")]
    EmptyCode,
    #[error("Não consegui validar o código agora. Tente novamente.")]
    Validation,
    #[error("Código inválido (ou desativado). Confira e tente de novo.")]
    InvalidCode,
    #[error("Não consegui identificar seu e-mail. Faça login novamente.")]
    MissingEmail,
    #[error("Seu código está correto, mas o sistema não conseguiu liberar seu acesso (bloqueio de permissão).")]
    WriteBlocked,
}

/// The per-visit gating state machine for the e-book chat page.
pub struct AccessGate {
    entitlements: Arc<dyn EntitlementStore>,
    state: GateState,
    email: Option<String>,
}

impl AccessGate {
    pub fn new(entitlements: Arc<dyn EntitlementStore>) -> Self {
        Self {
            entitlements,
            state: GateState::CheckingAuth,
            email: None,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    /// The session email shown read-only on the code form.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Resolves the authentication step. For an unauthenticated session the
    /// pending redirect (target `/livro`, from `/`) is recorded before the
    /// caller routes to login.
    pub fn resolve_auth(
        &mut self,
        session: &Session,
        pending: &dyn PendingRedirectStore,
    ) -> AuthDecision {
        if !session.is_authenticated() {
            pending.record(PendingRedirect {
                target: LIVRO_PATH.to_string(),
                from: HOME_PATH.to_string(),
            });
            return AuthDecision::RedirectToLogin;
        }
        self.email = session.email.clone();
        self.state = GateState::CheckingEntitlement;
        AuthDecision::Proceed
    }

    /// Queries the entitlement store for the session email. Any query
    /// error, including a permission denial, reads as "not entitled" -
    /// the gate fails closed.
    pub async fn check_entitlement(&mut self) -> GateState {
        if self.state != GateState::CheckingEntitlement {
            return self.state;
        }
        let entitled = match self.email.as_deref() {
            Some(email) => entitlement_unlocked(self.entitlements.as_ref(), email).await,
            None => false,
        };
        self.state = if entitled {
            GateState::Unlocked
        } else {
            GateState::CodeRequired
        };
        self.state
    }

    /// Validates a submitted access code and, on success, creates the
    /// entitlement and unlocks the gate.
    ///
    /// Blank input fails locally without touching the store. Once
    /// unlocked, further submissions are no-ops.
    pub async fn submit_code(&mut self, raw_code: &str) -> Result<GateState, GateError> {
        match self.state {
            GateState::Unlocked => return Ok(self.state),
            GateState::CodeRequired => {}
            _ => return Err(GateError::Validation),
        }

        let email = self.email.clone().ok_or(GateError::MissingEmail)?;
        redeem_code(self.entitlements.as_ref(), &email, raw_code).await?;
        self.state = GateState::Unlocked;
        Ok(self.state)
    }
}

/// Whether `email` already holds an entitlement. Fails closed: a query
/// error reads as "not entitled".
pub async fn entitlement_unlocked(store: &dyn EntitlementStore, email: &str) -> bool {
    matches!(store.find_entitlement(email).await, Ok(Some(_)))
}

/// Validates `raw_code` and records an entitlement for `email`.
///
/// An entitlement that already exists (e.g. two tabs redeeming
/// concurrently) is success. Any other write failure is surfaced and the
/// code is not considered consumed.
pub async fn redeem_code(
    store: &dyn EntitlementStore,
    email: &str,
    raw_code: &str,
) -> Result<(), GateError> {
    let code = raw_code.trim();
    if code.is_empty() {
        return Err(GateError::EmptyCode);
    }

    let found = store
        .find_active_access_code(code)
        .await
        .map_err(|_| GateError::Validation)?;
    if found.is_none() {
        return Err(GateError::InvalidCode);
    }

    if email.is_empty() {
        return Err(GateError::MissingEmail);
    }

    match store.insert_entitlement(email).await {
        Ok(EntitlementInsert::Created) | Ok(EntitlementInsert::AlreadyEntitled) => Ok(()),
        Err(_) => Err(GateError::WriteBlocked),
    }
}
