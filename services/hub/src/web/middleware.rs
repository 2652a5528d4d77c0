//! services/hub/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::error;

use crate::web::state::AppState;

/// Name of the cookie carrying the identity service's access token.
pub const SESSION_COOKIE: &str = "hub_session";

/// The authenticated user, inserted into request extensions by
/// [`require_auth`].
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub email: String,
    pub access_token: String,
}

/// Extracts the session access token from the request cookies.
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    let cookie_header = headers.get(header::COOKIE).and_then(|v| v.to_str().ok())?;
    cookie_header.split(';').find_map(|c| {
        let c = c.trim();
        c.strip_prefix(SESSION_COOKIE)?.strip_prefix('=')
    })
}

/// Middleware that validates the session cookie against the session store
/// and extracts the user's email.
///
/// If valid, inserts a [`CurrentUser`] into request extensions for handlers
/// to use. Missing cookie, unknown token, sessions without an email and
/// store query failures all read as 401 - the gate fails closed.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let access_token = session_token(req.headers())
        .ok_or(StatusCode::UNAUTHORIZED)?
        .to_string();

    let stored = state
        .sessions
        .session_for(&access_token)
        .await
        .map_err(|e| {
            error!("Failed to validate session: {:?}", e);
            StatusCode::UNAUTHORIZED
        })?;

    let email = stored
        .and_then(|s| s.email)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    req.extensions_mut().insert(CurrentUser {
        email,
        access_token,
    });

    Ok(next.run(req).await)
}
