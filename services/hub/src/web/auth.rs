//! services/hub/src/web/auth.rs
//!
//! Authentication endpoints: magic-link request, callback code exchange,
//! session inspection and logout.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Redirect},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, warn};
use utoipa::ToSchema;

use agent_hub_core::domain::{HOME_PATH, LOGIN_PATH};

use crate::web::middleware::{session_token, SESSION_COOKIE};
use crate::web::state::AppState;

/// Shown when the magic-link send fails; the user retries by resubmitting.
const SEND_FAILED_TEXT: &str = "Não foi possível enviar o link. Tente novamente.";
/// Shown when the callback's code exchange fails.
const CALLBACK_FAILED_TEXT: &str = "Não foi possível concluir o login. Tente novamente.";

// Thirty days, matching the identity service's default refresh window.
const SESSION_COOKIE_MAX_AGE_SECS: i64 = 30 * 24 * 60 * 60;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct MagicLinkRequest {
    pub email: String,
}

#[derive(Serialize, ToSchema)]
pub struct MagicLinkResponse {
    pub sent: bool,
}

#[derive(Deserialize)]
pub struct CallbackParams {
    pub code: String,
}

#[derive(Serialize, ToSchema)]
pub struct SessionResponse {
    pub email: Option<String>,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/magic-link - Send a passwordless login link
///
/// The link returns the user to this hub's `/login` path. The stored
/// session is untouched; the front-end moves to its "check your email"
/// state on success.
#[utoipa::path(
    post,
    path = "/auth/magic-link",
    request_body = MagicLinkRequest,
    responses(
        (status = 200, description = "Link sent", body = MagicLinkResponse),
        (status = 502, description = "Delivery failed, user should retry")
    )
)]
pub async fn magic_link_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MagicLinkRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let redirect_url = state.config.public_url.join(LOGIN_PATH).map_err(|e| {
        error!("Failed to build login redirect URL: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, SEND_FAILED_TEXT.to_string())
    })?;

    state
        .sessions
        .send_magic_link(&req.email, &redirect_url)
        .await
        .map_err(|e| {
            error!("Failed to send magic link: {:?}", e);
            (StatusCode::BAD_GATEWAY, SEND_FAILED_TEXT.to_string())
        })?;

    Ok(Json(MagicLinkResponse { sent: true }))
}

/// GET /auth/callback - Magic-link landing: exchange the one-time code
/// for a session
#[utoipa::path(
    get,
    path = "/auth/callback",
    responses(
        (status = 303, description = "Session established, redirecting home"),
        (status = 401, description = "Code exchange failed")
    )
)]
pub async fn callback_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallbackParams>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let tokens = state
        .sessions
        .exchange_code(&params.code)
        .await
        .map_err(|e| {
            error!("Failed to exchange auth code: {:?}", e);
            (StatusCode::UNAUTHORIZED, CALLBACK_FAILED_TEXT.to_string())
        })?;

    let cookie = format!(
        "{}={}; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age={}",
        SESSION_COOKIE, tokens.access_token, SESSION_COOKIE_MAX_AGE_SECS
    );

    Ok((
        [(header::SET_COOKIE, cookie)],
        Redirect::to(HOME_PATH),
    ))
}

/// GET /auth/session - The current session snapshot
///
/// Public: an anonymous visitor gets `{"email": null}`. A store query
/// failure reads the same way - never authenticated-by-accident.
#[utoipa::path(
    get,
    path = "/auth/session",
    responses(
        (status = 200, description = "Current session", body = SessionResponse)
    )
)]
pub async fn session_handler(
    State(state): State<Arc<AppState>>,
    headers: axum::http::HeaderMap,
) -> Json<SessionResponse> {
    let email = match session_token(&headers) {
        Some(token) => match state.sessions.session_for(token).await {
            Ok(stored) => stored.and_then(|s| s.email),
            Err(e) => {
                warn!("Session query failed, treating as logged out: {:?}", e);
                None
            }
        },
        None => None,
    };
    Json(SessionResponse { email })
}

/// POST /auth/logout - Terminate the session
///
/// Public on purpose: even a stale or unknown cookie gets cleared. The
/// remote sign-out is best effort; local state goes unconditionally.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logged out")
    )
)]
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    headers: axum::http::HeaderMap,
) -> impl IntoResponse {
    if let Some(token) = session_token(&headers) {
        if let Err(e) = state.sessions.sign_out(token).await {
            warn!("Remote sign-out failed, clearing local session anyway: {:?}", e);
        }
        state.forget_conversation(token);
    }

    let cookie = format!(
        "{}=; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age=0",
        SESSION_COOKIE
    );
    (StatusCode::OK, [(header::SET_COOKIE, cookie)])
}
