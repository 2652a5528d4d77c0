//! services/hub/src/web/livro.rs
//!
//! The gated e-book chat endpoints: gate status, code redemption and
//! chat turns. All three sit behind the auth middleware and delegate the
//! gating decisions to the core gate functions.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;

use agent_hub_core::domain::Role;
use agent_hub_core::gate::{entitlement_unlocked, redeem_code, GateError};

use crate::web::middleware::CurrentUser;
use crate::web::state::AppState;

const NOT_UNLOCKED_TEXT: &str = "Acesso ao e-book não liberado.";

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum AccessResponse {
    /// The email already holds an entitlement; the chat is available.
    Unlocked,
    /// A code is required. The email is echoed for the read-only field on
    /// the code form.
    CodeRequired { email: String },
}

#[derive(Deserialize, ToSchema)]
pub struct RedeemRequest {
    pub code: String,
}

#[derive(Deserialize, ToSchema)]
pub struct ChatRequest {
    pub pergunta: String,
}

#[derive(Serialize, ToSchema)]
pub struct ChatMessageDto {
    pub role: &'static str,
    pub text: String,
}

#[derive(Serialize, ToSchema)]
pub struct ChatResponse {
    pub messages: Vec<ChatMessageDto>,
}

fn role_name(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant => "assistant",
    }
}

fn gate_error_status(err: GateError) -> StatusCode {
    match err {
        GateError::EmptyCode | GateError::InvalidCode => StatusCode::UNPROCESSABLE_ENTITY,
        GateError::MissingEmail => StatusCode::UNAUTHORIZED,
        // Lookup failed; the user retries the same code.
        GateError::Validation => StatusCode::BAD_GATEWAY,
        GateError::WriteBlocked => StatusCode::FORBIDDEN,
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// GET /livro/access - Gate status for the current user
///
/// Fail-closed: an entitlement store error reads as "code required",
/// never as unlocked.
#[utoipa::path(
    get,
    path = "/livro/access",
    responses(
        (status = 200, description = "Gate status", body = AccessResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn access_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Json<AccessResponse> {
    if entitlement_unlocked(state.entitlements.as_ref(), &user.email).await {
        Json(AccessResponse::Unlocked)
    } else {
        Json(AccessResponse::CodeRequired { email: user.email })
    }
}

/// POST /livro/code - Redeem an access code for the current user
///
/// Blank codes fail locally; an entitlement that already exists counts
/// as success; any other write failure leaves the code unconsumed.
#[utoipa::path(
    post,
    path = "/livro/code",
    request_body = RedeemRequest,
    responses(
        (status = 200, description = "Access granted", body = AccessResponse),
        (status = 422, description = "Empty or invalid code"),
        (status = 502, description = "Code lookup failed, retry"),
        (status = 403, description = "Entitlement write blocked")
    )
)]
pub async fn redeem_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<RedeemRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    redeem_code(state.entitlements.as_ref(), &user.email, &req.code)
        .await
        .map_err(|e| {
            error!("Code redemption failed for {}: {:?}", user.email, e);
            (gate_error_status(e), e.to_string())
        })?;

    Ok(Json(AccessResponse::Unlocked))
}

/// POST /livro/chat - One chat turn
///
/// Re-checks the entitlement on every turn (fail-closed), appends the
/// question to the session's conversation, calls the webhook and returns
/// the full transcript. Transport failures surface as the fixed
/// placeholder assistant message, not as an HTTP error.
#[utoipa::path(
    post,
    path = "/livro/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Updated transcript", body = ChatResponse),
        (status = 403, description = "No entitlement for this email"),
        (status = 422, description = "Blank question")
    )
)]
pub async fn chat_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<ChatRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if !entitlement_unlocked(state.entitlements.as_ref(), &user.email).await {
        return Err((StatusCode::FORBIDDEN, NOT_UNLOCKED_TEXT.to_string()));
    }

    let conversation = state.conversation_for(&user.access_token);
    let mut conversation = conversation.lock().await;

    if !conversation.send(&req.pergunta).await {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            "Digite sua dúvida.".to_string(),
        ));
    }

    let messages = conversation
        .messages()
        .iter()
        .map(|m| ChatMessageDto {
            role: role_name(m.role),
            text: m.text.clone(),
        })
        .collect();

    Ok(Json(ChatResponse { messages }))
}
