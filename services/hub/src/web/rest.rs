//! services/hub/src/web/rest.rs
//!
//! The catalog endpoint and the master definition for the OpenAPI
//! specification.

use axum::Json;
use utoipa::OpenApi;

use crate::catalog::{Agent, AGENTS};
use crate::web::auth;
use crate::web::livro;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        list_agents_handler,
        auth::magic_link_handler,
        auth::callback_handler,
        auth::session_handler,
        auth::logout_handler,
        livro::access_handler,
        livro::redeem_handler,
        livro::chat_handler,
    ),
    components(
        schemas(
            Agent,
            crate::catalog::AgentIcon,
            auth::MagicLinkRequest,
            auth::MagicLinkResponse,
            auth::SessionResponse,
            livro::AccessResponse,
            livro::RedeemRequest,
            livro::ChatRequest,
            livro::ChatMessageDto,
            livro::ChatResponse,
        )
    ),
    tags(
        (name = "Agent Hub API", description = "Catalog, magic-link auth and the gated e-book chat.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// GET /agents - The hub's agent catalog
#[utoipa::path(
    get,
    path = "/agents",
    responses(
        (status = 200, description = "The agent catalog", body = [Agent])
    )
)]
pub async fn list_agents_handler() -> Json<&'static [Agent]> {
    Json(AGENTS)
}
