//! services/hub/src/bin/hub.rs

use hub_lib::{
    adapters::{EntitlementDbAdapter, GoTrueSessionAdapter, WebhookChatAdapter},
    config::Config,
    error::HubError,
    web::{
        access_handler, callback_handler, chat_handler, list_agents_handler, logout_handler,
        magic_link_handler, redeem_handler, require_auth, rest::ApiDoc, session_handler,
        state::AppState,
    },
};

use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), HubError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect to Database & Run Migrations ---
    info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    let entitlement_adapter = Arc::new(EntitlementDbAdapter::new(db_pool.clone()));
    info!("Running database migrations...");
    entitlement_adapter.run_migrations().await?;
    info!("Database migrations complete.");

    // --- 3. Initialize Collaborator Adapters ---
    let http = reqwest::Client::new();
    let session_adapter = Arc::new(GoTrueSessionAdapter::new(
        http.clone(),
        config.auth_api_url.clone(),
        config.auth_api_key.clone(),
    ));
    let chat_adapter = Arc::new(WebhookChatAdapter::new(
        http,
        config.chat_webhook_url.clone(),
    ));

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState::new(
        session_adapter,
        entitlement_adapter,
        chat_adapter,
        config.clone(),
    ));

    let cors_origin = config
        .public_url
        .origin()
        .ascii_serialization()
        .parse::<HeaderValue>()
        .map_err(|e| HubError::Internal(format!("Invalid PUBLIC_URL origin: {e}")))?;
    let cors = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // --- 5. Create the Web Router ---
    // Public routes (no auth required). Logout stays public so even a
    // stale cookie gets cleared.
    let public_routes = Router::new()
        .route("/agents", get(list_agents_handler))
        .route("/auth/magic-link", post(magic_link_handler))
        .route("/auth/callback", get(callback_handler))
        .route("/auth/session", get(session_handler))
        .route("/auth/logout", post(logout_handler));

    // Protected routes (auth required, fail-closed)
    let protected_routes = Router::new()
        .route("/livro/access", get(access_handler))
        .route("/livro/code", post(redeem_handler))
        .route("/livro/chat", post(chat_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    // Combine API routes
    let api_router = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
