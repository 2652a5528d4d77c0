//! HTTP-level tests for the auth and e-book gate endpoints, with the mock
//! collaborators from `agent_hub_core` standing in for the hosted
//! services.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use http_body_util::BodyExt;
use tower::ServiceExt;
use tracing::Level;
use url::Url;

use agent_hub_core::mocks::{MockChatBackend, MockEntitlementStore, MockSessionStore};
use agent_hub_core::ports::{ChatBackend, EntitlementStore, SessionStore};
use hub_lib::config::Config;
use hub_lib::web::{
    access_handler, chat_handler, list_agents_handler, logout_handler, magic_link_handler,
    redeem_handler, require_auth, session_handler, state::AppState,
};

struct TestHub {
    app: Router,
    sessions: Arc<MockSessionStore>,
    entitlements: Arc<MockEntitlementStore>,
    chat: Arc<MockChatBackend>,
}

fn test_config() -> Config {
    Config {
        bind_address: "127.0.0.1:0".parse().unwrap(),
        database_url: String::new(),
        log_level: Level::INFO,
        public_url: Url::parse("https://hub.example.com").unwrap(),
        auth_api_url: Url::parse("https://auth.example.com/auth/v1/").unwrap(),
        auth_api_key: "anon-key".to_string(),
        chat_webhook_url: Url::parse("https://chat.example.com/webhook").unwrap(),
    }
}

fn test_hub() -> TestHub {
    let sessions = Arc::new(MockSessionStore::new());
    let entitlements = Arc::new(MockEntitlementStore::new());
    let chat = Arc::new(MockChatBackend::new());

    let state = Arc::new(AppState::new(
        Arc::clone(&sessions) as Arc<dyn SessionStore>,
        Arc::clone(&entitlements) as Arc<dyn EntitlementStore>,
        Arc::clone(&chat) as Arc<dyn ChatBackend>,
        Arc::new(test_config()),
    ));

    let public = Router::new()
        .route("/agents", get(list_agents_handler))
        .route("/auth/magic-link", post(magic_link_handler))
        .route("/auth/session", get(session_handler))
        .route("/auth/logout", post(logout_handler));
    let protected = Router::new()
        .route("/livro/access", get(access_handler))
        .route("/livro/code", post(redeem_handler))
        .route("/livro/chat", post(chat_handler))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    TestHub {
        app: Router::new().merge(public).merge(protected).with_state(state),
        sessions,
        entitlements,
        chat,
    }
}

fn authed_get(path: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .header(header::COOKIE, "hub_session=tok-1")
        .body(Body::empty())
        .unwrap()
}

fn authed_post_json(path: &str, json: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header(header::COOKIE, "hub_session=tok-1")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn protected_routes_reject_anonymous_requests() {
    let hub = test_hub();

    let response = hub
        .app
        .oneshot(Request::builder().uri("/livro/access").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn a_session_query_failure_reads_as_unauthenticated() {
    let hub = test_hub();
    hub.sessions.put_session("tok-1", Some("a@x.com"));
    hub.sessions.fail_query(true);

    let response = hub.app.oneshot(authed_get("/livro/access")).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn access_without_entitlement_requires_a_code_and_echoes_the_email() {
    let hub = test_hub();
    hub.sessions.put_session("tok-1", Some("a@x.com"));

    let response = hub.app.oneshot(authed_get("/livro/access")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({ "status": "code_required", "email": "a@x.com" })
    );
}

#[tokio::test]
async fn access_with_entitlement_is_unlocked() {
    let hub = test_hub();
    hub.sessions.put_session("tok-1", Some("a@x.com"));
    hub.entitlements.grant("a@x.com");

    let response = hub.app.oneshot(authed_get("/livro/access")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({ "status": "unlocked" })
    );
}

#[tokio::test]
async fn entitlement_store_errors_fail_closed_at_the_endpoint() {
    let hub = test_hub();
    hub.sessions.put_session("tok-1", Some("a@x.com"));
    hub.entitlements.grant("a@x.com");
    hub.entitlements.fail_find(true);

    let response = hub.app.oneshot(authed_get("/livro/access")).await.unwrap();

    assert_eq!(
        body_json(response).await["status"],
        serde_json::json!("code_required")
    );
}

#[tokio::test]
async fn redeeming_a_valid_code_unlocks_and_persists_the_entitlement() {
    let hub = test_hub();
    hub.sessions.put_session("tok-1", Some("a@x.com"));
    hub.entitlements.add_code("ABC123", true);

    let response = hub
        .app
        .oneshot(authed_post_json(
            "/livro/code",
            serde_json::json!({ "code": "ABC123" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({ "status": "unlocked" })
    );
    assert!(hub.entitlements.is_entitled("a@x.com"));
}

#[tokio::test]
async fn an_unknown_code_returns_the_invalid_code_message() {
    let hub = test_hub();
    hub.sessions.put_session("tok-1", Some("a@x.com"));

    let response = hub
        .app
        .oneshot(authed_post_json(
            "/livro/code",
            serde_json::json!({ "code": "ZZZ" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body_text(response).await,
        "Código inválido (ou desativado). Confira e tente de novo."
    );
}

#[tokio::test]
async fn chat_is_forbidden_without_an_entitlement() {
    let hub = test_hub();
    hub.sessions.put_session("tok-1", Some("a@x.com"));

    let response = hub
        .app
        .oneshot(authed_post_json(
            "/livro/chat",
            serde_json::json!({ "pergunta": "Olá?" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn a_chat_turn_returns_the_growing_transcript() {
    let hub = test_hub();
    hub.sessions.put_session("tok-1", Some("a@x.com"));
    hub.entitlements.grant("a@x.com");
    hub.chat.push_reply("O capítulo 3 trata disso.");

    let response = hub
        .app
        .oneshot(authed_post_json(
            "/livro/chat",
            serde_json::json!({ "pergunta": "O que diz o capítulo 3?" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let messages = body["messages"].as_array().unwrap();
    // Greeting, question, answer.
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1]["role"], "user");
    assert_eq!(messages[1]["text"], "O que diz o capítulo 3?");
    assert_eq!(messages[2]["text"], "O capítulo 3 trata disso.");
}

#[tokio::test]
async fn a_webhook_failure_becomes_the_placeholder_assistant_message() {
    let hub = test_hub();
    hub.sessions.put_session("tok-1", Some("a@x.com"));
    hub.entitlements.grant("a@x.com");
    hub.chat.push_failure();

    let response = hub
        .app
        .oneshot(authed_post_json(
            "/livro/chat",
            serde_json::json!({ "pergunta": "Alguém aí?" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(
        messages.last().unwrap()["text"],
        "Falha de conexão com o servidor. Tente novamente."
    );
}

#[tokio::test]
async fn the_session_endpoint_fails_closed_on_store_errors() {
    let hub = test_hub();
    hub.sessions.put_session("tok-1", Some("a@x.com"));
    hub.sessions.fail_query(true);

    let response = hub.app.oneshot(authed_get("/auth/session")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, serde_json::json!({ "email": null }));
}

#[tokio::test]
async fn logout_clears_the_cookie_even_when_the_remote_call_fails() {
    let hub = test_hub();
    hub.sessions.put_session("tok-1", Some("a@x.com"));
    hub.sessions.fail_sign_out(true);

    let response = hub
        .app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/logout")
                .header(header::COOKIE, "hub_session=tok-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(set_cookie.starts_with("hub_session=;"));
    assert!(set_cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn a_failed_magic_link_send_is_a_retryable_gateway_error() {
    let hub = test_hub();
    hub.sessions.fail_delivery(true);

    let response = hub
        .app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/magic-link")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::json!({ "email": "a@x.com" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(
        body_text(response).await,
        "Não foi possível enviar o link. Tente novamente."
    );
}

#[tokio::test]
async fn the_catalog_lists_the_ebook_agent_first() {
    let hub = test_hub();

    let response = hub
        .app
        .oneshot(Request::builder().uri("/agents").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let agents = body.as_array().unwrap();
    assert_eq!(agents[0]["id"], "ai-ebook");
    assert_eq!(agents[0]["url"], "/livro");
}
