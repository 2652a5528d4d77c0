//! services/hub/src/adapters/chat_webhook.rs
//!
//! This module contains the adapter for the e-book chat webhook. It
//! implements the `ChatBackend` port from the `core` crate: one JSON POST
//! per question, no auth header, no retry, no streaming.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use agent_hub_core::ports::{ChatBackend, ChatTransportError};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `ChatBackend` port against the fixed
/// webhook endpoint.
#[derive(Clone)]
pub struct WebhookChatAdapter {
    http: reqwest::Client,
    url: Url,
}

impl WebhookChatAdapter {
    /// Creates a new `WebhookChatAdapter`.
    pub fn new(http: reqwest::Client, url: Url) -> Self {
        Self { http, url }
    }
}

//=========================================================================================
// Wire Payloads
//=========================================================================================

#[derive(Serialize)]
struct QuestionPayload<'a> {
    pergunta: &'a str,
}

#[derive(Deserialize)]
struct AnswerPayload {
    text: Option<String>,
}

//=========================================================================================
// `ChatBackend` Trait Implementation
//=========================================================================================

#[async_trait]
impl ChatBackend for WebhookChatAdapter {
    async fn ask(&self, pergunta: &str) -> Result<Option<String>, ChatTransportError> {
        let response = self
            .http
            .post(self.url.clone())
            .json(&QuestionPayload { pergunta })
            .send()
            .await
            .map_err(|e| ChatTransportError(e.to_string()))?;

        // A non-JSON body or a failed request both count as transport
        // failures; the caller renders the fixed placeholder.
        let answer: AnswerPayload = response
            .json()
            .await
            .map_err(|e| ChatTransportError(e.to_string()))?;

        Ok(answer.text)
    }
}
