//! services/hub/src/adapters/session_gotrue.rs
//!
//! This module contains the adapter for the hosted identity service's
//! GoTrue-style auth API. It implements the `SessionStore` port from the
//! `core` crate over plain HTTP.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use url::Url;

use agent_hub_core::ports::{SessionStore, SessionStoreError, SessionTokens, StoredSession};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `SessionStore` port against a
/// GoTrue-style auth API (`/otp`, `/token`, `/user`, `/logout`).
///
/// The push-style change feed is not available over plain HTTP, so the
/// port's default empty stream applies; the hub re-queries per request.
#[derive(Clone)]
pub struct GoTrueSessionAdapter {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl GoTrueSessionAdapter {
    /// Creates a new `GoTrueSessionAdapter`. `base_url` must end with a
    /// trailing slash for endpoint joining.
    pub fn new(http: reqwest::Client, base_url: Url, api_key: String) -> Self {
        Self {
            http,
            base_url,
            api_key,
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, SessionStoreError> {
        self.base_url
            .join(path)
            .map_err(|e| SessionStoreError::Query(e.to_string()))
    }
}

//=========================================================================================
// Wire Payloads
//=========================================================================================

#[derive(Serialize)]
struct OtpRequest<'a> {
    email: &'a str,
    create_user: bool,
}

#[derive(Serialize)]
struct ExchangeRequest<'a> {
    auth_code: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
}

#[derive(Deserialize)]
struct UserResponse {
    email: Option<String>,
}

//=========================================================================================
// `SessionStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl SessionStore for GoTrueSessionAdapter {
    async fn send_magic_link(
        &self,
        email: &str,
        redirect_url: &Url,
    ) -> Result<(), SessionStoreError> {
        let response = self
            .http
            .post(self.endpoint("otp")?)
            .header("apikey", &self.api_key)
            .query(&[("redirect_to", redirect_url.as_str())])
            .json(&OtpRequest {
                email,
                create_user: true,
            })
            .send()
            .await
            .map_err(|e| SessionStoreError::Delivery(e.to_string()))?;

        if !response.status().is_success() {
            // Invalid domain, rate limit or provider outage: all retryable.
            return Err(SessionStoreError::Delivery(format!(
                "provider responded with {}",
                response.status()
            )));
        }
        Ok(())
    }

    async fn exchange_code(&self, code: &str) -> Result<SessionTokens, SessionStoreError> {
        let mut url = self.endpoint("token")?;
        url.query_pairs_mut().append_pair("grant_type", "pkce");

        let response = self
            .http
            .post(url)
            .header("apikey", &self.api_key)
            .json(&ExchangeRequest { auth_code: code })
            .send()
            .await
            .map_err(|e| SessionStoreError::Exchange(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SessionStoreError::Exchange(format!(
                "provider responded with {}",
                response.status()
            )));
        }

        let tokens: TokenResponse = response
            .json()
            .await
            .map_err(|e| SessionStoreError::Exchange(e.to_string()))?;
        Ok(SessionTokens {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        })
    }

    async fn session_for(
        &self,
        access_token: &str,
    ) -> Result<Option<StoredSession>, SessionStoreError> {
        let response = self
            .http
            .get(self.endpoint("user")?)
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| SessionStoreError::Query(e.to_string()))?;

        // An expired or revoked token is "no session", not an error.
        if response.status() == StatusCode::UNAUTHORIZED
            || response.status() == StatusCode::FORBIDDEN
        {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(SessionStoreError::Query(format!(
                "provider responded with {}",
                response.status()
            )));
        }

        let user: UserResponse = response
            .json()
            .await
            .map_err(|e| SessionStoreError::Query(e.to_string()))?;
        Ok(Some(StoredSession { email: user.email }))
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), SessionStoreError> {
        let response = self
            .http
            .post(self.endpoint("logout")?)
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| SessionStoreError::SignOut(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SessionStoreError::SignOut(format!(
                "provider responded with {}",
                response.status()
            )));
        }
        Ok(())
    }
}
