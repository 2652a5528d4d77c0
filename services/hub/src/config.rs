//! services/hub/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use tracing::Level;
use url::Url;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub log_level: Level,
    /// Public origin of the hub; magic links return the user to
    /// `{public_url}/login`.
    pub public_url: Url,
    /// Base URL of the hosted identity service's auth API.
    pub auth_api_url: Url,
    /// Publishable API key sent with every identity-service request.
    pub auth_api_key: String,
    /// The e-book chat webhook endpoint.
    pub chat_webhook_url: Url,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server and Database Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingVar("DATABASE_URL".to_string()))?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Load Collaborator Endpoints ---
        let public_url = parse_url_var("PUBLIC_URL", "http://localhost:3000")?;
        let auth_api_url = required_url_var("AUTH_API_URL")?;
        let auth_api_key = std::env::var("AUTH_API_KEY")
            .map_err(|_| ConfigError::MissingVar("AUTH_API_KEY".to_string()))?;
        let chat_webhook_url = parse_url_var(
            "CHAT_WEBHOOK_URL",
            "https://dczanardi.app.n8n.cloud/webhook/chat-livro",
        )?;

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            public_url,
            auth_api_url,
            auth_api_key,
            chat_webhook_url,
        })
    }
}

fn parse_url_var(name: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(name).unwrap_or_else(|_| default.to_string());
    raw.parse::<Url>()
        .map_err(|e| ConfigError::InvalidValue(name.to_string(), e.to_string()))
}

fn required_url_var(name: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(name).map_err(|_| ConfigError::MissingVar(name.to_string()))?;
    raw.parse::<Url>()
        .map_err(|e| ConfigError::InvalidValue(name.to_string(), e.to_string()))
}
