//! services/hub/src/error.rs
//!
//! Defines the primary error type for the entire hub service.

use crate::config::ConfigError;
use agent_hub_core::ports::{EntitlementStoreError, SessionStoreError};

/// The primary error type for the `hub` service.
#[derive(Debug, thiserror::Error)]
pub enum HubError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from the session store port.
    #[error("Session store error: {0}")]
    Session(#[from] SessionStoreError),

    /// Represents an error that propagated up from the entitlement store port.
    #[error("Entitlement store error: {0}")]
    Entitlement(#[from] EntitlementStoreError),

    /// Represents an error from the underlying database library.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Represents an error from database migrations at startup.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}
