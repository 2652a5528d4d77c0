//! services/hub/src/adapters/entitlement_db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `EntitlementStore` port from the `core` crate. It handles all interactions
//! with the PostgreSQL tables using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use agent_hub_core::domain::{AccessCode, Entitlement};
use agent_hub_core::ports::{EntitlementInsert, EntitlementStore, EntitlementStoreError};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `EntitlementStore` port.
#[derive(Clone)]
pub struct EntitlementDbAdapter {
    pool: PgPool,
}

impl EntitlementDbAdapter {
    /// Creates a new `EntitlementDbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct EntitlementRecord {
    email: String,
    #[allow(dead_code)]
    created_at: DateTime<Utc>,
}
impl EntitlementRecord {
    fn to_domain(self) -> Entitlement {
        Entitlement { email: self.email }
    }
}

#[derive(FromRow)]
struct AccessCodeRecord {
    code: String,
    is_active: bool,
}
impl AccessCodeRecord {
    fn to_domain(self) -> AccessCode {
        AccessCode {
            code: self.code,
            is_active: self.is_active,
        }
    }
}

/// SQLSTATE 23505: unique constraint violation. This is the one place the
/// backend-specific duplicate detection lives; the gate only ever sees
/// `EntitlementInsert::AlreadyEntitled`.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505")
    )
}

//=========================================================================================
// `EntitlementStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl EntitlementStore for EntitlementDbAdapter {
    async fn find_entitlement(
        &self,
        email: &str,
    ) -> Result<Option<Entitlement>, EntitlementStoreError> {
        let record = sqlx::query_as::<_, EntitlementRecord>(
            "SELECT email, created_at FROM ebook_entitlements WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| EntitlementStoreError::Query(e.to_string()))?;

        Ok(record.map(EntitlementRecord::to_domain))
    }

    async fn insert_entitlement(
        &self,
        email: &str,
    ) -> Result<EntitlementInsert, EntitlementStoreError> {
        let result = sqlx::query("INSERT INTO ebook_entitlements (email) VALUES ($1)")
            .bind(email)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(EntitlementInsert::Created),
            Err(e) if is_unique_violation(&e) => Ok(EntitlementInsert::AlreadyEntitled),
            Err(e) => Err(EntitlementStoreError::Write(e.to_string())),
        }
    }

    async fn find_active_access_code(
        &self,
        code: &str,
    ) -> Result<Option<AccessCode>, EntitlementStoreError> {
        let record = sqlx::query_as::<_, AccessCodeRecord>(
            "SELECT code, is_active FROM ebook_access_codes WHERE code = $1 AND is_active = TRUE",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| EntitlementStoreError::Query(e.to_string()))?;

        Ok(record.map(AccessCodeRecord::to_domain))
    }
}
