//! SQL implementation of the registration state store
//!
//! One `registration_state` row per device installation, keyed by a fixed row
//! id. Every setter is its own UPSERT so each field is independently durable:
//! a crash between two engine steps leaves exactly the completed steps on
//! disk.

use chrono::Utc;
use pushbridge_common::models::RegistrationSnapshot;
use pushbridge_common::services::{BoxFuture, BoxedError, RegistrationStateStore};
use sqlx::Row;
use std::collections::BTreeSet;
use tracing::{debug, error, info};

use crate::client::DbClient;
use crate::error::StoreError;

/// SQL implementation of the registration state store
#[derive(Debug, Clone)]
pub struct SqlRegistrationStateStore {
    db_client: DbClient,
}

impl SqlRegistrationStateStore {
    /// Create a new SQL registration state store
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }

    /// Initialize the database schema
    ///
    /// Creates the registration state table if it does not already exist.
    pub async fn init_schema(&self) -> Result<(), StoreError> {
        debug!("Initializing registration state schema");

        let query = r#"
            CREATE TABLE IF NOT EXISTS registration_state (
                id INTEGER PRIMARY KEY,
                channel_token TEXT,
                backend_device_id TEXT,
                platform_identifier TEXT,
                platform_secret TEXT,
                device_alias TEXT,
                custom_user_id TEXT,
                server_url TEXT,
                sender_id TEXT,
                package_identity TEXT,
                app_version BIGINT,
                tags TEXT,
                updated_at TEXT
            )
        "#;

        self.db_client.execute(query).await?;

        info!("Registration state schema initialized successfully");
        Ok(())
    }

    // Column names are compile-time constants from this module, never caller
    // input, so splicing them into the statement is safe.
    fn upsert_statement(columns: &[&'static str]) -> String {
        let mut insert_cols = String::from("id");
        let mut placeholders = String::from("1");
        let mut updates = String::new();
        for (i, col) in columns.iter().enumerate() {
            insert_cols.push_str(", ");
            insert_cols.push_str(col);
            placeholders.push_str(&format!(", ${}", i + 1));
            updates.push_str(&format!("{col} = excluded.{col}, "));
        }
        let ts_placeholder = format!("${}", columns.len() + 1);
        format!(
            "INSERT INTO registration_state ({insert_cols}, updated_at) \
             VALUES ({placeholders}, {ts_placeholder}) \
             ON CONFLICT(id) DO UPDATE SET {updates}updated_at = excluded.updated_at"
        )
    }

    async fn set_text(
        &self,
        column: &'static str,
        value: Option<String>,
    ) -> Result<(), StoreError> {
        debug!(column, present = value.is_some(), "persisting registration field");

        let statement = Self::upsert_statement(&[column]);
        sqlx::query(&statement)
            .bind(value)
            .bind(Utc::now().to_rfc3339())
            .execute(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to persist registration field {}: {}", column, e);
                StoreError::QueryError(e.to_string())
            })?;
        Ok(())
    }

    async fn set_number(
        &self,
        column: &'static str,
        value: Option<i64>,
    ) -> Result<(), StoreError> {
        debug!(column, present = value.is_some(), "persisting registration field");

        let statement = Self::upsert_statement(&[column]);
        sqlx::query(&statement)
            .bind(value)
            .bind(Utc::now().to_rfc3339())
            .execute(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to persist registration field {}: {}", column, e);
                StoreError::QueryError(e.to_string())
            })?;
        Ok(())
    }

    async fn set_credentials(
        &self,
        identifier: Option<String>,
        secret: Option<String>,
    ) -> Result<(), StoreError> {
        debug!(present = identifier.is_some(), "persisting platform credentials");

        let statement = Self::upsert_statement(&["platform_identifier", "platform_secret"]);
        sqlx::query(&statement)
            .bind(identifier)
            .bind(secret)
            .bind(Utc::now().to_rfc3339())
            .execute(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to persist platform credentials: {}", e);
                StoreError::QueryError(e.to_string())
            })?;
        Ok(())
    }

    async fn load_snapshot(&self) -> Result<RegistrationSnapshot, StoreError> {
        debug!("Loading registration snapshot");

        let query = r#"
            SELECT channel_token, backend_device_id, platform_identifier,
                   platform_secret, device_alias, custom_user_id, server_url,
                   sender_id, package_identity, app_version, tags
            FROM registration_state
            WHERE id = 1
        "#;

        let row = sqlx::query(query)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to load registration snapshot: {}", e);
                StoreError::QueryError(e.to_string())
            })?;

        let Some(row) = row else {
            return Ok(RegistrationSnapshot::default());
        };

        let tags: Option<BTreeSet<String>> = match row.try_get::<Option<String>, _>("tags").ok().flatten() {
            Some(json) => Some(
                serde_json::from_str(&json)
                    .map_err(|e| StoreError::EncodingError(format!("tags column: {e}")))?,
            ),
            None => None,
        };

        Ok(RegistrationSnapshot {
            channel_token: row.try_get("channel_token").ok().flatten(),
            backend_device_id: row.try_get("backend_device_id").ok().flatten(),
            platform_identifier: row.try_get("platform_identifier").ok().flatten(),
            platform_secret: row.try_get("platform_secret").ok().flatten(),
            device_alias: row.try_get("device_alias").ok().flatten(),
            custom_user_id: row.try_get("custom_user_id").ok().flatten(),
            server_url: row.try_get("server_url").ok().flatten(),
            sender_id: row.try_get("sender_id").ok().flatten(),
            package_identity: row.try_get("package_identity").ok().flatten(),
            app_version: row.try_get("app_version").ok().flatten(),
            tags,
        })
    }

    async fn set_tag_set(&self, tags: Option<BTreeSet<String>>) -> Result<(), StoreError> {
        let encoded = match tags {
            Some(tags) => Some(
                serde_json::to_string(&tags)
                    .map_err(|e| StoreError::EncodingError(format!("tags column: {e}")))?,
            ),
            None => None,
        };
        self.set_text("tags", encoded).await
    }
}

impl RegistrationStateStore for SqlRegistrationStateStore {
    type Error = BoxedError;

    fn load(&self) -> BoxFuture<'_, RegistrationSnapshot, Self::Error> {
        Box::pin(async move { self.load_snapshot().await.map_err(BoxedError::new) })
    }

    fn set_channel_token(&self, token: Option<String>) -> BoxFuture<'_, (), Self::Error> {
        Box::pin(async move {
            self.set_text("channel_token", token)
                .await
                .map_err(BoxedError::new)
        })
    }

    fn set_backend_device_id(&self, device_id: Option<String>) -> BoxFuture<'_, (), Self::Error> {
        Box::pin(async move {
            self.set_text("backend_device_id", device_id)
                .await
                .map_err(BoxedError::new)
        })
    }

    fn set_app_version(&self, version: Option<i64>) -> BoxFuture<'_, (), Self::Error> {
        Box::pin(async move {
            self.set_number("app_version", version)
                .await
                .map_err(BoxedError::new)
        })
    }

    fn set_platform_credentials(
        &self,
        identifier: Option<String>,
        secret: Option<String>,
    ) -> BoxFuture<'_, (), Self::Error> {
        Box::pin(async move {
            self.set_credentials(identifier, secret)
                .await
                .map_err(BoxedError::new)
        })
    }

    fn set_device_alias(&self, alias: Option<String>) -> BoxFuture<'_, (), Self::Error> {
        Box::pin(async move {
            self.set_text("device_alias", alias)
                .await
                .map_err(BoxedError::new)
        })
    }

    fn set_custom_user_id(
        &self,
        custom_user_id: Option<String>,
    ) -> BoxFuture<'_, (), Self::Error> {
        Box::pin(async move {
            self.set_text("custom_user_id", custom_user_id)
                .await
                .map_err(BoxedError::new)
        })
    }

    fn set_server_url(&self, server_url: Option<String>) -> BoxFuture<'_, (), Self::Error> {
        Box::pin(async move {
            self.set_text("server_url", server_url)
                .await
                .map_err(BoxedError::new)
        })
    }

    fn set_sender_id(&self, sender_id: Option<String>) -> BoxFuture<'_, (), Self::Error> {
        Box::pin(async move {
            self.set_text("sender_id", sender_id)
                .await
                .map_err(BoxedError::new)
        })
    }

    fn set_tags(&self, tags: Option<BTreeSet<String>>) -> BoxFuture<'_, (), Self::Error> {
        Box::pin(async move { self.set_tag_set(tags).await.map_err(BoxedError::new) })
    }

    fn set_package_identity(&self, package: Option<String>) -> BoxFuture<'_, (), Self::Error> {
        Box::pin(async move {
            self.set_text("package_identity", package)
                .await
                .map_err(BoxedError::new)
        })
    }
}
