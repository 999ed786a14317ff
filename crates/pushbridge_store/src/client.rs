//! Database client for the registration state store
//!
//! Database-agnostic connection handling over the SQLx `Any` driver; sqlite
//! by default, postgres behind a feature flag.

use crate::error::StoreError;
use pushbridge_config::{AppConfig, DatabaseConfig};
use sqlx::pool::PoolOptions;
use sqlx::Pool;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// Database client for the registration state store.
#[derive(Debug, Clone)]
pub struct DbClient {
    pool: Pool<sqlx::Any>,
}

impl DbClient {
    /// Create a client from the application configuration.
    ///
    /// # Errors
    ///
    /// Fails when the database section is missing, the URL is empty, or the
    /// connection cannot be established.
    pub async fn new(config: &Arc<AppConfig>) -> Result<Self, StoreError> {
        let db_config = config.database.as_ref().ok_or_else(|| {
            StoreError::ConfigError("Database configuration is missing".to_string())
        })?;
        Self::from_config(db_config).await
    }

    /// Create a client from a database configuration section.
    pub async fn from_config(db_config: &DatabaseConfig) -> Result<Self, StoreError> {
        if db_config.url.is_empty() {
            return Err(StoreError::ConfigError("Database URL is empty".to_string()));
        }
        Self::from_url(&db_config.url).await
    }

    /// Create a client directly from a database URL.
    pub async fn from_url(db_url: &str) -> Result<Self, StoreError> {
        if db_url.is_empty() {
            return Err(StoreError::UrlError("Database URL is empty".to_string()));
        }
        let pool = Self::create_pool(db_url).await?;
        Ok(Self { pool })
    }

    async fn create_pool(db_url: &str) -> Result<Pool<sqlx::Any>, StoreError> {
        debug!("Creating database pool with URL: {}", db_url);

        // Register the compiled-in drivers with the Any driver
        sqlx::any::install_default_drivers();

        let pool_options = PoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .idle_timeout(Duration::from_secs(600));

        // The Any driver cannot set create_if_missing, so bootstrap sqlite
        // database files by hand.
        #[cfg(feature = "sqlite")]
        if let Some(db_path) = db_url
            .strip_prefix("sqlite://")
            .or_else(|| db_url.strip_prefix("sqlite:"))
        {
            if !db_path.contains(":memory:") && !db_path.is_empty() {
                if let Some(dir) = std::path::Path::new(db_path).parent() {
                    if !dir.exists() {
                        debug!("Creating directory for SQLite database: {:?}", dir);
                        std::fs::create_dir_all(dir).map_err(|e| {
                            error!("Failed to create directory for SQLite database: {}", e);
                            StoreError::PoolError(format!("Failed to create directory: {}", e))
                        })?;
                    }
                }
                if !std::path::Path::new(db_path).exists() {
                    debug!("Creating empty SQLite database file: {}", db_path);
                    std::fs::File::create(db_path).map_err(|e| {
                        error!("Failed to create SQLite database file: {}", e);
                        StoreError::PoolError(format!("Failed to create database file: {}", e))
                    })?;
                }
            }
        }

        let pool = pool_options
            .connect_with(sqlx::any::AnyConnectOptions::from_str(db_url)?)
            .await
            .map_err(|e| {
                error!("Failed to create database pool: {}", e);
                StoreError::PoolError(e.to_string())
            })?;

        info!("Database pool created successfully");
        Ok(pool)
    }

    /// The underlying connection pool.
    pub fn pool(&self) -> &Pool<sqlx::Any> {
        &self.pool
    }

    /// Execute a statement that returns no rows.
    pub async fn execute(&self, query: &str) -> Result<u64, StoreError> {
        sqlx::query(query)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected())
            .map_err(|e| StoreError::QueryError(e.to_string()))
    }

    /// Check database health with a trivial query.
    pub async fn is_healthy(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}
