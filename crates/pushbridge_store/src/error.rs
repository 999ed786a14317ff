//! Error types for the state store

use thiserror::Error;

/// Errors that can occur when working with the registration state store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Error from SQLx
    #[error("Database error: {0}")]
    SqlxError(#[from] sqlx::Error),

    /// Error with the store configuration
    #[error("Store configuration error: {0}")]
    ConfigError(String),

    /// Error with database URL parsing
    #[error("Database URL error: {0}")]
    UrlError(String),

    /// Error with database pool creation
    #[error("Database pool error: {0}")]
    PoolError(String),

    /// Error with a database query
    #[error("Database query error: {0}")]
    QueryError(String),

    /// Error encoding or decoding a persisted field
    #[error("Field encoding error: {0}")]
    EncodingError(String),
}
