//! Session store error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to create connection pool: {0}")]
    CreatePool(#[from] deadpool_sqlite::CreatePoolError),

    #[error("Failed to get connection from pool: {0}")]
    Pool(#[from] deadpool_sqlite::PoolError),

    #[error("Database task failed: {0}")]
    Interact(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Migration failed: {0}")]
    Migration(#[from] rusqlite_migration::Error),

    #[error("Corrupt stored JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Corrupt stored value in column {column}: {message}")]
    InvalidColumn { column: &'static str, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
