use super::error::StoreError;
use deadpool_sqlite::{Config, Pool, PoolConfig, Runtime};
use rusqlite::Connection;
use rusqlite_migration::{M, Migrations};
use std::path::Path;

fn migrations() -> Migrations<'static> {
    Migrations::new(vec![M::up(
        "CREATE TABLE debate_sessions (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            id TEXT NOT NULL UNIQUE,
            topic TEXT NOT NULL,
            duration INTEGER NOT NULL,
            user_replies TEXT NOT NULL,
            feedback TEXT,
            user_name TEXT NOT NULL,
            user_email TEXT NOT NULL,
            timestamp TEXT NOT NULL
        );
        CREATE INDEX idx_debate_sessions_user_email ON debate_sessions(user_email);",
    )])
}

/// Pooled SQLite handle.
#[derive(Clone)]
pub struct Database {
    pool: Pool,
}

impl Database {
    /// Open (or create) the database file at `path`.
    pub async fn connect(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let pool = Config::new(path).create_pool(Runtime::Tokio1)?;
        tracing::info!("Session store at {}", path.display());
        Ok(Self { pool })
    }

    /// Private in-memory database. The pool holds a single connection so
    /// every caller sees the same data.
    pub async fn connect_in_memory() -> Result<Self, StoreError> {
        let mut config = Config::new(":memory:");
        config.pool = Some(PoolConfig::new(1));
        let pool = config.create_pool(Runtime::Tokio1)?;
        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> Result<(), StoreError> {
        self.execute(|conn| {
            migrations().to_latest(conn)?;
            Ok(())
        })
        .await?;
        tracing::debug!("Session store migrations applied");
        Ok(())
    }

    /// Run `f` on a pooled connection off the async executor.
    pub async fn execute<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.pool.get().await?;
        conn.interact(f)
            .await
            .map_err(|e| StoreError::Interact(e.to_string()))?
    }
}
