use std::sync::Arc;
use std::time::Duration;

use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use thiserror::Error;

use crate::repository::{KeyValueRepository, Storage};

mod kv_repo;
mod migrate;

const MAX_CONNECTIONS: u32 = 5;
const BUSY_TIMEOUT_MS: u32 = 5000;

/// `SQLite`-backed key-value slots.
///
/// Each key is one row of `kv_entries`; the game keeps all of its progress in
/// a single row. Connections use WAL journaling and wait up to
/// `BUSY_TIMEOUT_MS` on a locked database, so a second process sharing the
/// file blocks briefly instead of failing.
#[derive(Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SqliteInitError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl SqliteRepository {
    /// Connect to `SQLite` using the given URL.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the connection cannot be established or
    /// connection pragmas fail during setup.
    pub async fn connect(database_url: &str) -> Result<Self, SqliteInitError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(Duration::from_secs(5))
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    sqlx::query("PRAGMA journal_mode = WAL;")
                        .execute(&mut *conn)
                        .await?;
                    sqlx::query(&format!("PRAGMA busy_timeout = {BUSY_TIMEOUT_MS};"))
                        .execute(&mut *conn)
                        .await?;
                    Ok(())
                })
            })
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create tables if they do not exist.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if migration queries fail.
    pub async fn migrate(&self) -> Result<(), SqliteInitError> {
        migrate::run_migrations(&self.pool).await
    }
}

impl Storage {
    /// Build a `Storage` backed by `SQLite`.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if connection or migrations cannot be
    /// completed.
    pub async fn sqlite(database_url: &str) -> Result<Self, SqliteInitError> {
        let repo = SqliteRepository::connect(database_url).await?;
        repo.migrate().await?;
        let kv: Arc<dyn KeyValueRepository> = Arc::new(repo);
        Ok(Self { kv })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_repo(name: &str) -> SqliteRepository {
        let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
        let repo = SqliteRepository::connect(&url).await.expect("connect");
        repo.migrate().await.expect("migrate");
        repo
    }

    #[tokio::test]
    async fn connections_wait_on_a_busy_database() {
        let repo = memory_repo("memdb_busy_timeout").await;
        let timeout: i64 = sqlx::query_scalar("PRAGMA busy_timeout")
            .fetch_one(repo.pool())
            .await
            .expect("pragma");
        assert_eq!(timeout, i64::from(BUSY_TIMEOUT_MS));
    }

    #[tokio::test]
    async fn migrations_are_recorded_once() {
        let repo = memory_repo("memdb_migrate_twice").await;
        repo.migrate().await.expect("second migrate");

        let versions: Vec<i64> = sqlx::query_scalar("SELECT version FROM schema_migrations")
            .fetch_all(repo.pool())
            .await
            .expect("versions");
        assert_eq!(versions, vec![1]);
    }

    #[tokio::test]
    async fn storage_wires_the_sqlite_slot() {
        let storage = Storage::sqlite("sqlite:file:memdb_storage_wiring?mode=memory&cache=shared")
            .await
            .expect("storage");
        storage.kv.set("animal_game_levels", "[]").await.expect("set");
        assert_eq!(
            storage.kv.get("animal_game_levels").await.expect("get").as_deref(),
            Some("[]")
        );
    }
}
