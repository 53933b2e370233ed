use std::str::FromStr;
use std::time::Duration;

use log::info;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS tasks (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        title       TEXT    NOT NULL,
        description TEXT    NOT NULL DEFAULT '',
        completed   BOOLEAN NOT NULL DEFAULT 0,
        priority    TEXT    NOT NULL DEFAULT 'medium',
        category    TEXT    NOT NULL DEFAULT 'general',
        due_date    TEXT,
        created_at  TEXT    NOT NULL,
        updated_at  TEXT    NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_tasks_created_at ON tasks (created_at)",
    r#"
    CREATE TABLE IF NOT EXISTS categories (
        id         INTEGER PRIMARY KEY AUTOINCREMENT,
        name       TEXT NOT NULL UNIQUE,
        color      TEXT NOT NULL DEFAULT '#3B82F6',
        created_at TEXT NOT NULL
    )
    "#,
];

/// Shared SQLite pool. Cloning is cheap and every clone talks to the same database.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens (creating if needed) the database at `database_url` and ensures the schema exists.
    ///
    /// Accepts `sqlite://path`, a bare file path, or `sqlite::memory:` / `:memory:`.
    /// In-memory databases are pinned to a single connection so every request sees the
    /// same data.
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = if database_url.contains(":memory:") {
            let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            let url = if database_url.starts_with("sqlite:") {
                database_url.to_string()
            } else {
                format!("sqlite://{database_url}")
            };
            let options = SqliteConnectOptions::from_str(&url)?
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .busy_timeout(Duration::from_secs(5));
            SqlitePoolOptions::new().connect_with(options).await?
        };

        let db = Self { pool };
        db.create_schema().await?;
        info!("Database ready at {}", database_url);
        Ok(db)
    }

    async fn create_schema(&self) -> Result<(), sqlx::Error> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// True when a trivial query round-trips.
    pub async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[cfg(test)]
pub async fn test_database() -> Database {
    Database::connect("sqlite::memory:")
        .await
        .expect("in-memory database")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn schema_creation_is_idempotent() {
        let db = test_database().await;
        db.create_schema().await.unwrap();
        assert!(db.ping().await);
    }

    #[tokio::test]
    async fn in_memory_pool_shares_state_across_queries() {
        let db = test_database().await;
        sqlx::query("INSERT INTO categories (name, color, created_at) VALUES ('x', '#000000', '2024-01-01T00:00:00Z')")
            .execute(db.pool())
            .await
            .unwrap();
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM categories")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
