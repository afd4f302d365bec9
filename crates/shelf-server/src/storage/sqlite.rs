//! SQLite item store (embedded, no external service)

use anyhow::{Context, Result};
use async_trait::async_trait;
use shelf_types::Item;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use super::ItemStore;

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn new(database_path: &str) -> Result<Self> {
        tracing::info!("Opening SQLite database at: {}", database_path);

        // Create parent directory if needed
        if let Some(parent) = std::path::Path::new(database_path).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.with_context(|| {
                    format!("Failed to create database directory: {}", parent.display())
                })?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .with_context(|| {
                format!("Failed to connect to SQLite database at: {database_path}")
            })?;

        Self::run_migrations(&pool)
            .await
            .context("Failed to run database migrations")?;

        Ok(Self { pool })
    }

    /// Private in-memory database, used by tests.
    #[cfg(test)]
    pub async fn in_memory() -> Result<Self> {
        use std::str::FromStr;

        // One connection only: each in-memory connection is its own database.
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .context("Failed to parse in-memory SQLite URL")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .context("Failed to open in-memory SQLite database")?;

        Self::run_migrations(&pool).await?;

        Ok(Self { pool })
    }

    async fn run_migrations(pool: &SqlitePool) -> Result<()> {
        // AUTOINCREMENT keeps deleted ids from ever being reassigned.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT ''
            )
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl ItemStore for SqliteStore {
    async fn list(&self) -> Result<Vec<Item>> {
        let rows: Vec<ItemRow> =
            sqlx::query_as(r#"SELECT id, name, description FROM items ORDER BY id"#)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(Item::from).collect())
    }

    async fn get(&self, id: i64) -> Result<Option<Item>> {
        let row: Option<ItemRow> =
            sqlx::query_as(r#"SELECT id, name, description FROM items WHERE id = ?1"#)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(Item::from))
    }

    async fn insert(&self, name: &str, description: &str) -> Result<Item> {
        let result = sqlx::query(r#"INSERT INTO items (name, description) VALUES (?1, ?2)"#)
            .bind(name)
            .bind(description)
            .execute(&self.pool)
            .await?;

        Ok(Item {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            description: description.to_string(),
        })
    }

    async fn update(&self, id: i64, name: &str, description: &str) -> Result<bool> {
        let result =
            sqlx::query(r#"UPDATE items SET name = ?1, description = ?2 WHERE id = ?3"#)
                .bind(name)
                .bind(description)
                .bind(id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query(r#"DELETE FROM items WHERE id = ?1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[derive(sqlx::FromRow)]
struct ItemRow {
    id: i64,
    name: String,
    description: String,
}

impl From<ItemRow> for Item {
    fn from(r: ItemRow) -> Self {
        Item {
            id: r.id,
            name: r.name,
            description: r.description,
        }
    }
}
