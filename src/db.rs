use std::path::Path;

use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqliteExecutor, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::models::{Paste, PasteSummary};

/// Applied on every startup; creates the paste table on first run.
const SCHEMA: &str = include_str!("../database/schema.sql");

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open the database at `path`, creating the file and schema if missing.
    pub async fn open(path: &Path) -> anyhow::Result<Self> {
        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .context("failed to create database directory")?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .context("failed to open database")?;

        let database = Self { pool };
        database.apply_schema().await?;
        Ok(database)
    }

    #[cfg(test)]
    pub async fn open_in_memory() -> anyhow::Result<Self> {
        // a single connection, or each pool checkout would see its own
        // empty in-memory database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        let database = Self { pool };
        database.apply_schema().await?;
        Ok(database)
    }

    async fn apply_schema(&self) -> anyhow::Result<()> {
        sqlx::query(SCHEMA)
            .execute(&self.pool)
            .await
            .context("failed to apply schema")?;
        Ok(())
    }

    /// Begin a transaction for a multi-statement read path.
    pub async fn begin(&self) -> sqlx::Result<Transaction<'static, Sqlite>> {
        self.pool.begin().await
    }

    /// Insert a paste, returning the stored row with its assigned timestamp.
    pub async fn insert_paste(
        &self,
        id: &str,
        title: &str,
        content: &str,
        expires_in: Option<i64>,
    ) -> sqlx::Result<Paste> {
        sqlx::query_as::<_, Paste>(
            "INSERT INTO pastes (id, title, content, expires_in) VALUES (?, ?, ?, ?) \
             RETURNING id, title, content, created_at, expires_in, views",
        )
        .bind(id)
        .bind(title)
        .bind(content)
        .bind(expires_in)
        .fetch_one(&self.pool)
        .await
    }

    /// Get only a paste's content by id.
    pub async fn get_content(&self, id: &str) -> sqlx::Result<Option<String>> {
        sqlx::query_scalar("SELECT content FROM pastes WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Newest non-expired pastes, expiry computed at query time.
    pub async fn recent_pastes(&self, limit: i64) -> sqlx::Result<Vec<PasteSummary>> {
        sqlx::query_as::<_, PasteSummary>(
            "SELECT id, title, created_at FROM pastes \
             WHERE expires_in IS NULL \
                OR datetime(created_at, '+' || expires_in || ' minutes') > CURRENT_TIMESTAMP \
             ORDER BY created_at DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    /// Substring match over paste ids, newest first. Expired pastes are not
    /// filtered here.
    pub async fn search_pastes(&self, query: &str, limit: i64) -> sqlx::Result<Vec<PasteSummary>> {
        sqlx::query_as::<_, PasteSummary>(
            "SELECT id, title, created_at FROM pastes WHERE id LIKE ? \
             ORDER BY created_at DESC LIMIT ?",
        )
        .bind(format!("%{query}%"))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    /// Get all pastes.
    pub async fn get_all_pastes(&self) -> sqlx::Result<Vec<Paste>> {
        sqlx::query_as::<_, Paste>("SELECT * FROM pastes")
            .fetch_all(&self.pool)
            .await
    }

    /// Delete a paste by id.
    pub async fn delete_paste(&self, id: &str) -> sqlx::Result<()> {
        delete_paste(&self.pool, id).await
    }

    #[cfg(test)]
    pub async fn get_paste(&self, id: &str) -> sqlx::Result<Option<Paste>> {
        fetch_paste(&self.pool, id).await
    }

    #[cfg(test)]
    pub async fn backdate(&self, id: &str, minutes: i64) -> sqlx::Result<()> {
        sqlx::query(
            "UPDATE pastes SET created_at = datetime('now', '-' || ? || ' minutes') WHERE id = ?",
        )
        .bind(minutes)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

/// Get a paste by id on any executor, so the view path can run inside a
/// transaction.
pub async fn fetch_paste(executor: impl SqliteExecutor<'_>, id: &str) -> sqlx::Result<Option<Paste>> {
    sqlx::query_as::<_, Paste>("SELECT * FROM pastes WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn delete_paste(executor: impl SqliteExecutor<'_>, id: &str) -> sqlx::Result<()> {
    sqlx::query("DELETE FROM pastes WHERE id = ?")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(())
}

/// Single-statement increment; concurrent viewers cannot lose updates.
pub async fn bump_views(executor: impl SqliteExecutor<'_>, id: &str) -> sqlx::Result<()> {
    sqlx::query("UPDATE pastes SET views = COALESCE(views, 0) + 1 WHERE id = ?")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(())
}
