//! # diary-db-sqlite Implementation
//!
//! This module implements the data mapping between the SQLite relational model
//! and the `diary-core` domain models.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use diary_core::models::{DiaryEntry, EntryId, NewEntry};
use diary_core::traits::EntryRepo;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;

pub struct SqliteEntryRepo {
    pool: SqlitePool,
}

impl SqliteEntryRepo {
    /// Opens a pool against `url`, creating the database file if needed,
    /// and makes sure the entries table exists.
    pub async fn new(url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        let repo = Self { pool };
        repo.init_schema().await?;
        log::info!("SQLite pool created ({max_connections} connections max)");
        Ok(repo)
    }

    /// A private database that lives as long as the repo does.
    ///
    /// Every SQLite `:memory:` connection is its own database, so the pool is
    /// pinned to a single connection that is never recycled.
    pub async fn in_memory() -> anyhow::Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        let repo = Self { pool };
        repo.init_schema().await?;
        Ok(repo)
    }

    /// Closes the pool. Every later call fails with a pool-closed error.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn init_schema(&self) -> anyhow::Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS diary_entries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                content TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_diary_entries_created_at
                ON diary_entries (created_at)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn row_to_entry(row: &SqliteRow) -> Result<DiaryEntry, sqlx::Error> {
    Ok(DiaryEntry {
        id: row.try_get("id")?,
        content: row.try_get("content")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl EntryRepo for SqliteEntryRepo {
    /// Newest first. Rows sharing a timestamp fall back to insertion order.
    async fn list_entries(&self) -> anyhow::Result<Vec<DiaryEntry>> {
        let rows = sqlx::query(
            "SELECT id, content, created_at, updated_at FROM diary_entries
                ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        let entries = rows
            .iter()
            .map(row_to_entry)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// Inserts, then re-reads the row so the caller sees exactly what the
    /// table holds.
    async fn create_entry(&self, entry: NewEntry) -> anyhow::Result<DiaryEntry> {
        let now = Utc::now();

        let result = sqlx::query(
            "INSERT INTO diary_entries (content, created_at, updated_at) VALUES (?, ?, ?)",
        )
        .bind(entry.into_content())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let row = sqlx::query(
            "SELECT id, content, created_at, updated_at FROM diary_entries WHERE id = ?",
        )
        .bind(result.last_insert_rowid())
        .fetch_one(&self.pool)
        .await?;

        Ok(row_to_entry(&row)?)
    }

    async fn delete_entry(&self, id: EntryId) -> anyhow::Result<()> {
        let result = sqlx::query("DELETE FROM diary_entries WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            log::debug!("delete of entry {id} matched no rows");
        }
        Ok(())
    }
}
