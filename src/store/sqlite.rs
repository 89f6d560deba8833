//! SQLite-backed [`DocumentStore`].
//!
//! Every collection shares the `documents` table; the collection name is the
//! `kind` column. Payloads are stored as JSON text with `created_at` /
//! `updated_at` stamps merged in.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::{stamp_payload, DocumentStore, StoredDocument};
use crate::config::DbConfig;
use crate::{db, migrate};

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Wrap an existing pool. The schema must already be applied.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to the configured database and apply the schema.
    pub async fn open(db_config: &DbConfig) -> Result<Self> {
        let pool = db::connect(db_config)
            .await
            .with_context(|| format!("Failed to open database: {}", db_config.url))?;
        migrate::apply(&pool).await?;
        Ok(Self::new(pool))
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn create_document(&self, kind: &str, payload: Value) -> Result<String> {
        let now = chrono::Utc::now();
        let id = Uuid::new_v4().to_string();
        let payload_json = serde_json::to_string(&stamp_payload(payload, now))?;

        sqlx::query(
            "INSERT INTO documents (id, kind, payload_json, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(kind)
        .bind(&payload_json)
        .bind(now.timestamp_millis())
        .bind(now.timestamp_millis())
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    async fn list_collections(&self, limit: usize) -> Result<Vec<String>> {
        let rows = sqlx::query("SELECT DISTINCT kind FROM documents ORDER BY kind ASC LIMIT ?")
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(|row| row.get("kind")).collect())
    }

    async fn get_documents(
        &self,
        kind: Option<&str>,
        limit: usize,
    ) -> Result<Vec<StoredDocument>> {
        let rows = sqlx::query(
            r#"
            SELECT id, kind, payload_json, created_at
            FROM documents
            WHERE (?1 IS NULL OR kind = ?1)
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?2
            "#,
        )
        .bind(kind)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        let docs = rows
            .iter()
            .map(|row| {
                let payload_json: String = row.get("payload_json");
                let created_at: i64 = row.get("created_at");
                StoredDocument {
                    id: row.get("id"),
                    kind: row.get("kind"),
                    created_at: format_ts_iso(created_at),
                    payload: serde_json::from_str(&payload_json)
                        .unwrap_or(Value::Null),
                }
            })
            .collect();

        Ok(docs)
    }
}

fn format_ts_iso(ts_millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(ts_millis)
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%SZ").to_string())
        .unwrap_or_else(|| ts_millis.to_string())
}
