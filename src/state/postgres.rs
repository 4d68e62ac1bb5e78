//! PostgreSQL document state store.
//!
//! Schema (created by [`PgDocumentStore::ensure_schema`]):
//!
//! ```sql
//! CREATE TABLE IF NOT EXISTS document_state (
//!     document_id TEXT PRIMARY KEY,
//!     status      TEXT NOT NULL,
//!     ttl         BIGINT NOT NULL
//! );
//! ```
//!
//! `ttl` is the expiry in epoch seconds. Rows past their ttl are ignored on read
//! and removed by [`PgDocumentStore::purge_expired`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::{debug, info};

use super::DocumentStore;
use crate::constants::DocumentStatus;
use crate::error::{IngestError, IngestResult};
use crate::models::{DocumentId, DocumentStateRecord};

#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
    table: String,
}

impl PgDocumentStore {
    /// Create a store over `table`, which must be a plain SQL identifier
    pub fn new(pool: PgPool, table: impl Into<String>) -> IngestResult<Self> {
        let table = table.into();
        let valid = !table.is_empty()
            && table
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
            && !table.starts_with(|c: char| c.is_ascii_digit());
        if !valid {
            return Err(IngestError::Configuration(format!(
                "invalid state table name: {table}"
            )));
        }
        Ok(Self { pool, table })
    }

    /// Connect using a database URL
    pub async fn connect(database_url: &str, table: impl Into<String>) -> IngestResult<Self> {
        let pool = PgPool::connect(database_url).await?;
        Self::new(pool, table)
    }

    pub async fn ensure_schema(&self) -> IngestResult<()> {
        let ddl = format!(
            "CREATE TABLE IF NOT EXISTS {} (\
                document_id TEXT PRIMARY KEY, \
                status TEXT NOT NULL, \
                ttl BIGINT NOT NULL)",
            self.table
        );
        sqlx::query(&ddl).execute(&self.pool).await?;
        info!(table = %self.table, "Document state table ensured");
        Ok(())
    }

    /// Delete rows whose ttl has passed, returning how many were removed
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> IngestResult<u64> {
        let sql = format!("DELETE FROM {} WHERE ttl <= $1", self.table);
        let result = sqlx::query(&sql)
            .bind(now.timestamp())
            .execute(&self.pool)
            .await?;
        debug!(table = %self.table, purged = result.rows_affected(), "Expired state purged");
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn put(&self, record: &DocumentStateRecord) -> IngestResult<()> {
        let sql = format!(
            "INSERT INTO {} (document_id, status, ttl) VALUES ($1, $2, $3) \
             ON CONFLICT (document_id) DO UPDATE SET status = EXCLUDED.status, ttl = EXCLUDED.ttl",
            self.table
        );
        sqlx::query(&sql)
            .bind(record.id.as_str())
            .bind(record.status.as_str())
            .bind(record.ttl())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn get(&self, id: &DocumentId) -> IngestResult<Option<DocumentStateRecord>> {
        let sql = format!(
            "SELECT document_id, status, ttl FROM {} WHERE document_id = $1 AND ttl > $2",
            self.table
        );
        let row = sqlx::query(&sql)
            .bind(id.as_str())
            .bind(Utc::now().timestamp())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| {
            let status: String = row.get("status");
            let ttl: i64 = row.get("ttl");
            let status = status
                .parse::<DocumentStatus>()
                .map_err(IngestError::StateStore)?;
            let expiry = DateTime::<Utc>::from_timestamp(ttl, 0)
                .ok_or_else(|| IngestError::StateStore(format!("invalid ttl {ttl}")))?;
            Ok(DocumentStateRecord {
                id: DocumentId::new(row.get::<String, _>("document_id")),
                status,
                expiry,
            })
        })
        .transpose()
    }

    async fn remove(&self, id: &DocumentId) -> IngestResult<()> {
        let sql = format!("DELETE FROM {} WHERE document_id = $1", self.table);
        sqlx::query(&sql)
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
