//! # Document State Store
//!
//! Durable per-document ingestion state, keyed by [`DocumentId`](crate::models::DocumentId).
//!
//! Every write is a whole-record upsert, never an incremental update, so any number
//! of concurrent fan-out workers can write without locking and converge on
//! last-writer-wins per id.

mod in_memory;
mod postgres;

use async_trait::async_trait;

use crate::error::IngestResult;
use crate::models::{DocumentId, DocumentStateRecord};

pub use in_memory::InMemoryDocumentStore;
pub use postgres::PgDocumentStore;

/// Document state capability: get and put by id
#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    /// Insert or overwrite the record for `record.id`
    async fn put(&self, record: &DocumentStateRecord) -> IngestResult<()>;

    /// Fetch the record for `id`, if one exists and has not expired
    async fn get(&self, id: &DocumentId) -> IngestResult<Option<DocumentStateRecord>>;

    /// Delete the record for `id`; deleting a missing record is not an error
    async fn remove(&self, id: &DocumentId) -> IngestResult<()>;
}
