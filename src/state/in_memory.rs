//! In-memory document state store backed by a concurrent map.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use super::DocumentStore;
use crate::error::IngestResult;
use crate::models::{DocumentId, DocumentStateRecord};

#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    records: DashMap<DocumentId, DocumentStateRecord>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records, expired or not (for testing)
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: &DocumentId) -> bool {
        self.records.contains_key(id)
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn put(&self, record: &DocumentStateRecord) -> IngestResult<()> {
        self.records.insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn get(&self, id: &DocumentId) -> IngestResult<Option<DocumentStateRecord>> {
        let now = Utc::now();
        Ok(self
            .records
            .get(id)
            .map(|entry| entry.value().clone())
            .filter(|record| !record.is_expired_at(now)))
    }

    async fn remove(&self, id: &DocumentId) -> IngestResult<()> {
        self.records.remove(id);
        Ok(())
    }
}
