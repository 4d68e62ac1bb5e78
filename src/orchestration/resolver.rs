//! # Source Set Resolver
//!
//! Computes the candidate set: ids present in the raw-input namespace and absent
//! from the processed-output namespace. Both namespaces are fully enumerated
//! before anything is diffed; a listing failure on either side fails the whole
//! resolution. Retries belong to the storage client, not here.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{info, instrument};

use crate::error::IngestResult;
use crate::models::DocumentId;
use crate::storage::{list_all, ObjectNamespace};

/// Documents awaiting ingestion, deduplicated, in raw-input listing order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateSet {
    ids: Vec<DocumentId>,
}

impl CandidateSet {
    /// `raw - processed`, dropping null/blank keys and duplicates
    pub fn difference<R, P>(raw: R, processed: P) -> Self
    where
        R: IntoIterator<Item = Option<String>>,
        P: IntoIterator<Item = Option<String>>,
    {
        let processed: HashSet<DocumentId> = processed
            .into_iter()
            .filter_map(|key| DocumentId::from_listing(key.as_deref()))
            .collect();

        let mut seen = HashSet::new();
        let ids = raw
            .into_iter()
            .filter_map(|key| DocumentId::from_listing(key.as_deref()))
            .filter(|id| !processed.contains(id))
            .filter(|id| seen.insert(id.clone()))
            .collect();

        Self { ids }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[DocumentId] {
        &self.ids
    }

    pub fn into_ids(self) -> Vec<DocumentId> {
        self.ids
    }
}

pub struct SourceSetResolver {
    raw_input: Arc<dyn ObjectNamespace>,
    processed_output: Arc<dyn ObjectNamespace>,
}

impl std::fmt::Debug for SourceSetResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceSetResolver")
            .field("raw_input", &self.raw_input.name())
            .field("processed_output", &self.processed_output.name())
            .finish()
    }
}

impl SourceSetResolver {
    pub fn new(
        raw_input: Arc<dyn ObjectNamespace>,
        processed_output: Arc<dyn ObjectNamespace>,
    ) -> Self {
        Self {
            raw_input,
            processed_output,
        }
    }

    /// Enumerate both namespaces and return the candidate set
    #[instrument(skip(self), fields(raw = %self.raw_input.name(), processed = %self.processed_output.name()))]
    pub async fn resolve(&self) -> IngestResult<CandidateSet> {
        let (raw, processed) = tokio::try_join!(
            list_all(self.raw_input.as_ref()),
            list_all(self.processed_output.as_ref())
        )?;

        info!(namespace = %self.raw_input.name(), files = raw.len(), "Raw-input namespace listed");
        info!(
            namespace = %self.processed_output.name(),
            files = processed.len(),
            "Processed-output namespace listed"
        );

        let candidates = CandidateSet::difference(raw, processed);
        info!(candidates = candidates.len(), "Candidate set resolved");
        Ok(candidates)
    }
}
