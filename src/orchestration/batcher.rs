//! # Batcher
//!
//! Splits an ordered candidate list into consecutive batches of at most
//! `batch_size` ids. Order is preserved and only the last batch may be short.

use std::num::NonZeroUsize;

use crate::config::{ConfigResult, ConfigurationError};
use crate::models::{Batch, DocumentId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Batcher {
    batch_size: NonZeroUsize,
}

impl Batcher {
    /// A zero batch size is a configuration error
    pub fn new(batch_size: usize) -> ConfigResult<Self> {
        NonZeroUsize::new(batch_size)
            .map(|batch_size| Self { batch_size })
            .ok_or_else(|| {
                ConfigurationError::invalid_value(
                    "batch_size",
                    batch_size.to_string(),
                    "batch size must be a positive integer",
                )
            })
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size.get()
    }

    pub fn partition(&self, ids: Vec<DocumentId>) -> Vec<Batch> {
        partition(ids, self.batch_size)
    }
}

/// Pure partitioning: `ceil(n / size)` batches, concatenation equals the input
pub fn partition(ids: Vec<DocumentId>, batch_size: NonZeroUsize) -> Vec<Batch> {
    let size = batch_size.get();
    let mut batches = Vec::with_capacity(ids.len().div_ceil(size));
    let mut ids = ids.into_iter().peekable();

    while ids.peek().is_some() {
        batches.push(ids.by_ref().take(size).collect::<Batch>());
    }

    batches
}
