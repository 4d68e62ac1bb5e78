//! # Fan-Out Worker
//!
//! Receives one batch and, per document id in order:
//!
//! 1. computes `expiry = now + retention`,
//! 2. upserts `{id, INGESTED, expiry}` into the state store,
//! 3. enqueues `{"uid": id}` onto the work queue,
//! 4. keeps a checksum receipt of the enqueued body for auditing.
//!
//! State is always written before the message becomes visible, so a consumer
//! picking up a message can find its state row. A failed state write skips the
//! enqueue for that id. A failed enqueue rolls the state row back to what it
//! was before this worker touched it: removed if there was no live record,
//! restored otherwise, since a message from an earlier dispatch may still be
//! queued against it. Either way the worker moves on to the next id, and the
//! failed document is rediscovered by the next resolver run.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

use crate::error::IngestError;
use crate::logging::log_document_operation;
use crate::messaging::WorkQueue;
use crate::models::{Batch, DeliveryReceipt, DocumentId, DocumentStateRecord, WorkMessage};
use crate::state::DocumentStore;

/// Stage at which a document dropped out of the batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    State,
    Enqueue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFailure {
    pub uid: DocumentId,
    pub stage: FailureStage,
    pub reason: String,
}

/// Outcome of one worker invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FanOutReport {
    pub responses: Vec<DeliveryReceipt>,
    pub failures: Vec<DocumentFailure>,
    pub processing_duration_ms: u64,
}

impl FanOutReport {
    pub fn enqueued(&self) -> usize {
        self.responses.len()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

pub struct FanOutWorker {
    store: Arc<dyn DocumentStore>,
    queue: Arc<dyn WorkQueue>,
    queue_name: String,
    retention: chrono::Duration,
}

impl std::fmt::Debug for FanOutWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FanOutWorker")
            .field("queue_name", &self.queue_name)
            .field("queue_provider", &self.queue.provider_name())
            .field("retention", &self.retention)
            .finish()
    }
}

impl FanOutWorker {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        queue: Arc<dyn WorkQueue>,
        queue_name: impl Into<String>,
        retention: chrono::Duration,
    ) -> Self {
        Self {
            store,
            queue,
            queue_name: queue_name.into(),
            retention,
        }
    }

    /// Record state and enqueue a message for every id in the batch
    #[instrument(skip(self, batch), fields(batch_len = batch.len(), queue = %self.queue_name))]
    pub async fn process_batch(&self, batch: &Batch) -> FanOutReport {
        let start = Instant::now();
        let mut report = FanOutReport::default();

        for (index, id) in batch.iter().enumerate() {
            log_document_operation("process", id.as_str(), index + 1, batch.len(), "started", None);

            match self.process_document(id).await {
                Ok(receipt) => report.responses.push(receipt),
                Err(failure) => {
                    log_document_operation(
                        "process",
                        id.as_str(),
                        index + 1,
                        batch.len(),
                        "failed",
                        Some(&failure.reason),
                    );
                    report.failures.push(failure);
                }
            }
        }

        report.processing_duration_ms = start.elapsed().as_millis() as u64;
        info!(
            enqueued = report.enqueued(),
            failed = report.failed(),
            duration_ms = report.processing_duration_ms,
            "Batch fan-out complete"
        );
        report
    }

    async fn process_document(&self, id: &DocumentId) -> Result<DeliveryReceipt, DocumentFailure> {
        let failure = |stage, reason: String| DocumentFailure {
            uid: id.clone(),
            stage,
            reason,
        };

        let prior = match self.store.get(id).await {
            Ok(prior) => prior,
            Err(e) => {
                error!(document_id = %id, error = %e, "State read failed, message not enqueued");
                return Err(failure(FailureStage::State, e.to_string()));
            }
        };

        let record = DocumentStateRecord::ingested(id.clone(), Utc::now(), self.retention);
        if let Err(e) = self.store.put(&record).await {
            error!(document_id = %id, error = %e, "State upsert failed, message not enqueued");
            return Err(failure(FailureStage::State, e.to_string()));
        }

        let enqueued = match WorkMessage::new(id.clone()).body() {
            Ok(body) => self
                .queue
                .send_message(&self.queue_name, &body)
                .await
                .map(|message_id| DeliveryReceipt::new(id.clone(), body, &message_id))
                .map_err(IngestError::from),
            Err(e) => Err(IngestError::from(e)),
        };

        match enqueued {
            Ok(receipt) => {
                info!(document_id = %id, checksum = %receipt.checksum, "Work message enqueued");
                Ok(receipt)
            }
            Err(e) => {
                error!(document_id = %id, error = %e, "Enqueue failed, rolling back state record");
                self.roll_back(id, prior).await;
                Err(failure(FailureStage::Enqueue, e.to_string()))
            }
        }
    }

    /// Put the state row back the way it was before this worker wrote it
    async fn roll_back(&self, id: &DocumentId, prior: Option<DocumentStateRecord>) {
        let result = match &prior {
            None => self.store.remove(id).await,
            Some(record) => self.store.put(record).await,
        };
        if let Err(e) = result {
            warn!(
                document_id = %id,
                restoring = prior.is_some(),
                error = %e,
                "State rollback failed after enqueue failure"
            );
        }
    }
}
