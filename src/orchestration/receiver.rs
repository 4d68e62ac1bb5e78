//! # Queue Batch Receiver
//!
//! Consumer-side pull of work messages. One call receives up to
//! `max_messages` messages under a visibility timeout and decodes each body as
//! a [`WorkMessage`]. A body that does not decode is reported alongside the
//! good ones instead of failing the whole receive, so one poisoned message
//! cannot stall the queue.
//!
//! Delivery is at-least-once: callers ack after processing and must treat a
//! redelivered `uid` as a repeat.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, instrument, warn};

use crate::error::IngestResult;
use crate::messaging::{QueuedMessage, ReceiptHandle, WorkQueue};
use crate::models::WorkMessage;

#[derive(Debug, Clone)]
pub struct UndecodableMessage {
    pub receipt_handle: ReceiptHandle,
    pub body: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct ReceivedBatch {
    pub messages: Vec<QueuedMessage<WorkMessage>>,
    pub undecodable: Vec<UndecodableMessage>,
}

impl ReceivedBatch {
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.undecodable.is_empty()
    }
}

pub struct QueueBatchReceiver {
    queue: Arc<dyn WorkQueue>,
    queue_name: String,
    max_messages: usize,
    visibility_timeout: Duration,
}

impl std::fmt::Debug for QueueBatchReceiver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueBatchReceiver")
            .field("queue_name", &self.queue_name)
            .field("max_messages", &self.max_messages)
            .field("visibility_timeout", &self.visibility_timeout)
            .finish()
    }
}

impl QueueBatchReceiver {
    pub fn new(
        queue: Arc<dyn WorkQueue>,
        queue_name: impl Into<String>,
        max_messages: usize,
        visibility_timeout: Duration,
    ) -> Self {
        Self {
            queue,
            queue_name: queue_name.into(),
            max_messages,
            visibility_timeout,
        }
    }

    #[instrument(skip(self), fields(queue = %self.queue_name, max = self.max_messages))]
    pub async fn receive(&self) -> IngestResult<ReceivedBatch> {
        let raw = self
            .queue
            .receive_messages(&self.queue_name, self.max_messages, self.visibility_timeout)
            .await?;

        let mut batch = ReceivedBatch::default();
        for message in raw {
            match serde_json::from_str::<WorkMessage>(&message.message) {
                Ok(decoded) => batch.messages.push(message.map(|_| decoded)),
                Err(e) => {
                    warn!(receipt = %message.receipt_handle, error = %e, "Undecodable work message");
                    batch.undecodable.push(UndecodableMessage {
                        receipt_handle: message.receipt_handle,
                        body: message.message,
                        reason: e.to_string(),
                    });
                }
            }
        }

        debug!(
            decoded = batch.messages.len(),
            undecodable = batch.undecodable.len(),
            "Work messages received"
        );
        Ok(batch)
    }

    /// Delete a processed message
    pub async fn ack(&self, receipt_handle: &ReceiptHandle) -> IngestResult<()> {
        self.queue
            .ack_message(&self.queue_name, receipt_handle)
            .await?;
        Ok(())
    }
}
