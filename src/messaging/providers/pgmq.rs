//! # PGMQ Work Queue
//!
//! Work queue backed by the PostgreSQL message queue extension via pgmq-rs.
//! Message bodies are stored as JSONB, so they must be valid JSON.

use std::time::Duration;

use ::pgmq::PGMQueue;
use async_trait::async_trait;
use tracing::{debug, info};

use crate::messaging::traits::WorkQueue;
use crate::messaging::types::{MessageId, QueuedMessage, ReceiptHandle};
use crate::messaging::{MessagingError, MessagingResult};

#[derive(Debug, Clone)]
pub struct PgmqWorkQueue {
    pgmq: PGMQueue,
}

impl PgmqWorkQueue {
    /// Connect using a database URL
    pub async fn connect(database_url: &str) -> MessagingResult<Self> {
        info!("Connecting work queue to pgmq");

        let pgmq = PGMQueue::new(database_url.to_string())
            .await
            .map_err(|e| MessagingError::connection(e.to_string()))?;

        Ok(Self { pgmq })
    }
}

#[async_trait]
impl WorkQueue for PgmqWorkQueue {
    async fn ensure_queue(&self, queue_name: &str) -> MessagingResult<()> {
        self.pgmq
            .create(queue_name)
            .await
            .map_err(|e| MessagingError::queue_operation(queue_name, "create", e.to_string()))?;

        debug!(queue = %queue_name, "Queue ensured");
        Ok(())
    }

    async fn send_message(&self, queue_name: &str, body: &str) -> MessagingResult<MessageId> {
        let payload: serde_json::Value = serde_json::from_str(body)
            .map_err(|e| MessagingError::message_serialization(e.to_string()))?;

        let message_id = self
            .pgmq
            .send(queue_name, &payload)
            .await
            .map_err(|e| MessagingError::queue_operation(queue_name, "send", e.to_string()))?;

        debug!(queue = %queue_name, message_id = message_id, "Message sent");
        Ok(MessageId::from(message_id))
    }

    async fn receive_messages(
        &self,
        queue_name: &str,
        max_messages: usize,
        visibility_timeout: Duration,
    ) -> MessagingResult<Vec<QueuedMessage<String>>> {
        let vt = i32::try_from(visibility_timeout.as_secs()).unwrap_or(i32::MAX);
        let limit = i32::try_from(max_messages).unwrap_or(i32::MAX);

        let messages = self
            .pgmq
            .read_batch::<serde_json::Value>(queue_name, Some(vt), limit)
            .await
            .map_err(|e| MessagingError::queue_operation(queue_name, "read_batch", e.to_string()))?
            .unwrap_or_default();

        debug!(queue = %queue_name, count = messages.len(), "Messages received");

        Ok(messages
            .into_iter()
            .map(|msg| {
                QueuedMessage::new(
                    ReceiptHandle::from(msg.msg_id),
                    msg.message.to_string(),
                    u32::try_from(msg.read_ct).unwrap_or(0),
                    msg.enqueued_at,
                )
            })
            .collect())
    }

    async fn ack_message(
        &self,
        queue_name: &str,
        receipt_handle: &ReceiptHandle,
    ) -> MessagingResult<()> {
        let message_id = receipt_handle
            .as_i64()
            .ok_or_else(|| MessagingError::invalid_receipt_handle(receipt_handle.as_str()))?;

        self.pgmq
            .delete(queue_name, message_id)
            .await
            .map_err(|e| MessagingError::queue_operation(queue_name, "delete", e.to_string()))?;

        debug!(queue = %queue_name, message_id = message_id, "Message deleted");
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "pgmq"
    }
}
