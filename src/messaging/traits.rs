//! # Work Queue Trait

use std::time::Duration;

use async_trait::async_trait;

use super::types::{MessageId, QueuedMessage, ReceiptHandle};
use super::MessagingResult;

/// Durable work queue capability.
///
/// Message bodies are JSON text. Implementations must be safe to share across
/// concurrently running fan-out workers; no locking is expected of callers.
#[async_trait]
pub trait WorkQueue: Send + Sync + 'static {
    /// Create a queue if it doesn't exist (idempotent)
    async fn ensure_queue(&self, queue_name: &str) -> MessagingResult<()>;

    /// Send one message body, returning the provider-assigned id
    async fn send_message(&self, queue_name: &str, body: &str) -> MessagingResult<MessageId>;

    /// Receive up to `max_messages` visible messages.
    ///
    /// Received messages stay invisible to other consumers for `visibility_timeout`
    /// and reappear if not acknowledged in time.
    async fn receive_messages(
        &self,
        queue_name: &str,
        max_messages: usize,
        visibility_timeout: Duration,
    ) -> MessagingResult<Vec<QueuedMessage<String>>>;

    /// Acknowledge successful processing (delete message)
    async fn ack_message(&self, queue_name: &str, receipt_handle: &ReceiptHandle)
        -> MessagingResult<()>;

    /// Provider name for logging
    fn provider_name(&self) -> &'static str;
}
