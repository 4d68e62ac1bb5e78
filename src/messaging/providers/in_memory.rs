//! # In-Memory Work Queue
//!
//! Thread-safe in-memory queue for tests and local development, with the same
//! visibility-timeout semantics as the durable providers.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::messaging::traits::WorkQueue;
use crate::messaging::types::{MessageId, QueuedMessage, ReceiptHandle};
use crate::messaging::{MessagingError, MessagingResult};

#[derive(Debug, Clone)]
struct InMemoryQueuedMessage {
    id: u64,
    body: String,
    enqueued_at: DateTime<Utc>,
    /// When the message becomes visible again (None = visible now)
    visible_at: Option<DateTime<Utc>>,
    receive_count: u32,
}

#[derive(Debug)]
struct InMemoryQueue {
    messages: VecDeque<InMemoryQueuedMessage>,
    next_id: u64,
    total_sent: u64,
}

impl InMemoryQueue {
    fn new() -> Self {
        Self {
            messages: VecDeque::new(),
            next_id: 1,
            total_sent: 0,
        }
    }
}

/// In-memory work queue
///
/// # Example
///
/// ```rust
/// use docingest_core::messaging::{InMemoryWorkQueue, WorkQueue};
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let queue = InMemoryWorkQueue::new();
/// queue.ensure_queue("work").await?;
/// queue.send_message("work", r#"{"uid":"a.txt"}"#).await?;
///
/// let received = queue.receive_messages("work", 10, Duration::from_secs(30)).await?;
/// assert_eq!(received.len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct InMemoryWorkQueue {
    queues: RwLock<HashMap<String, InMemoryQueue>>,
}

impl Default for InMemoryWorkQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryWorkQueue {
    pub fn new() -> Self {
        Self {
            queues: RwLock::new(HashMap::new()),
        }
    }

    /// Create with pre-initialized queues
    pub fn with_queues(queue_names: &[&str]) -> Self {
        let queues = queue_names
            .iter()
            .map(|name| (name.to_string(), InMemoryQueue::new()))
            .collect();
        Self {
            queues: RwLock::new(queues),
        }
    }

    /// Number of messages in a queue, visible or not (for testing)
    pub async fn queue_length(&self, queue_name: &str) -> usize {
        let queues = self.queues.read().await;
        queues
            .get(queue_name)
            .map(|q| q.messages.len())
            .unwrap_or(0)
    }

    /// Every message body in a queue, in enqueue order (for testing)
    pub async fn bodies(&self, queue_name: &str) -> Vec<String> {
        let queues = self.queues.read().await;
        queues
            .get(queue_name)
            .map(|q| q.messages.iter().map(|m| m.body.clone()).collect())
            .unwrap_or_default()
    }

    /// Total messages ever sent to a queue (for testing)
    pub async fn total_sent(&self, queue_name: &str) -> u64 {
        let queues = self.queues.read().await;
        queues.get(queue_name).map(|q| q.total_sent).unwrap_or(0)
    }
}

fn parse_handle(receipt_handle: &ReceiptHandle) -> MessagingResult<u64> {
    receipt_handle
        .as_str()
        .parse()
        .map_err(|_| MessagingError::invalid_receipt_handle(receipt_handle.as_str()))
}

#[async_trait]
impl WorkQueue for InMemoryWorkQueue {
    async fn ensure_queue(&self, queue_name: &str) -> MessagingResult<()> {
        let mut queues = self.queues.write().await;
        queues
            .entry(queue_name.to_string())
            .or_insert_with(InMemoryQueue::new);
        Ok(())
    }

    async fn send_message(&self, queue_name: &str, body: &str) -> MessagingResult<MessageId> {
        let mut queues = self.queues.write().await;
        let queue = queues
            .get_mut(queue_name)
            .ok_or_else(|| MessagingError::queue_not_found(queue_name))?;

        let id = queue.next_id;
        queue.next_id += 1;
        queue.total_sent += 1;
        queue.messages.push_back(InMemoryQueuedMessage {
            id,
            body: body.to_string(),
            enqueued_at: Utc::now(),
            visible_at: None,
            receive_count: 0,
        });

        Ok(MessageId::from(id))
    }

    async fn receive_messages(
        &self,
        queue_name: &str,
        max_messages: usize,
        visibility_timeout: Duration,
    ) -> MessagingResult<Vec<QueuedMessage<String>>> {
        let mut queues = self.queues.write().await;
        let queue = queues
            .get_mut(queue_name)
            .ok_or_else(|| MessagingError::queue_not_found(queue_name))?;

        let now = Utc::now();
        let timeout = chrono::Duration::from_std(visibility_timeout)
            .map_err(|e| MessagingError::internal(format!("invalid visibility timeout: {e}")))?;
        let visible_until = now + timeout;

        let mut received = Vec::new();
        for msg in queue.messages.iter_mut() {
            if received.len() >= max_messages {
                break;
            }
            if msg.visible_at.map(|vt| vt <= now).unwrap_or(true) {
                msg.visible_at = Some(visible_until);
                msg.receive_count += 1;
                received.push(QueuedMessage::new(
                    ReceiptHandle::from(msg.id),
                    msg.body.clone(),
                    msg.receive_count,
                    msg.enqueued_at,
                ));
            }
        }

        Ok(received)
    }

    async fn ack_message(
        &self,
        queue_name: &str,
        receipt_handle: &ReceiptHandle,
    ) -> MessagingResult<()> {
        let message_id = parse_handle(receipt_handle)?;

        let mut queues = self.queues.write().await;
        let queue = queues
            .get_mut(queue_name)
            .ok_or_else(|| MessagingError::queue_not_found(queue_name))?;

        match queue.messages.iter().position(|m| m.id == message_id) {
            Some(pos) => {
                queue.messages.remove(pos);
                Ok(())
            }
            None => Err(MessagingError::message_not_found(message_id.to_string())),
        }
    }

    fn provider_name(&self) -> &'static str {
        "in_memory"
    }
}
