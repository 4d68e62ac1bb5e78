//! Test doubles for failure injection at each capability seam.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use docingest_core::error::{IngestError, IngestResult};
use docingest_core::messaging::{
    InMemoryWorkQueue, MessageId, MessagingError, MessagingResult, QueuedMessage, ReceiptHandle,
    WorkQueue,
};
use docingest_core::models::{Batch, DocumentId, DocumentStateRecord, WorkMessage};
use docingest_core::orchestration::{FanOutInvoker, TaskFanOutInvoker};
use docingest_core::state::{DocumentStore, InMemoryDocumentStore};
use docingest_core::storage::{ListPage, ObjectNamespace};

/// Namespace whose listing always fails
#[derive(Debug)]
pub struct UnlistableNamespace {
    pub name: String,
}

impl UnlistableNamespace {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

#[async_trait]
impl ObjectNamespace for UnlistableNamespace {
    fn name(&self) -> &str {
        &self.name
    }

    async fn list_page(&self, _continuation: Option<&str>) -> IngestResult<ListPage> {
        Err(IngestError::enumeration(&self.name, "access denied"))
    }
}

/// Work queue that rejects sends for selected document ids
#[derive(Debug)]
pub struct SelectiveFailureQueue {
    inner: Arc<InMemoryWorkQueue>,
    rejected: HashSet<String>,
}

impl SelectiveFailureQueue {
    pub fn new(inner: Arc<InMemoryWorkQueue>, rejected: &[&str]) -> Self {
        Self {
            inner,
            rejected: rejected.iter().map(|id| id.to_string()).collect(),
        }
    }
}

#[async_trait]
impl WorkQueue for SelectiveFailureQueue {
    async fn ensure_queue(&self, queue_name: &str) -> MessagingResult<()> {
        self.inner.ensure_queue(queue_name).await
    }

    async fn send_message(&self, queue_name: &str, body: &str) -> MessagingResult<MessageId> {
        let message: WorkMessage = serde_json::from_str(body)?;
        if self.rejected.contains(message.uid.as_str()) {
            return Err(MessagingError::queue_operation(queue_name, "send", "simulated outage"));
        }
        self.inner.send_message(queue_name, body).await
    }

    async fn receive_messages(
        &self,
        queue_name: &str,
        max_messages: usize,
        visibility_timeout: Duration,
    ) -> MessagingResult<Vec<QueuedMessage<String>>> {
        self.inner
            .receive_messages(queue_name, max_messages, visibility_timeout)
            .await
    }

    async fn ack_message(
        &self,
        queue_name: &str,
        receipt_handle: &ReceiptHandle,
    ) -> MessagingResult<()> {
        self.inner.ack_message(queue_name, receipt_handle).await
    }

    fn provider_name(&self) -> &'static str {
        "selective_failure"
    }
}

/// Invoker that rejects the invocations at the given positions and forwards the rest
pub struct FlakyInvoker {
    inner: Arc<TaskFanOutInvoker>,
    rejected_calls: HashSet<usize>,
    calls: AtomicUsize,
}

impl FlakyInvoker {
    pub fn new(inner: Arc<TaskFanOutInvoker>, rejected_calls: &[usize]) -> Self {
        Self {
            inner,
            rejected_calls: rejected_calls.iter().copied().collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FanOutInvoker for FlakyInvoker {
    async fn invoke(&self, worker: &str, batch: Batch) -> IngestResult<()> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.rejected_calls.contains(&call) {
            return Err(IngestError::dispatch(worker, "throttled"));
        }
        self.inner.invoke(worker, batch).await
    }
}

/// State store that rejects writes for selected document ids
pub struct FailingStore {
    inner: Arc<InMemoryDocumentStore>,
    rejected: HashSet<String>,
}

impl FailingStore {
    pub fn new(inner: Arc<InMemoryDocumentStore>, rejected: &[&str]) -> Self {
        Self {
            inner,
            rejected: rejected.iter().map(|id| id.to_string()).collect(),
        }
    }
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn put(&self, record: &DocumentStateRecord) -> IngestResult<()> {
        if self.rejected.contains(record.id.as_str()) {
            return Err(IngestError::StateStore("provisioned throughput exceeded".to_string()));
        }
        self.inner.put(record).await
    }

    async fn get(&self, id: &DocumentId) -> IngestResult<Option<DocumentStateRecord>> {
        self.inner.get(id).await
    }

    async fn remove(&self, id: &DocumentId) -> IngestResult<()> {
        self.inner.remove(id).await
    }
}
