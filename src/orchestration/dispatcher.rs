//! # Dispatcher
//!
//! Hands each batch to the fan-out worker as an asynchronous, fire-and-forget
//! invocation. The dispatcher only learns whether the invocation was accepted;
//! it never waits for or inspects what the worker did with the batch.
//!
//! A rejected invocation is logged and counted, and dispatch continues with the
//! next batch. Its documents are picked up by the next resolver run.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use parking_lot::Mutex;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument};

use super::fan_out_worker::{FanOutReport, FanOutWorker};
use crate::error::{IngestError, IngestResult};
use crate::models::Batch;

/// Asynchronous invocation capability for named workers
#[async_trait]
pub trait FanOutInvoker: Send + Sync + 'static {
    /// Start `worker` on `batch` without waiting for it to finish.
    ///
    /// `Ok` means the invocation was accepted, nothing more.
    async fn invoke(&self, worker: &str, batch: Batch) -> IngestResult<()>;
}

/// In-process invoker: every invocation becomes a detached tokio task.
///
/// Handles are retained so a short-lived process can [`drain`](Self::drain)
/// outstanding work before it exits. The dispatcher itself never drains.
#[derive(Default)]
pub struct TaskFanOutInvoker {
    workers: HashMap<String, Arc<FanOutWorker>>,
    in_flight: Mutex<Vec<JoinHandle<FanOutReport>>>,
}

impl std::fmt::Debug for TaskFanOutInvoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskFanOutInvoker")
            .field("workers", &self.workers.keys().collect::<Vec<_>>())
            .field("in_flight", &self.in_flight.lock().len())
            .finish()
    }
}

impl TaskFanOutInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a worker under the name batches are dispatched to
    pub fn with_worker(mut self, name: impl Into<String>, worker: FanOutWorker) -> Self {
        self.workers.insert(name.into(), Arc::new(worker));
        self
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.lock().len()
    }

    /// Wait for every invocation started so far, returning the worker reports.
    ///
    /// A worker task that panicked contributes no report.
    pub async fn drain(&self) -> Vec<FanOutReport> {
        let handles: Vec<_> = std::mem::take(&mut *self.in_flight.lock());
        join_all(handles)
            .await
            .into_iter()
            .filter_map(|joined| match joined {
                Ok(report) => Some(report),
                Err(e) => {
                    error!(error = %e, "Fan-out task did not complete");
                    None
                }
            })
            .collect()
    }
}

#[async_trait]
impl FanOutInvoker for TaskFanOutInvoker {
    async fn invoke(&self, worker: &str, batch: Batch) -> IngestResult<()> {
        let target = self
            .workers
            .get(worker)
            .cloned()
            .ok_or_else(|| IngestError::dispatch(worker, "no such worker registered"))?;

        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| IngestError::dispatch(worker, format!("no runtime to run on: {e}")))?;
        let handle = runtime.spawn(async move { target.process_batch(&batch).await });
        self.in_flight.lock().push(handle);
        Ok(())
    }
}

/// Result of dispatching one run's batches
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    pub dispatched: usize,
    /// `(batch index, reason)` for every rejected invocation
    pub failed_batches: Vec<(usize, String)>,
}

impl DispatchReport {
    pub fn failed_count(&self) -> usize {
        self.failed_batches.len()
    }
}

pub struct Dispatcher {
    invoker: Arc<dyn FanOutInvoker>,
    worker: String,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("worker", &self.worker)
            .finish()
    }
}

impl Dispatcher {
    pub fn new(invoker: Arc<dyn FanOutInvoker>, worker: impl Into<String>) -> Self {
        Self {
            invoker,
            worker: worker.into(),
        }
    }

    pub fn worker(&self) -> &str {
        &self.worker
    }

    /// Invoke the worker once per batch, in batch order
    #[instrument(skip(self, batches), fields(worker = %self.worker, batches = batches.len()))]
    pub async fn dispatch(&self, batches: &[Batch]) -> DispatchReport {
        let mut report = DispatchReport::default();

        for (index, batch) in batches.iter().enumerate() {
            match self.invoker.invoke(&self.worker, batch.clone()).await {
                Ok(()) => {
                    debug!(batch_index = index, batch_len = batch.len(), "Batch dispatched");
                    report.dispatched += 1;
                }
                Err(e) => {
                    error!(batch_index = index, batch_len = batch.len(), error = %e, "Batch dispatch failed");
                    report.failed_batches.push((index, e.to_string()));
                }
            }
        }

        info!(
            dispatched = report.dispatched,
            failed = report.failed_count(),
            "Dispatch complete"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::InMemoryWorkQueue;
    use crate::models::DocumentId;
    use crate::state::InMemoryDocumentStore;

    fn batch(ids: &[&str]) -> Batch {
        ids.iter().map(|id| DocumentId::new(*id)).collect()
    }

    fn invoker(queue: Arc<InMemoryWorkQueue>) -> TaskFanOutInvoker {
        let worker = FanOutWorker::new(
            Arc::new(InMemoryDocumentStore::new()),
            queue,
            "work",
            chrono::Duration::days(30),
        );
        TaskFanOutInvoker::new().with_worker("push_to_queue", worker)
    }

    #[tokio::test]
    async fn test_dispatch_invokes_once_per_batch() {
        let queue = Arc::new(InMemoryWorkQueue::with_queues(&["work"]));
        let invoker = Arc::new(invoker(queue.clone()));
        let dispatcher = Dispatcher::new(invoker.clone(), "push_to_queue");

        let report = dispatcher
            .dispatch(&[batch(&["a", "b"]), batch(&["c"])])
            .await;
        assert_eq!(report.dispatched, 2);
        assert!(report.failed_batches.is_empty());

        let reports = invoker.drain().await;
        assert_eq!(
            reports.iter().map(FanOutReport::enqueued).collect::<Vec<_>>(),
            vec![2, 1]
        );
        assert_eq!(queue.total_sent("work").await, 3);
        assert_eq!(invoker.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_unknown_worker_fails_every_batch_and_continues() {
        let queue = Arc::new(InMemoryWorkQueue::with_queues(&["work"]));
        let dispatcher = Dispatcher::new(Arc::new(invoker(queue.clone())), "missing");

        let report = dispatcher
            .dispatch(&[batch(&["a"]), batch(&["b"])])
            .await;
        assert_eq!(report.dispatched, 0);
        assert_eq!(
            report.failed_batches.iter().map(|(i, _)| *i).collect::<Vec<_>>(),
            vec![0, 1]
        );
        assert_eq!(queue.total_sent("work").await, 0);
    }

    #[test]
    fn test_invoke_without_a_runtime_is_rejected() {
        let queue = Arc::new(InMemoryWorkQueue::with_queues(&["work"]));
        let invoker = invoker(queue);

        let result = futures::executor::block_on(invoker.invoke("push_to_queue", batch(&["a"])));

        assert!(matches!(result, Err(IngestError::Dispatch { .. })));
        assert_eq!(invoker.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_no_batches_no_invocations() {
        let queue = Arc::new(InMemoryWorkQueue::with_queues(&["work"]));
        let invoker = Arc::new(invoker(queue));
        let report = Dispatcher::new(invoker.clone(), "push_to_queue")
            .dispatch(&[])
            .await;
        assert_eq!(report, DispatchReport::default());
        assert_eq!(invoker.in_flight(), 0);
    }
}
