//! In-memory wiring of a complete orchestrator.

use std::sync::Arc;

use docingest_core::config::OrchestratorConfig;
use docingest_core::inference::StaticStatusProvider;
use docingest_core::messaging::{InMemoryWorkQueue, WorkQueue};
use docingest_core::orchestration::{
    FanOutInvoker, FanOutWorker, IngestOrchestrator, OrchestratorDependencies, TaskFanOutInvoker,
};
use docingest_core::state::{DocumentStore, InMemoryDocumentStore};
use docingest_core::storage::{InMemoryNamespace, ObjectNamespace};
use docingest_core::workflow::RecordingWorkflowLauncher;

pub const WORK_QUEUE: &str = "document_work_queue";
pub const WORKER: &str = "push_to_queue";

pub fn test_config(batch_size: usize) -> OrchestratorConfig {
    OrchestratorConfig {
        environment: "test".to_string(),
        input_namespace: "raw-docs".to_string(),
        output_namespace: "generated-titles".to_string(),
        workflow_id: "genai-state-machine".to_string(),
        batch_size,
        settle_delay_seconds: 0,
        ..OrchestratorConfig::default()
    }
}

pub fn doc_names(prefix: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{prefix}-{i:03}.txt")).collect()
}

/// Every capability of one orchestrator, kept so tests can inspect them afterwards
pub struct TestPipeline {
    pub config: OrchestratorConfig,
    pub raw_input: Arc<dyn ObjectNamespace>,
    pub processed_output: Arc<dyn ObjectNamespace>,
    pub store: Arc<InMemoryDocumentStore>,
    pub publish_store: Arc<dyn DocumentStore>,
    pub queue: Arc<InMemoryWorkQueue>,
    pub publish_queue: Arc<dyn WorkQueue>,
    pub status: Arc<StaticStatusProvider>,
    pub launcher: Arc<RecordingWorkflowLauncher>,
    pub invoker: Arc<TaskFanOutInvoker>,
    pub dispatch_invoker: Option<Arc<dyn FanOutInvoker>>,
}

impl TestPipeline {
    pub fn new(config: OrchestratorConfig, raw: &[&str], processed: &[&str]) -> Self {
        let queue = Arc::new(InMemoryWorkQueue::with_queues(&[WORK_QUEUE]));
        let store = Arc::new(InMemoryDocumentStore::new());
        let mut pipeline = Self {
            raw_input: Arc::new(InMemoryNamespace::new("raw-docs", raw.iter().copied())),
            processed_output: Arc::new(InMemoryNamespace::new(
                "generated-titles",
                processed.iter().copied(),
            )),
            publish_store: store.clone(),
            store,
            publish_queue: queue.clone(),
            queue,
            status: Arc::new(StaticStatusProvider::new()),
            launcher: Arc::new(RecordingWorkflowLauncher::new()),
            invoker: Arc::new(TaskFanOutInvoker::new()),
            dispatch_invoker: None,
            config,
        };
        pipeline.rebuild_invoker();
        pipeline
    }

    pub fn with_status_provider(mut self, status: StaticStatusProvider) -> Self {
        self.status = Arc::new(status);
        self
    }

    pub fn with_raw_input(mut self, namespace: Arc<dyn ObjectNamespace>) -> Self {
        self.raw_input = namespace;
        self
    }

    /// Publish through `queue` instead of straight into the in-memory queue
    pub fn with_publish_queue(mut self, queue: Arc<dyn WorkQueue>) -> Self {
        self.publish_queue = queue;
        self.rebuild_invoker();
        self
    }

    /// Record state through `store` instead of straight into the in-memory store
    pub fn with_publish_store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.publish_store = store;
        self.rebuild_invoker();
        self
    }

    /// Share the state store of an earlier pipeline, as consecutive runs do
    pub fn with_store(mut self, store: Arc<InMemoryDocumentStore>) -> Self {
        self.publish_store = store.clone();
        self.store = store;
        self.rebuild_invoker();
        self
    }

    /// Dispatch through a wrapper around the task invoker
    pub fn with_dispatch_invoker<F>(mut self, wrap: F) -> Self
    where
        F: FnOnce(Arc<TaskFanOutInvoker>) -> Arc<dyn FanOutInvoker>,
    {
        self.dispatch_invoker = Some(wrap(self.invoker.clone()));
        self
    }

    fn rebuild_invoker(&mut self) {
        let worker = FanOutWorker::new(
            self.publish_store.clone(),
            self.publish_queue.clone(),
            WORK_QUEUE,
            self.config.retention(),
        );
        self.invoker = Arc::new(TaskFanOutInvoker::new().with_worker(WORKER, worker));
    }

    pub fn orchestrator(&self) -> IngestOrchestrator {
        let invoker: Arc<dyn FanOutInvoker> = match &self.dispatch_invoker {
            Some(invoker) => invoker.clone(),
            None => self.invoker.clone() as Arc<dyn FanOutInvoker>,
        };
        let deps = OrchestratorDependencies {
            raw_input: self.raw_input.clone(),
            processed_output: self.processed_output.clone(),
            status_provider: self.status.clone(),
            invoker,
            launcher: self.launcher.clone(),
        };
        IngestOrchestrator::new(&self.config, deps).expect("valid test configuration")
    }
}
