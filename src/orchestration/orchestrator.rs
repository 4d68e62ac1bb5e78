//! # Ingestion Orchestrator
//!
//! One run, strictly in sequence:
//!
//! ```text
//! resolve -> gate -> batch -> dispatch all -> settle -> trigger workflow
//! ```
//!
//! A listing failure aborts the run with an error and nothing is dispatched.
//! A closed gate ends the run with [`RunOutcome::CapacityNotReady`]: no
//! batches, no workflow. Dispatch and workflow failures are recorded in the
//! [`RunSummary`] and never turn a dispatched run into an error.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::batcher::Batcher;
use super::dispatcher::{DispatchReport, Dispatcher, FanOutInvoker};
use super::readiness::{GateDecision, ReadinessGate};
use super::resolver::SourceSetResolver;
use super::workflow_trigger::WorkflowTrigger;
use crate::config::OrchestratorConfig;
use crate::error::IngestResult;
use crate::inference::InferenceStatusProvider;
use crate::logging::log_run_operation;
use crate::storage::ObjectNamespace;
use crate::workflow::WorkflowLauncher;

/// External capabilities one orchestrator is wired to
pub struct OrchestratorDependencies {
    pub raw_input: Arc<dyn ObjectNamespace>,
    pub processed_output: Arc<dyn ObjectNamespace>,
    pub status_provider: Arc<dyn InferenceStatusProvider>,
    pub invoker: Arc<dyn FanOutInvoker>,
    pub launcher: Arc<dyn WorkflowLauncher>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// Gate passed and every batch was offered to the fan-out worker
    Dispatched,
    /// Gate denied dispatch; nothing was dispatched or triggered
    CapacityNotReady,
}

/// Everything one run observed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub outcome: RunOutcome,
    pub candidates: usize,
    pub batch_sizes: Vec<usize>,
    pub gate: GateDecision,
    pub dispatch: DispatchReport,
    pub workflow_execution_id: Option<String>,
    pub workflow_error: Option<String>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl RunSummary {
    pub fn is_dispatched(&self) -> bool {
        self.outcome == RunOutcome::Dispatched
    }

    pub fn batches_dispatched(&self) -> usize {
        self.dispatch.dispatched
    }

    pub fn batches_failed(&self) -> usize {
        self.dispatch.failed_count()
    }

    pub fn workflow_triggered(&self) -> bool {
        self.workflow_execution_id.is_some()
    }
}

pub struct IngestOrchestrator {
    resolver: SourceSetResolver,
    gate: ReadinessGate,
    batcher: Batcher,
    dispatcher: Dispatcher,
    trigger: WorkflowTrigger,
}

impl std::fmt::Debug for IngestOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestOrchestrator")
            .field("resolver", &self.resolver)
            .field("gate", &self.gate)
            .field("batcher", &self.batcher)
            .field("dispatcher", &self.dispatcher)
            .field("trigger", &self.trigger)
            .finish()
    }
}

impl IngestOrchestrator {
    /// Assemble the pipeline from configuration and capabilities
    pub fn new(config: &OrchestratorConfig, deps: OrchestratorDependencies) -> IngestResult<Self> {
        let batcher = Batcher::new(config.batch_size)?;

        Ok(Self {
            resolver: SourceSetResolver::new(deps.raw_input, deps.processed_output),
            gate: ReadinessGate::new(
                config.check_inference_ready,
                config.qualified_service_names(),
                deps.status_provider,
            ),
            batcher,
            dispatcher: Dispatcher::new(deps.invoker, config.fan_out_worker.clone()),
            trigger: WorkflowTrigger::new(
                deps.launcher,
                config.workflow_id.clone(),
                config.settle_delay(),
            ),
        })
    }

    /// Execute one orchestration run
    #[instrument(skip(self))]
    pub async fn run(&self) -> IngestResult<RunSummary> {
        let run_id = Uuid::new_v4();
        let run_label = run_id.to_string();
        let started_at = Utc::now();
        log_run_operation("run", &run_label, "started", None, None);

        let candidates = match self.resolver.resolve().await {
            Ok(candidates) => candidates,
            Err(e) => {
                log_run_operation("resolve", &run_label, "failed", None, Some(&e.to_string()));
                return Err(e);
            }
        };
        let candidate_count = candidates.len();
        log_run_operation("resolve", &run_label, "completed", Some(candidate_count), None);

        let gate = self.gate.evaluate().await;
        if !gate.is_ready() {
            let blocked = gate.not_ready_services().join(",");
            warn!(run_id = %run_id, services = %blocked, "Capacity not ready, skipping dispatch");
            log_run_operation("gate", &run_label, "capacity_not_ready", None, Some(&blocked));

            return Ok(RunSummary {
                run_id,
                outcome: RunOutcome::CapacityNotReady,
                candidates: candidate_count,
                batch_sizes: Vec::new(),
                gate,
                dispatch: DispatchReport::default(),
                workflow_execution_id: None,
                workflow_error: None,
                started_at,
                completed_at: Utc::now(),
            });
        }

        let batches = self.batcher.partition(candidates.into_ids());
        let batch_sizes = batches.iter().map(|b| b.len()).collect();

        let dispatch = self.dispatcher.dispatch(&batches).await;
        log_run_operation(
            "dispatch",
            &run_label,
            "completed",
            Some(dispatch.dispatched),
            None,
        );

        let (workflow_execution_id, workflow_error) =
            match self.trigger.settle_and_trigger().await {
                Ok(execution_id) => (Some(execution_id), None),
                Err(e) => {
                    log_run_operation("trigger", &run_label, "failed", None, Some(&e.to_string()));
                    (None, Some(e.to_string()))
                }
            };

        let summary = RunSummary {
            run_id,
            outcome: RunOutcome::Dispatched,
            candidates: candidate_count,
            batch_sizes,
            gate,
            dispatch,
            workflow_execution_id,
            workflow_error,
            started_at,
            completed_at: Utc::now(),
        };

        info!(
            run_id = %run_id,
            candidates = summary.candidates,
            batches_dispatched = summary.batches_dispatched(),
            batches_failed = summary.batches_failed(),
            workflow_triggered = summary.workflow_triggered(),
            "Orchestration run complete"
        );
        log_run_operation("run", &run_label, "completed", Some(summary.batches_dispatched()), None);

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IngestError;
    use crate::inference::StaticStatusProvider;
    use crate::models::Batch;
    use crate::storage::InMemoryNamespace;
    use crate::workflow::RecordingWorkflowLauncher;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct CountingInvoker {
        batches: Mutex<Vec<Batch>>,
    }

    #[async_trait]
    impl FanOutInvoker for CountingInvoker {
        async fn invoke(&self, _worker: &str, batch: Batch) -> IngestResult<()> {
            self.batches.lock().push(batch);
            Ok(())
        }
    }

    fn config(batch_size: usize, gated: bool) -> OrchestratorConfig {
        OrchestratorConfig {
            input_namespace: "raw".to_string(),
            output_namespace: "out".to_string(),
            workflow_id: "wf".to_string(),
            batch_size,
            check_inference_ready: gated,
            inference_services: vec!["llm".to_string()],
            prefix_service_names: false,
            settle_delay_seconds: 0,
            ..OrchestratorConfig::default()
        }
    }

    struct Harness {
        invoker: Arc<CountingInvoker>,
        launcher: Arc<RecordingWorkflowLauncher>,
        orchestrator: IngestOrchestrator,
    }

    fn harness(config: OrchestratorConfig, raw: &[&str], out: &[&str], status: &str) -> Harness {
        let invoker = Arc::new(CountingInvoker::default());
        let launcher = Arc::new(RecordingWorkflowLauncher::new());
        let deps = OrchestratorDependencies {
            raw_input: Arc::new(InMemoryNamespace::new("raw", raw.iter().copied())),
            processed_output: Arc::new(InMemoryNamespace::new("out", out.iter().copied())),
            status_provider: Arc::new(StaticStatusProvider::new().with_status("llm", status)),
            invoker: invoker.clone(),
            launcher: launcher.clone(),
        };
        Harness {
            invoker,
            launcher,
            orchestrator: IngestOrchestrator::new(&config, deps).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_run_dispatches_candidates_and_triggers() {
        let h = harness(config(10, true), &["a.txt", "b.txt"], &["a.txt"], "InService");

        let summary = h.orchestrator.run().await.unwrap();

        assert_eq!(summary.outcome, RunOutcome::Dispatched);
        assert_eq!(summary.candidates, 1);
        assert_eq!(summary.batch_sizes, vec![1]);
        assert_eq!(summary.batches_dispatched(), 1);
        assert!(summary.workflow_triggered());
        assert_eq!(h.invoker.batches.lock()[0].documents()[0].as_str(), "b.txt");
        assert_eq!(h.launcher.executions().len(), 1);
    }

    #[tokio::test]
    async fn test_closed_gate_skips_dispatch_and_trigger() {
        let h = harness(config(10, true), &["a.txt"], &[], "Creating");

        let summary = h.orchestrator.run().await.unwrap();

        assert_eq!(summary.outcome, RunOutcome::CapacityNotReady);
        assert!(h.invoker.batches.lock().is_empty());
        assert!(h.launcher.executions().is_empty());
        assert_eq!(summary.gate.not_ready_services(), vec!["llm"]);
    }

    #[tokio::test]
    async fn test_empty_candidate_set_still_triggers() {
        let h = harness(config(10, false), &["a.txt"], &["a.txt"], "InService");

        let summary = h.orchestrator.run().await.unwrap();

        assert_eq!(summary.candidates, 0);
        assert_eq!(summary.batches_dispatched(), 0);
        assert!(summary.workflow_triggered());
    }

    #[tokio::test]
    async fn test_workflow_failure_keeps_dispatched_outcome() {
        let invoker = Arc::new(CountingInvoker::default());
        let deps = OrchestratorDependencies {
            raw_input: Arc::new(InMemoryNamespace::new("raw", ["a.txt"])),
            processed_output: Arc::new(InMemoryNamespace::new("out", Vec::<String>::new())),
            status_provider: Arc::new(StaticStatusProvider::new()),
            invoker: invoker.clone(),
            launcher: Arc::new(RecordingWorkflowLauncher::failing("throttled")),
        };
        let orchestrator = IngestOrchestrator::new(&config(10, false), deps).unwrap();

        let summary = orchestrator.run().await.unwrap();

        assert!(summary.is_dispatched());
        assert_eq!(summary.batches_dispatched(), 1);
        assert!(!summary.workflow_triggered());
        assert!(summary.workflow_error.unwrap().contains("throttled"));
    }

    #[tokio::test]
    async fn test_zero_batch_size_is_rejected_at_construction() {
        let deps = OrchestratorDependencies {
            raw_input: Arc::new(InMemoryNamespace::new("raw", Vec::<String>::new())),
            processed_output: Arc::new(InMemoryNamespace::new("out", Vec::<String>::new())),
            status_provider: Arc::new(StaticStatusProvider::new()),
            invoker: Arc::new(CountingInvoker::default()),
            launcher: Arc::new(RecordingWorkflowLauncher::new()),
        };
        let result = IngestOrchestrator::new(&config(0, false), deps);
        assert!(matches!(result, Err(IngestError::Configuration(_))));
    }
}
