//! # Orchestration
//!
//! The ingestion pipeline and its stages. [`IngestOrchestrator`] runs them in
//! order; each stage is usable on its own:
//!
//! - [`SourceSetResolver`]: raw-input minus processed-output
//! - [`ReadinessGate`]: fail-closed inference capacity check
//! - [`Batcher`]: fixed-size, order-preserving partitioning
//! - [`Dispatcher`]: fire-and-forget invocation of the fan-out worker per batch
//! - [`FanOutWorker`]: state record then work message, per document
//! - [`WorkflowTrigger`]: settle delay, then one workflow execution
//! - [`QueueBatchReceiver`]: consumer-side batch pull of work messages

pub mod batcher;
pub mod dispatcher;
pub mod fan_out_worker;
pub mod orchestrator;
pub mod readiness;
pub mod receiver;
pub mod resolver;
pub mod response;
pub mod workflow_trigger;

pub use batcher::Batcher;
pub use dispatcher::{DispatchReport, Dispatcher, FanOutInvoker, TaskFanOutInvoker};
pub use fan_out_worker::{DocumentFailure, FailureStage, FanOutReport, FanOutWorker};
pub use orchestrator::{IngestOrchestrator, OrchestratorDependencies, RunOutcome, RunSummary};
pub use readiness::{GateDecision, ReadinessGate, ServiceReadiness};
pub use receiver::{QueueBatchReceiver, ReceivedBatch, UndecodableMessage};
pub use resolver::{CandidateSet, SourceSetResolver};
pub use response::RunResponse;
pub use workflow_trigger::WorkflowTrigger;
