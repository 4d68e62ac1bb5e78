//! # Ingest Orchestrator
//!
//! Command-line entry point. Loads `DOCINGEST_*` configuration, wires the
//! real adapters and executes one orchestration run or one consumer-side
//! batch receive.
//!
//! Without `DOCINGEST_DATABASE_URL` the state store and work queue are
//! in-process only, which is useful for dry runs against a local directory.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

use docingest_core::config::OrchestratorConfig;
use docingest_core::inference::{
    HttpInferenceStatusProvider, InferenceStatusProvider, StaticStatusProvider,
};
use docingest_core::logging::init_tracing;
use docingest_core::messaging::{InMemoryWorkQueue, PgmqWorkQueue, WorkQueue};
use docingest_core::orchestration::{
    FanOutWorker, IngestOrchestrator, OrchestratorDependencies, QueueBatchReceiver, RunResponse,
    TaskFanOutInvoker,
};
use docingest_core::state::{DocumentStore, InMemoryDocumentStore, PgDocumentStore};
use docingest_core::storage::FsNamespace;
use docingest_core::workflow::{HttpWorkflowLauncher, RecordingWorkflowLauncher, WorkflowLauncher};

#[derive(Parser)]
#[command(name = "ingest-orchestrator")]
#[command(about = "Resolve, gate, batch and dispatch documents for ingestion")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute one orchestration run
    Run,

    /// Receive one batch of work messages and print their document ids
    Receive {
        /// Acknowledge (delete) every decoded message after printing it
        #[arg(long)]
        ack: bool,
    },

    /// Delete expired document state records
    PurgeExpired,

    /// Load and validate configuration, then print it
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = OrchestratorConfig::from_env().context("loading configuration")?;

    match cli.command {
        Commands::Run => run(&config).await,
        Commands::Receive { ack } => receive(&config, ack).await,
        Commands::PurgeExpired => purge_expired(&config).await,
        Commands::CheckConfig => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

async fn run(config: &OrchestratorConfig) -> Result<()> {
    let store = document_store(config).await?;
    let queue = work_queue(config).await?;

    let worker = FanOutWorker::new(store, queue, config.work_queue.clone(), config.retention());
    let invoker = Arc::new(TaskFanOutInvoker::new().with_worker(config.fan_out_worker.clone(), worker));

    let deps = OrchestratorDependencies {
        raw_input: Arc::new(FsNamespace::new(&config.input_namespace)),
        processed_output: Arc::new(FsNamespace::new(&config.output_namespace)),
        status_provider: status_provider(config)?,
        invoker: invoker.clone(),
        launcher: workflow_launcher(config)?,
    };
    let orchestrator = IngestOrchestrator::new(config, deps)?;

    let summary = orchestrator.run().await?;
    let response = RunResponse::from(&summary);

    // The process exits after the run, so let detached workers finish first
    for report in invoker.drain().await {
        if report.failed() > 0 {
            warn!(
                enqueued = report.enqueued(),
                failed = report.failed(),
                "Fan-out batch completed with failures"
            );
        }
    }

    println!("{}", serde_json::to_string_pretty(&response)?);
    if !response.is_success() {
        anyhow::bail!("run ended with status {}", response.status_code);
    }
    Ok(())
}

async fn receive(config: &OrchestratorConfig, ack: bool) -> Result<()> {
    let receiver = QueueBatchReceiver::new(
        work_queue(config).await?,
        config.work_queue.clone(),
        config.receive_max_messages,
        config.receive_visibility_timeout(),
    );

    let batch = receiver.receive().await?;
    for message in &batch.messages {
        println!("{}", message.message.uid);
        if ack {
            receiver.ack(&message.receipt_handle).await?;
        }
    }
    for bad in &batch.undecodable {
        error!(receipt = %bad.receipt_handle, reason = %bad.reason, "Skipping undecodable message");
    }

    info!(
        received = batch.messages.len(),
        undecodable = batch.undecodable.len(),
        acked = ack,
        "Batch receive complete"
    );
    Ok(())
}

async fn purge_expired(config: &OrchestratorConfig) -> Result<()> {
    let url = config
        .database_url
        .as_deref()
        .context("DOCINGEST_DATABASE_URL is required to purge state records")?;
    let store = PgDocumentStore::connect(url, config.state_table.clone()).await?;
    let purged = store.purge_expired(Utc::now()).await?;
    info!(purged = purged, table = %config.state_table, "Expired state records purged");
    Ok(())
}

async fn document_store(config: &OrchestratorConfig) -> Result<Arc<dyn DocumentStore>> {
    match config.database_url.as_deref() {
        Some(url) => {
            let store = PgDocumentStore::connect(url, config.state_table.clone()).await?;
            store.ensure_schema().await?;
            Ok(Arc::new(store))
        }
        None => {
            warn!("No database configured, document state is kept in memory");
            Ok(Arc::new(InMemoryDocumentStore::new()))
        }
    }
}

async fn work_queue(config: &OrchestratorConfig) -> Result<Arc<dyn WorkQueue>> {
    let queue: Arc<dyn WorkQueue> = match config.database_url.as_deref() {
        Some(url) => Arc::new(PgmqWorkQueue::connect(url).await?),
        None => {
            warn!("No database configured, work messages are kept in memory");
            Arc::new(InMemoryWorkQueue::new())
        }
    };
    queue.ensure_queue(&config.work_queue).await?;
    Ok(queue)
}

fn status_provider(config: &OrchestratorConfig) -> Result<Arc<dyn InferenceStatusProvider>> {
    match config.inference_status_url.as_deref() {
        Some(url) => Ok(Arc::new(HttpInferenceStatusProvider::new(url)?)),
        None => {
            if config.check_inference_ready {
                warn!("Readiness gating enabled without a status endpoint, every service reads as not ready");
            }
            Ok(Arc::new(StaticStatusProvider::new()))
        }
    }
}

fn workflow_launcher(config: &OrchestratorConfig) -> Result<Arc<dyn WorkflowLauncher>> {
    match config.workflow_api_url.as_deref() {
        Some(url) => Ok(Arc::new(HttpWorkflowLauncher::new(url)?)),
        None => {
            warn!("No workflow API configured, executions are only recorded locally");
            Ok(Arc::new(RecordingWorkflowLauncher::new()))
        }
    }
}
