#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # DocIngest Core
//!
//! Orchestration core for a document ingestion pipeline that feeds downstream
//! inference services (title generation, summarization, entity extraction).
//!
//! ## Overview
//!
//! A single orchestration run:
//!
//! 1. **Resolves** the candidate set: documents present in the raw-input namespace
//!    but absent from the processed-output namespace.
//! 2. **Gates** dispatch on the readiness of the downstream inference services.
//! 3. **Batches** the candidates into fixed-size batches.
//! 4. **Dispatches** each batch fire-and-forget to a fan-out worker, which records
//!    per-document state and enqueues one work message per document.
//! 5. **Settles** for a configured delay and then **triggers** the downstream workflow.
//!
//! Documents that fail anywhere along the way never reach the output namespace, so
//! they are re-discovered by the next run. There are no retries inside a run.
//!
//! ## Module Organization
//!
//! - [`config`] - Explicit orchestrator configuration loaded from the environment
//! - [`error`] - Structured error handling
//! - [`models`] - Document ids, batches, state records and work messages
//! - [`storage`] - Document namespace enumeration (in-memory, filesystem)
//! - [`state`] - Durable per-document state store (in-memory, PostgreSQL)
//! - [`messaging`] - Work queue (in-memory, pgmq)
//! - [`inference`] - Inference service status queries
//! - [`workflow`] - Downstream workflow launching
//! - [`orchestration`] - Resolver, gate, batcher, dispatcher, fan-out worker and the run itself
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docingest_core::orchestration::IngestOrchestrator;
//!
//! # async fn example(orchestrator: IngestOrchestrator) -> Result<(), Box<dyn std::error::Error>> {
//! let summary = orchestrator.run().await?;
//! println!("dispatched {} batches", summary.batches_dispatched());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod inference;
pub mod logging;
pub mod messaging;
pub mod models;
pub mod orchestration;
pub mod state;
pub mod storage;
pub mod workflow;

pub use config::OrchestratorConfig;
pub use constants::{DocumentStatus, ReadinessStatus};
pub use error::{IngestError, IngestResult};
pub use models::{Batch, DocumentId, DocumentStateRecord, WorkMessage};
pub use orchestration::{IngestOrchestrator, RunOutcome, RunSummary};
