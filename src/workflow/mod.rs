//! # Workflow Launching
//!
//! Starts executions of the named multi-step workflow that processes the
//! documents once dispatch has settled.

mod http;
mod recording;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::IngestResult;

pub use http::HttpWorkflowLauncher;
pub use recording::{RecordingWorkflowLauncher, WorkflowExecution};

/// Workflow execution capability
#[async_trait]
pub trait WorkflowLauncher: Send + Sync + 'static {
    /// Start one execution of `workflow_id` with `input`, returning its execution id
    async fn start_execution(&self, workflow_id: &str, input: &Value) -> IngestResult<String>;
}
