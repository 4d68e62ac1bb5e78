//! # Workflow Trigger
//!
//! Waits a fixed settle delay after dispatch, then starts one execution of the
//! downstream workflow with an empty input. The delay is a heuristic grace
//! period for messages to land on the queue, not a completion barrier: the
//! workflow may start before every document has been enqueued.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tracing::{error, info, instrument};

use crate::error::IngestResult;
use crate::workflow::WorkflowLauncher;

pub struct WorkflowTrigger {
    launcher: Arc<dyn WorkflowLauncher>,
    workflow_id: String,
    settle_delay: Duration,
}

impl std::fmt::Debug for WorkflowTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowTrigger")
            .field("workflow_id", &self.workflow_id)
            .field("settle_delay", &self.settle_delay)
            .finish()
    }
}

impl WorkflowTrigger {
    pub fn new(
        launcher: Arc<dyn WorkflowLauncher>,
        workflow_id: impl Into<String>,
        settle_delay: Duration,
    ) -> Self {
        Self {
            launcher,
            workflow_id: workflow_id.into(),
            settle_delay,
        }
    }

    pub fn workflow_id(&self) -> &str {
        &self.workflow_id
    }

    /// Sleep for the settle delay, then start the workflow.
    ///
    /// Returns the execution id; a start failure is returned, not retried.
    #[instrument(skip(self), fields(workflow_id = %self.workflow_id, settle_ms = self.settle_delay.as_millis() as u64))]
    pub async fn settle_and_trigger(&self) -> IngestResult<String> {
        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }
        self.trigger().await
    }

    /// Start the workflow immediately
    pub async fn trigger(&self) -> IngestResult<String> {
        match self
            .launcher
            .start_execution(&self.workflow_id, &json!({}))
            .await
        {
            Ok(execution_id) => {
                info!(execution_id = %execution_id, "Workflow execution started");
                Ok(execution_id)
            }
            Err(e) => {
                error!(error = %e, "Workflow execution failed to start");
                Err(e)
            }
        }
    }
}
