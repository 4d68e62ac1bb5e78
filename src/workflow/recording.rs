//! In-process launcher that records executions instead of starting them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use super::WorkflowLauncher;
use crate::error::{IngestError, IngestResult};

#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowExecution {
    pub execution_id: String,
    pub workflow_id: String,
    pub input: Value,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct RecordingWorkflowLauncher {
    executions: Mutex<Vec<WorkflowExecution>>,
    failure: Option<String>,
}

impl RecordingWorkflowLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Launcher whose every start fails with `reason`
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            executions: Mutex::new(Vec::new()),
            failure: Some(reason.into()),
        }
    }

    pub fn executions(&self) -> Vec<WorkflowExecution> {
        self.executions.lock().clone()
    }
}

#[async_trait]
impl WorkflowLauncher for RecordingWorkflowLauncher {
    async fn start_execution(&self, workflow_id: &str, input: &Value) -> IngestResult<String> {
        if let Some(reason) = &self.failure {
            return Err(IngestError::workflow(workflow_id, reason.clone()));
        }

        let execution = WorkflowExecution {
            execution_id: Uuid::new_v4().to_string(),
            workflow_id: workflow_id.to_string(),
            input: input.clone(),
            started_at: Utc::now(),
        };
        info!(
            workflow_id = %workflow_id,
            execution_id = %execution.execution_id,
            "Workflow execution recorded"
        );

        let execution_id = execution.execution_id.clone();
        self.executions.lock().push(execution);
        Ok(execution_id)
    }
}
