//! HTTP workflow launcher.
//!
//! `POST {base_url}/workflows/{workflow_id}/executions` with body `{"input": <json>}`;
//! the service answers `{"execution_id": "<id>"}`.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::WorkflowLauncher;
use crate::error::{IngestError, IngestResult};

#[derive(Debug, Deserialize)]
struct StartExecutionResponse {
    execution_id: String,
}

#[derive(Debug, Clone)]
pub struct HttpWorkflowLauncher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpWorkflowLauncher {
    pub fn new(base_url: impl Into<String>) -> IngestResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| IngestError::Configuration(format!("workflow client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn executions_url(&self, workflow_id: &str) -> String {
        format!("{}/workflows/{}/executions", self.base_url, workflow_id)
    }
}

#[async_trait]
impl WorkflowLauncher for HttpWorkflowLauncher {
    async fn start_execution(&self, workflow_id: &str, input: &Value) -> IngestResult<String> {
        let url = self.executions_url(workflow_id);
        debug!(workflow_id = %workflow_id, url = %url, "Starting workflow execution");

        let response = self
            .client
            .post(&url)
            .json(&json!({ "input": input }))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| IngestError::workflow(workflow_id, e.to_string()))?;

        let body: StartExecutionResponse = response
            .json()
            .await
            .map_err(|e| IngestError::workflow(workflow_id, e.to_string()))?;

        Ok(body.execution_id)
    }
}
