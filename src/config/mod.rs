//! # Orchestrator Configuration
//!
//! Explicit configuration passed to every component at construction time.
//! Values come from `DOCINGEST_`-prefixed environment variables (see [`loader`]),
//! are read once, and are never consulted as process-wide state afterwards.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use docingest_core::config::OrchestratorConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = OrchestratorConfig::from_env()?;
//! println!("batch size: {}", config.batch_size);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::defaults;

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ENV_PREFIX;

/// Root configuration for one orchestrator process
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Deployment environment; also used to qualify inference service names
    pub environment: String,

    /// Raw-input namespace (documents to ingest)
    pub input_namespace: String,

    /// Processed-output namespace (documents already handled)
    pub output_namespace: String,

    /// Maximum number of documents handed to one fan-out worker invocation
    pub batch_size: usize,

    /// Gate dispatch on inference service readiness
    pub check_inference_ready: bool,

    /// Inference services whose readiness gates dispatch
    pub inference_services: Vec<String>,

    /// Qualify inference service names as `{environment}-{name}`
    pub prefix_service_names: bool,

    /// Days a document state record lives before the store expires it
    pub retention_days: u32,

    /// Wait between the last dispatch and the workflow trigger
    pub settle_delay_seconds: u64,

    /// Name of the fan-out worker batches are dispatched to
    pub fan_out_worker: String,

    /// Workflow started once dispatch has settled
    pub workflow_id: String,

    /// Queue receiving one work message per document
    pub work_queue: String,

    /// Table holding document state records
    pub state_table: String,

    /// Upper bound on messages pulled by one batch receive
    pub receive_max_messages: usize,

    /// Visibility timeout applied to batch-received messages
    pub receive_visibility_timeout_seconds: u64,

    pub database_url: Option<String>,
    pub inference_status_url: Option<String>,
    pub workflow_api_url: Option<String>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            environment: defaults::ENVIRONMENT.to_string(),
            input_namespace: String::new(),
            output_namespace: String::new(),
            batch_size: defaults::BATCH_SIZE,
            check_inference_ready: false,
            inference_services: Vec::new(),
            prefix_service_names: true,
            retention_days: defaults::RETENTION_DAYS,
            settle_delay_seconds: defaults::SETTLE_DELAY_SECONDS,
            fan_out_worker: defaults::FAN_OUT_WORKER.to_string(),
            workflow_id: String::new(),
            work_queue: defaults::WORK_QUEUE.to_string(),
            state_table: defaults::STATE_TABLE.to_string(),
            receive_max_messages: defaults::RECEIVE_MAX_MESSAGES,
            receive_visibility_timeout_seconds: defaults::RECEIVE_VISIBILITY_TIMEOUT_SECONDS,
            database_url: None,
            inference_status_url: None,
            workflow_api_url: None,
        }
    }
}

impl OrchestratorConfig {
    /// Validate the configuration, rejecting values no run could use
    pub fn validate(&self) -> ConfigResult<()> {
        let context = "orchestrator configuration";

        if self.input_namespace.trim().is_empty() {
            return Err(ConfigurationError::missing_required_field(
                "input_namespace",
                context,
            ));
        }
        if self.output_namespace.trim().is_empty() {
            return Err(ConfigurationError::missing_required_field(
                "output_namespace",
                context,
            ));
        }
        if self.workflow_id.trim().is_empty() {
            return Err(ConfigurationError::missing_required_field(
                "workflow_id",
                context,
            ));
        }
        if self.fan_out_worker.trim().is_empty() {
            return Err(ConfigurationError::missing_required_field(
                "fan_out_worker",
                context,
            ));
        }
        if self.batch_size == 0 {
            return Err(ConfigurationError::invalid_value(
                "batch_size",
                "0",
                "batch size must be a positive integer",
            ));
        }
        if self.retention_days == 0 {
            return Err(ConfigurationError::invalid_value(
                "retention_days",
                "0",
                "retention period must be at least one day",
            ));
        }
        if self.receive_max_messages == 0 {
            return Err(ConfigurationError::invalid_value(
                "receive_max_messages",
                "0",
                "batch receive must request at least one message",
            ));
        }

        Ok(())
    }

    /// Retention period of a document state record
    pub fn retention(&self) -> chrono::Duration {
        chrono::Duration::days(i64::from(self.retention_days))
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_secs(self.settle_delay_seconds)
    }

    pub fn receive_visibility_timeout(&self) -> Duration {
        Duration::from_secs(self.receive_visibility_timeout_seconds)
    }

    /// Inference service names as queried, in configured order.
    ///
    /// Blank names are kept (trimmed to empty) so the gate can treat them as not applicable.
    pub fn qualified_service_names(&self) -> Vec<String> {
        self.inference_services
            .iter()
            .map(|name| {
                let name = name.trim();
                if name.is_empty() || !self.prefix_service_names {
                    name.to_string()
                } else {
                    format!("{}-{}", self.environment, name)
                }
            })
            .collect()
    }
}
