//! # System Constants
//!
//! Status enums and the default values of the orchestrator's configuration surface.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default configuration values
pub mod defaults {
    pub const ENVIRONMENT: &str = "development";
    pub const BATCH_SIZE: usize = 10;
    pub const RETENTION_DAYS: u32 = 30;
    pub const SETTLE_DELAY_SECONDS: u64 = 30;
    pub const FAN_OUT_WORKER: &str = "push_to_queue";
    pub const WORK_QUEUE: &str = "document_work_queue";
    pub const STATE_TABLE: &str = "document_state";
    pub const RECEIVE_MAX_MESSAGES: usize = 100;
    pub const RECEIVE_VISIBILITY_TIMEOUT_SECONDS: u64 = 30;
    pub const NAMESPACE_PAGE_SIZE: usize = 1000;
}

/// The only inference service status value that counts as ready
pub const IN_SERVICE: &str = "InService";

/// Headers attached to every successful run response
pub const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Headers", "Content-Type"),
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "OPTIONS,POST,GET"),
];

/// Ingestion status of a single document in the state store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentStatus {
    /// Dispatched to the work queue, not yet picked up
    Ingested,
    /// A consumer is running inference on the document
    Processing,
    /// Output written to the processed-output namespace
    Completed,
    /// Consumer gave up on the document
    Failed,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ingested => "INGESTED",
            Self::Processing => "PROCESSING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INGESTED" => Ok(Self::Ingested),
            "PROCESSING" => Ok(Self::Processing),
            "COMPLETED" => Ok(Self::Completed),
            "FAILED" => Ok(Self::Failed),
            other => Err(format!("unknown document status: {other}")),
        }
    }
}

/// Point-in-time readiness of one inference service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReadinessStatus {
    Ready,
    NotReady,
}

impl ReadinessStatus {
    /// Only the literal in-service status is ready; anything else is not.
    pub fn from_service_status(status: &str) -> Self {
        if status == IN_SERVICE {
            Self::Ready
        } else {
            Self::NotReady
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}
