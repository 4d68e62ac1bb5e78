//! Error types for the ingestion orchestrator.
//!

use crate::config::ConfigurationError;
use crate::messaging::MessagingError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum IngestError {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Enumeration error for namespace {namespace}: {reason}")]
    Enumeration { namespace: String, reason: String },
    #[error("State store error: {0}")]
    StateStore(String),
    #[error("Messaging error: {0}")]
    Messaging(String),
    #[error("Inference status error for {service}: {reason}")]
    Inference { service: String, reason: String },
    #[error("Dispatch error for worker {worker}: {reason}")]
    Dispatch { worker: String, reason: String },
    #[error("Workflow error for {workflow_id}: {reason}")]
    Workflow { workflow_id: String, reason: String },
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl IngestError {
    pub fn enumeration(namespace: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Enumeration {
            namespace: namespace.into(),
            reason: reason.into(),
        }
    }

    pub fn inference(service: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Inference {
            service: service.into(),
            reason: reason.into(),
        }
    }

    pub fn dispatch(worker: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Dispatch {
            worker: worker.into(),
            reason: reason.into(),
        }
    }

    pub fn workflow(workflow_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Workflow {
            workflow_id: workflow_id.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for IngestError {
    fn from(error: serde_json::Error) -> Self {
        IngestError::Serialization(format!("JSON serialization error: {error}"))
    }
}

impl From<sqlx::Error> for IngestError {
    fn from(err: sqlx::Error) -> Self {
        IngestError::StateStore(err.to_string())
    }
}

impl From<MessagingError> for IngestError {
    fn from(error: MessagingError) -> Self {
        IngestError::Messaging(error.to_string())
    }
}

impl From<ConfigurationError> for IngestError {
    fn from(error: ConfigurationError) -> Self {
        IngestError::Configuration(error.to_string())
    }
}

pub type IngestResult<T> = Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::enumeration("raw-bucket", "access denied");
        let display = format!("{err}");
        assert!(display.contains("raw-bucket"));
        assert!(display.contains("access denied"));

        let err = IngestError::dispatch("push_to_queue", "unreachable");
        assert!(format!("{err}").starts_with("Dispatch error"));
    }

    #[test]
    fn test_error_conversions() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid").unwrap_err();
        let err: IngestError = json_err.into();
        assert!(matches!(err, IngestError::Serialization(_)));

        let err: IngestError = MessagingError::queue_not_found("work").into();
        assert!(matches!(err, IngestError::Messaging(msg) if msg.contains("work")));

        let err: IngestError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, IngestError::StateStore(_)));
    }
}
