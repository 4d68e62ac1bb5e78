//! Fixed-answer status provider for tests and offline runs.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::InferenceStatusProvider;
use crate::error::{IngestError, IngestResult};

/// Answers status queries from a table; unknown services produce a query error
#[derive(Debug, Default)]
pub struct StaticStatusProvider {
    statuses: RwLock<HashMap<String, Result<String, String>>>,
    queries: RwLock<Vec<String>>,
}

impl StaticStatusProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(self, service: impl Into<String>, status: impl Into<String>) -> Self {
        self.statuses
            .write()
            .insert(service.into(), Ok(status.into()));
        self
    }

    /// Make queries for `service` fail with `reason`
    pub fn with_error(self, service: impl Into<String>, reason: impl Into<String>) -> Self {
        self.statuses
            .write()
            .insert(service.into(), Err(reason.into()));
        self
    }

    /// Services queried so far, in order
    pub fn queries(&self) -> Vec<String> {
        self.queries.read().clone()
    }
}

#[async_trait]
impl InferenceStatusProvider for StaticStatusProvider {
    async fn service_status(&self, service: &str) -> IngestResult<String> {
        self.queries.write().push(service.to_string());
        match self.statuses.read().get(service) {
            Some(Ok(status)) => Ok(status.clone()),
            Some(Err(reason)) => Err(IngestError::inference(service, reason.clone())),
            None => Err(IngestError::inference(service, "service not found")),
        }
    }
}
