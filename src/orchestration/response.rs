//! HTTP-style response for a run, as returned to the scheduler that triggered it.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{json, Value};

use super::orchestrator::{RunOutcome, RunSummary};
use crate::constants::CORS_HEADERS;

pub const CAPACITY_NOT_READY: &str = "capacity not ready";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: Value,
}

impl RunResponse {
    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}

impl From<&RunSummary> for RunResponse {
    fn from(summary: &RunSummary) -> Self {
        match summary.outcome {
            RunOutcome::Dispatched => Self {
                status_code: 200,
                headers: CORS_HEADERS
                    .iter()
                    .map(|(name, value)| (name.to_string(), value.to_string()))
                    .collect(),
                body: json!({
                    "batches_dispatched": summary.batches_dispatched(),
                    "batches_failed": summary.batches_failed(),
                    "candidates": summary.candidates,
                    "workflow_triggered": summary.workflow_triggered(),
                }),
            },
            RunOutcome::CapacityNotReady => Self {
                status_code: 500,
                headers: BTreeMap::new(),
                body: json!({ "error": CAPACITY_NOT_READY }),
            },
        }
    }
}
