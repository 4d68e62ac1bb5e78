//! # Readiness Gate
//!
//! Backpressure check in front of dispatch. Dispatched work is never re-queued
//! if inference later fails, so the gate only opens when every configured
//! service confirms it is in service right now.
//!
//! - Gating disabled: always ready, no queries made.
//! - Blank service name: not applicable, does not block.
//! - Query error: treated as not ready (fail closed), never propagated.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::constants::ReadinessStatus;
use crate::inference::InferenceStatusProvider;

/// Readiness observed for one service during a gate check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceReadiness {
    pub service: String,
    pub status: ReadinessStatus,
    /// Raw status string, or the query error
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateDecision {
    pub ready: bool,
    /// False when gating is switched off by configuration
    pub checked: bool,
    pub services: Vec<ServiceReadiness>,
}

impl GateDecision {
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Services that held the gate closed
    pub fn not_ready_services(&self) -> Vec<&str> {
        self.services
            .iter()
            .filter(|s| !s.status.is_ready())
            .map(|s| s.service.as_str())
            .collect()
    }
}

pub struct ReadinessGate {
    enabled: bool,
    services: Vec<String>,
    provider: Arc<dyn InferenceStatusProvider>,
}

impl std::fmt::Debug for ReadinessGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadinessGate")
            .field("enabled", &self.enabled)
            .field("services", &self.services)
            .finish()
    }
}

impl ReadinessGate {
    pub fn new(
        enabled: bool,
        services: Vec<String>,
        provider: Arc<dyn InferenceStatusProvider>,
    ) -> Self {
        Self {
            enabled,
            services,
            provider,
        }
    }

    /// Query one service; any error or non-ready status is `NotReady`
    pub async fn check_service(&self, service: &str) -> ServiceReadiness {
        match self.provider.service_status(service).await {
            Ok(status) => {
                let readiness = ReadinessStatus::from_service_status(&status);
                info!(service = %service, status = %status, ready = readiness.is_ready(), "Inference service status");
                ServiceReadiness {
                    service: service.to_string(),
                    status: readiness,
                    detail: status,
                }
            }
            Err(error) => {
                warn!(service = %service, error = %error, "Inference status query failed, treating as not ready");
                ServiceReadiness {
                    service: service.to_string(),
                    status: ReadinessStatus::NotReady,
                    detail: error.to_string(),
                }
            }
        }
    }

    /// Combined decision: AND over every applicable service
    #[instrument(skip(self), fields(enabled = self.enabled, services = self.services.len()))]
    pub async fn evaluate(&self) -> GateDecision {
        if !self.enabled {
            return GateDecision {
                ready: true,
                checked: false,
                services: Vec::new(),
            };
        }

        let mut services = Vec::with_capacity(self.services.len());
        for service in self.services.iter().filter(|s| !s.trim().is_empty()) {
            services.push(self.check_service(service).await);
        }

        let ready = services.iter().all(|s| s.status.is_ready());
        info!(ready = ready, "Readiness gate evaluated");

        GateDecision {
            ready,
            checked: true,
            services,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::StaticStatusProvider;

    fn gate(enabled: bool, services: &[&str], provider: StaticStatusProvider) -> ReadinessGate {
        ReadinessGate::new(
            enabled,
            services.iter().map(|s| s.to_string()).collect(),
            Arc::new(provider),
        )
    }

    #[tokio::test]
    async fn test_disabled_gate_is_always_ready() {
        let provider = StaticStatusProvider::new().with_status("llm", "Failed");
        let decision = gate(false, &["llm"], provider).evaluate().await;
        assert!(decision.is_ready());
        assert!(!decision.checked);
    }

    #[tokio::test]
    async fn test_all_in_service_is_ready() {
        let provider = StaticStatusProvider::new()
            .with_status("llm", "InService")
            .with_status("ner", "InService");
        let decision = gate(true, &["llm", "ner"], provider).evaluate().await;
        assert!(decision.is_ready());
        assert_eq!(decision.services.len(), 2);
    }

    #[tokio::test]
    async fn test_one_not_in_service_blocks() {
        let provider = StaticStatusProvider::new()
            .with_status("llm", "InService")
            .with_status("ner", "Creating");
        let decision = gate(true, &["llm", "ner"], provider).evaluate().await;
        assert!(!decision.is_ready());
        assert_eq!(decision.not_ready_services(), vec!["ner"]);
    }

    #[tokio::test]
    async fn test_query_error_fails_closed() {
        let provider = StaticStatusProvider::new()
            .with_status("llm", "InService")
            .with_error("ner", "throttled");
        let decision = gate(true, &["llm", "ner"], provider).evaluate().await;
        assert!(!decision.is_ready());
        assert!(decision.services[1].detail.contains("throttled"));
    }

    #[tokio::test]
    async fn test_blank_service_names_are_not_applicable() {
        let provider = Arc::new(StaticStatusProvider::new().with_status("llm", "InService"));
        let gate = ReadinessGate::new(
            true,
            vec![String::new(), "llm".to_string(), "  ".to_string()],
            provider.clone(),
        );
        assert!(gate.evaluate().await.is_ready());
        assert_eq!(provider.queries(), vec!["llm".to_string()]);
    }

    #[tokio::test]
    async fn test_no_services_is_vacuously_ready() {
        let decision = gate(true, &[], StaticStatusProvider::new()).evaluate().await;
        assert!(decision.is_ready());
        assert!(decision.checked);
    }
}
