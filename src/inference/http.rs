//! HTTP status provider.
//!
//! `GET {base_url}/services/{name}` is expected to answer `{"status": "<string>"}`.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::InferenceStatusProvider;
use crate::error::{IngestError, IngestResult};

#[derive(Debug, Deserialize)]
struct ServiceStatusResponse {
    status: String,
}

#[derive(Debug, Clone)]
pub struct HttpInferenceStatusProvider {
    client: reqwest::Client,
    base_url: String,
}

impl HttpInferenceStatusProvider {
    pub fn new(base_url: impl Into<String>) -> IngestResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| IngestError::Configuration(format!("inference status client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn status_url(&self, service: &str) -> String {
        format!("{}/services/{}", self.base_url, service)
    }
}

#[async_trait]
impl InferenceStatusProvider for HttpInferenceStatusProvider {
    async fn service_status(&self, service: &str) -> IngestResult<String> {
        let url = self.status_url(service);
        debug!(service = %service, url = %url, "Querying inference service status");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| IngestError::inference(service, e.to_string()))?;

        let body: ServiceStatusResponse = response
            .json()
            .await
            .map_err(|e| IngestError::inference(service, e.to_string()))?;

        Ok(body.status)
    }
}
