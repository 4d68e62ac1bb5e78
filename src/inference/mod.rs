//! # Inference Service Status
//!
//! Point-in-time status queries against the downstream inference services.
//! Results are never cached: every gate check asks again.

mod http;
mod static_status;

use async_trait::async_trait;

use crate::error::IngestResult;

pub use http::HttpInferenceStatusProvider;
pub use static_status::StaticStatusProvider;

/// Status query capability for named inference services
#[async_trait]
pub trait InferenceStatusProvider: Send + Sync + 'static {
    /// Current status string of `service` (e.g. `"InService"`, `"Creating"`)
    async fn service_status(&self, service: &str) -> IngestResult<String>;
}
