//! # Structured Logging Module
//!
//! Environment-aware console logging on the tracing ecosystem, plus a small set of
//! structured helpers for the two things this crate logs most: orchestration runs
//! and per-document operations.
//!
//! `RUST_LOG` wins when set. Otherwise the level follows the deployment environment
//! (`DOCINGEST_ENVIRONMENT`): `info` in production, `debug` everywhere else.
//! `DOCINGEST_LOG_FORMAT=json` switches to one JSON object per line.

use chrono::Utc;
use std::io::IsTerminal;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static TRACING_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize console tracing once per process
pub fn init_tracing() {
    TRACING_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(get_log_level(&environment)));
        let json = std::env::var("DOCINGEST_LOG_FORMAT")
            .map(|format| format.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let layer = if json {
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .json()
                .with_filter(filter)
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_ansi(std::io::stdout().is_terminal())
                .with_filter(filter)
                .boxed()
        };

        // A subscriber may already be installed by an embedding process
        if tracing_subscriber::registry().with(layer).try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized");
        }

        tracing::info!(environment = %environment, json = json, "Tracing initialized");
    });
}

fn get_environment() -> String {
    std::env::var("DOCINGEST_ENVIRONMENT").unwrap_or_else(|_| "development".to_string())
}

fn get_log_level(environment: &str) -> &'static str {
    match environment {
        "production" | "prod" => "info",
        _ => "debug",
    }
}

/// Log structured data for orchestration run milestones
pub fn log_run_operation(
    operation: &str,
    run_id: &str,
    status: &str,
    count: Option<usize>,
    details: Option<&str>,
) {
    tracing::info!(
        operation = %operation,
        run_id = %run_id,
        status = %status,
        count = count,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "RUN_OPERATION"
    );
}

/// Log structured data for per-document operations inside a fan-out worker
pub fn log_document_operation(
    operation: &str,
    document_id: &str,
    position: usize,
    batch_len: usize,
    status: &str,
    details: Option<&str>,
) {
    tracing::info!(
        operation = %operation,
        document_id = %document_id,
        position = position,
        batch_len = batch_len,
        status = %status,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "DOCUMENT_OPERATION"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_by_environment() {
        assert_eq!(get_log_level("production"), "info");
        assert_eq!(get_log_level("test"), "debug");
        assert_eq!(get_log_level("development"), "debug");
    }

    #[test]
    fn test_init_is_idempotent() {
        init_tracing();
        init_tracing();
        log_run_operation("test", "run-1", "ok", Some(1), None);
    }
}
