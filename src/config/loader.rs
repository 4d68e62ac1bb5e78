//! Configuration Loader
//!
//! Reads `DOCINGEST_*` environment variables through the `config` crate and
//! deserializes them into [`OrchestratorConfig`]. `DOCINGEST_INFERENCE_SERVICES`
//! is a comma-separated list; every other value is a scalar.

use std::collections::HashMap;

use config::{Config, Environment};
use tracing::debug;

use super::error::ConfigResult;
use super::OrchestratorConfig;

/// Prefix of every environment variable the orchestrator reads
pub const ENV_PREFIX: &str = "DOCINGEST";

const LIST_KEYS: [&str; 1] = ["inference_services"];

impl OrchestratorConfig {
    /// Load and validate configuration from the process environment
    pub fn from_env() -> ConfigResult<Self> {
        Self::load(Environment::with_prefix(ENV_PREFIX))
    }

    /// Load and validate configuration from an explicit variable map.
    ///
    /// Keys use the same names as the process environment (`DOCINGEST_BATCH_SIZE`, ...).
    pub fn from_source(vars: HashMap<String, String>) -> ConfigResult<Self> {
        Self::load(Environment::with_prefix(ENV_PREFIX).source(Some(vars)))
    }

    fn load(environment: Environment) -> ConfigResult<Self> {
        let mut environment = environment
            .prefix_separator("_")
            .try_parsing(true)
            .ignore_empty(true)
            .list_separator(",");
        for key in LIST_KEYS {
            environment = environment.with_list_parse_key(key);
        }

        let settings = Config::builder().add_source(environment).build()?;
        let config: OrchestratorConfig = settings.try_deserialize()?;
        config.validate()?;

        debug!(
            environment = %config.environment,
            input_namespace = %config.input_namespace,
            output_namespace = %config.output_namespace,
            batch_size = config.batch_size,
            check_inference_ready = config.check_inference_ready,
            workflow_id = %config.workflow_id,
            "Configuration loaded"
        );

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigurationError;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn required() -> Vec<(&'static str, &'static str)> {
        vec![
            ("DOCINGEST_INPUT_NAMESPACE", "raw-docs"),
            ("DOCINGEST_OUTPUT_NAMESPACE", "generated-titles"),
            ("DOCINGEST_WORKFLOW_ID", "genai-state-machine"),
        ]
    }

    #[test]
    fn test_load_applies_defaults() {
        let config = OrchestratorConfig::from_source(vars(&required())).unwrap();
        assert_eq!(config.input_namespace, "raw-docs");
        assert_eq!(config.output_namespace, "generated-titles");
        assert_eq!(config.batch_size, 10);
        assert_eq!(config.retention_days, 30);
        assert_eq!(config.settle_delay_seconds, 30);
        assert!(config.inference_services.is_empty());
    }

    #[test]
    fn test_load_parses_scalars_and_lists() {
        let mut pairs = required();
        pairs.extend([
            ("DOCINGEST_BATCH_SIZE", "25"),
            ("DOCINGEST_CHECK_INFERENCE_READY", "true"),
            ("DOCINGEST_INFERENCE_SERVICES", "llm-endpoint,ner-endpoint"),
            ("DOCINGEST_RETENTION_DAYS", "7"),
            ("DOCINGEST_SETTLE_DELAY_SECONDS", "5"),
            ("DOCINGEST_ENVIRONMENT", "staging"),
        ]);
        let config = OrchestratorConfig::from_source(vars(&pairs)).unwrap();

        assert_eq!(config.batch_size, 25);
        assert!(config.check_inference_ready);
        assert_eq!(config.retention_days, 7);
        assert_eq!(config.settle_delay_seconds, 5);
        assert_eq!(
            config.qualified_service_names(),
            vec!["staging-llm-endpoint", "staging-ner-endpoint"]
        );
    }

    #[test]
    fn test_load_reads_adapter_settings() {
        let mut pairs = required();
        pairs.extend([
            ("DOCINGEST_FAN_OUT_WORKER", "push_batch"),
            ("DOCINGEST_WORK_QUEUE", "titles_queue"),
            ("DOCINGEST_STATE_TABLE", "ingest_state"),
            ("DOCINGEST_PREFIX_SERVICE_NAMES", "false"),
            ("DOCINGEST_INFERENCE_SERVICES", "llm-endpoint"),
            ("DOCINGEST_RECEIVE_MAX_MESSAGES", "20"),
            ("DOCINGEST_RECEIVE_VISIBILITY_TIMEOUT_SECONDS", "90"),
            ("DOCINGEST_DATABASE_URL", "postgresql://localhost/docingest"),
            ("DOCINGEST_INFERENCE_STATUS_URL", "http://inference.local"),
            ("DOCINGEST_WORKFLOW_API_URL", "http://workflows.local"),
        ]);
        let config = OrchestratorConfig::from_source(vars(&pairs)).unwrap();

        assert_eq!(config.fan_out_worker, "push_batch");
        assert_eq!(config.work_queue, "titles_queue");
        assert_eq!(config.state_table, "ingest_state");
        assert_eq!(config.qualified_service_names(), vec!["llm-endpoint"]);
        assert_eq!(config.receive_max_messages, 20);
        assert_eq!(config.receive_visibility_timeout().as_secs(), 90);
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgresql://localhost/docingest")
        );
        assert_eq!(config.inference_status_url.as_deref(), Some("http://inference.local"));
        assert_eq!(config.workflow_api_url.as_deref(), Some("http://workflows.local"));
    }

    #[test]
    fn test_load_rejects_missing_required_field() {
        let result = OrchestratorConfig::from_source(vars(&[(
            "DOCINGEST_INPUT_NAMESPACE",
            "raw-docs",
        )]));
        assert!(matches!(
            result,
            Err(ConfigurationError::MissingRequiredField { .. })
        ));
    }

    #[test]
    fn test_load_rejects_zero_batch_size() {
        let mut pairs = required();
        pairs.push(("DOCINGEST_BATCH_SIZE", "0"));
        let result = OrchestratorConfig::from_source(vars(&pairs));
        assert!(matches!(result, Err(ConfigurationError::InvalidValue { .. })));
    }

    #[test]
    fn test_load_rejects_unparseable_batch_size() {
        let mut pairs = required();
        pairs.push(("DOCINGEST_BATCH_SIZE", "ten"));
        let result = OrchestratorConfig::from_source(vars(&pairs));
        assert!(matches!(
            result,
            Err(ConfigurationError::EnvironmentLoadError { .. })
        ));
    }
}
