//! Structured logging setup.

use crate::domain::RegistryError;
use std::env;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Log level filter (trace, debug, info, warn, error) or directive list.
    pub log_level: String,

    /// Whether to emit JSON formatted logs.
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// - `PROFILES_LOG_LEVEL` or `RUST_LOG`: filter (default: info)
    /// - `PROFILES_JSON_LOGS`: JSON output (default: false)
    pub fn from_env() -> Self {
        Self {
            log_level: env::var("PROFILES_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),
            json_logs: env::var("PROFILES_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(false),
        }
    }
}

/// Install the global tracing subscriber.
///
/// Fails if the filter does not parse or a subscriber is already installed.
pub fn init_tracing(config: &TelemetryConfig) -> Result<(), RegistryError> {
    let env_filter = EnvFilter::try_new(&config.log_level)
        .map_err(|e| RegistryError::Config(format!("log level {}: {e}", config.log_level)))?;

    if config.json_logs {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true);
        tracing_subscriber::registry()
            .with(env_filter)
            .with(json_layer)
            .try_init()
            .map_err(|e| RegistryError::Config(e.to_string()))?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(false);
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| RegistryError::Config(e.to_string()))?;
    }

    tracing::info!(
        json = config.json_logs,
        level = %config.log_level,
        "[profiles] Tracing initialized"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TelemetryConfig::default();
        assert_eq!(config.log_level, "info");
        assert!(!config.json_logs);
    }

    #[test]
    fn test_bad_filter_rejected() {
        let config = TelemetryConfig {
            log_level: "profiles=notalevel".to_string(),
            json_logs: false,
        };
        assert!(matches!(init_tracing(&config), Err(RegistryError::Config(_))));
    }

    #[test]
    fn test_json_layer_builds() {
        let layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true);
        let subscriber = tracing_subscriber::registry()
            .with(EnvFilter::new("info"))
            .with(layer);
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(json = true, "[profiles] JSON layer active");
        });
    }

    #[test]
    fn test_second_init_fails() {
        let config = TelemetryConfig {
            log_level: "warn".to_string(),
            json_logs: false,
        };
        let _ = init_tracing(&config);
        assert!(init_tracing(&config).is_err());
    }
}
