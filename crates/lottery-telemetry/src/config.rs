//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Service name attached to the startup log line
    pub service_name: String,

    /// `EnvFilter` directive (e.g. `info`, `ld_03_draw_orchestrator=debug`)
    pub log_level: String,

    /// Emit JSON lines instead of human-readable output
    pub json_logs: bool,

    /// Include source file and line in each record
    pub with_source_location: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "lottery-draw".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            with_source_location: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `LD_SERVICE_NAME`: Service name (default: lottery-draw)
    /// - `LD_LOG_LEVEL` or `RUST_LOG`: Log filter (default: info)
    /// - `LD_JSON_LOGS`: JSON output (default: false in dev, true in containers)
    /// - `LD_LOG_SOURCE`: Include file/line (default: same as JSON output)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let is_container =
            lookup("KUBERNETES_SERVICE_HOST").is_some() || lookup("DOCKER_CONTAINER").is_some();

        let json_logs = lookup("LD_JSON_LOGS")
            .map(|v| parse_flag(&v))
            .unwrap_or(is_container);

        Self {
            service_name: lookup("LD_SERVICE_NAME").unwrap_or_else(|| "lottery-draw".to_string()),

            log_level: lookup("LD_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or_else(|| "info".to_string()),

            json_logs,

            with_source_location: lookup("LD_LOG_SOURCE")
                .map(|v| parse_flag(&v))
                .unwrap_or(json_logs),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value == "1"
}
