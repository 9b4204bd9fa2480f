//! # Lottery Telemetry
//!
//! Logging and metrics shared by the draw runtime.
//!
//! ## Components
//!
//! - **Logging**: `tracing-subscriber` registry with an `EnvFilter` and a
//!   human-readable or JSON formatter
//! - **Metrics**: Prometheus counters and histograms for draws,
//!   verifications and provider calls
//!
//! ## Usage
//!
//! ```rust,ignore
//! use lottery_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let metrics = init_telemetry(&TelemetryConfig::from_env())?;
//!     // ... hand `metrics` to the runtime
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `LD_SERVICE_NAME` | `lottery-draw` | Service name |
//! | `LD_LOG_LEVEL` | `info` | Log filter (falls back to `RUST_LOG`) |
//! | `LD_JSON_LOGS` | `false` (`true` in containers) | JSON output |
//! | `LD_LOG_SOURCE` | same as `LD_JSON_LOGS` | File/line in records |

#![warn(missing_docs)]

mod config;
mod logging;
mod metrics;

pub use config::TelemetryConfig;
pub use logging::{build_filter, init_logging};
pub use metrics::{DrawMetrics, HistogramTimer};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The global subscriber could not be installed
    #[error("Failed to initialize tracing subscriber: {0}")]
    SubscriberInit(String),

    /// A metric could not be created, registered or encoded
    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and create the metric set.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<DrawMetrics, TelemetryError> {
    // Metrics first: they need no global state
    let metrics = DrawMetrics::new()?;
    init_logging(config)?;
    Ok(metrics)
}
