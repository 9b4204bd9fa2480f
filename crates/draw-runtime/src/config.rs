//! # Runtime Configuration
//!
//! Unified configuration for the subsystems and the runtime's own loops.
//!
//! ## Environment Overrides
//!
//! | Variable | Field |
//! |----------|-------|
//! | `LD_RPC_URL` (fallback `INFURA_URL`) | `chain.rpc_url` |
//! | `LD_RPC_TIMEOUT_SECS` | `chain.request_timeout_secs` |
//! | `LD_WINNING_REWARD` | `draw.winning_reward` |
//! | `LD_TRIGGER_OFFSET_SECS` | `schedule.trigger_offset_secs` |
//! | `LD_RETRY_INTERVAL_SECS` | `schedule.retry_interval_secs` |
//! | `LD_MAX_ATTEMPTS_PER_DAY` | `schedule.max_attempts_per_day` |
//! | `LD_API_ADDR` | `api.listen_addr` |
//!
//! Values that fail to parse are logged and ignored.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use ld_01_block_locator::LocatorConfig;
use ld_03_draw_orchestrator::DrawConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Complete runtime configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Chain-data provider endpoint.
    pub chain: ChainConfig,
    /// Block locator retry policy.
    pub locator: LocatorConfig,
    /// Draw parameters.
    pub draw: DrawConfig,
    /// Daily trigger and retry budget.
    pub schedule: ScheduleConfig,
    /// HTTP query surface.
    pub api: ApiConfig,
}

/// Chain-data provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: String::new(),
            request_timeout_secs: 10,
        }
    }
}

impl ChainConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Daily scheduler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Delay after UTC midnight before the draw runs, so the first block
    /// after midnight has been produced and propagated.
    pub trigger_offset_secs: u64,
    /// Pause between attempts after a transient failure.
    pub retry_interval_secs: u64,
    /// Attempts per day before giving up until the next trigger.
    pub max_attempts_per_day: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            trigger_offset_secs: 60,
            retry_interval_secs: 300,
            max_attempts_per_day: 12,
        }
    }
}

impl ScheduleConfig {
    pub fn trigger_offset(&self) -> Duration {
        Duration::from_secs(self.trigger_offset_secs)
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.retry_interval_secs)
    }

    /// Create a config for testing (no waiting).
    pub fn for_testing() -> Self {
        Self {
            trigger_offset_secs: 0,
            retry_interval_secs: 0,
            max_attempts_per_day: 3,
        }
    }
}

/// HTTP query surface configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Listen address.
    pub listen_addr: SocketAddr,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// No chain-data endpoint configured.
    #[error("No RPC endpoint configured. Set LD_RPC_URL (or INFURA_URL).")]
    MissingRpcUrl,

    /// A zero attempt budget would never run a draw.
    #[error("schedule.max_attempts_per_day must be at least 1")]
    ZeroAttempts,
}

impl RuntimeConfig {
    /// Defaults overridden from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("LD_RPC_URL").or_else(|| lookup("INFURA_URL")) {
            config.chain.rpc_url = url;
        }
        override_parsed(&lookup, "LD_RPC_TIMEOUT_SECS", &mut config.chain.request_timeout_secs);
        override_parsed(&lookup, "LD_WINNING_REWARD", &mut config.draw.winning_reward);
        override_parsed(
            &lookup,
            "LD_TRIGGER_OFFSET_SECS",
            &mut config.schedule.trigger_offset_secs,
        );
        override_parsed(
            &lookup,
            "LD_RETRY_INTERVAL_SECS",
            &mut config.schedule.retry_interval_secs,
        );
        override_parsed(
            &lookup,
            "LD_MAX_ATTEMPTS_PER_DAY",
            &mut config.schedule.max_attempts_per_day,
        );
        override_parsed(&lookup, "LD_API_ADDR", &mut config.api.listen_addr);

        config
    }

    /// Reject configurations the runtime cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chain.rpc_url.trim().is_empty() {
            return Err(ConfigError::MissingRpcUrl);
        }
        if self.schedule.max_attempts_per_day == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        Ok(())
    }
}

fn override_parsed<F, T>(lookup: &F, key: &str, target: &mut T)
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let Some(raw) = lookup(key) else {
        return;
    };
    match raw.trim().parse() {
        Ok(value) => *target = value,
        Err(_) => warn!(variable = key, value = %raw, "Ignoring invalid configuration value"),
    }
}
