//! # Lottery Draw Runtime
//!
//! Runs the daily draw against an Ethereum JSON-RPC endpoint and serves the
//! lottery query routes.
//!
//! ```text
//! LD_RPC_URL=https://mainnet.example.org LD_API_ADDR=0.0.0.0:8080 draw-runtime
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use draw_runtime::{DrawRuntime, RuntimeConfig, Stores};
use ld_01_block_locator::JsonRpcChainProvider;
use lottery_telemetry::{init_telemetry, TelemetryConfig};
use shared_types::SystemTimeSource;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let telemetry = TelemetryConfig::from_env();
    let metrics = init_telemetry(&telemetry).context("failed to initialize telemetry")?;

    let config = RuntimeConfig::from_env();
    config.validate().context("invalid runtime configuration")?;

    let provider = Arc::new(
        JsonRpcChainProvider::new(config.chain.rpc_url.clone(), config.chain.request_timeout())
            .context("failed to build JSON-RPC client")?,
    );

    warn!("Using in-memory ticket, draw and points stores; state is lost on restart");

    let runtime = DrawRuntime::new(
        config,
        provider,
        Stores::in_memory(),
        Arc::new(SystemTimeSource),
        metrics,
    );
    let handles = runtime.start().await.context("failed to start draw runtime")?;

    info!(api = %handles.api_addr, "Draw runtime is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl+C")?;

    runtime.shutdown();
    handles.join().await;
    info!("Draw runtime stopped");

    Ok(())
}
