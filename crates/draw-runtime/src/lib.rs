//! # Draw Runtime Library
//!
//! Wires the draw subsystems into a running service. The main entry point is
//! the `main.rs` binary; the library is exposed for testing.
//!
//! ## Tasks
//!
//! ```text
//! ┌──────────────────┐   run_draw_for(today)   ┌──────────────────────┐
//! │  DrawScheduler   │ ──────────────────────→ │   DrawOrchestrator   │
//! └──────────────────┘                         └──────────┬───────────┘
//!                                                         │ locate
//! ┌──────────────────┐   verify_detailed       ┌──────────▼───────────┐
//! │   HTTP (axum)    │ ──────────────────────→ │ BlockTimeLocator     │
//! └──────────────────┘                         │  └ MeteredProvider   │
//!                                              └──────────────────────┘
//! ```
//!
//! Both tasks stop when the shutdown channel flips to `true`.

pub mod api;
pub mod config;
pub mod provider;
pub mod scheduler;

#[cfg(test)]
mod test_support;

pub use api::{router, ApiError, AppState};
pub use config::{ApiConfig, ChainConfig, ConfigError, RuntimeConfig, ScheduleConfig};
pub use provider::MeteredProvider;
pub use scheduler::{next_trigger_after, DayResult, DrawScheduler};

use std::net::SocketAddr;
use std::sync::Arc;

use ld_01_block_locator::{BlockTimeLocator, ChainDataProvider};
use ld_03_draw_orchestrator::{
    DrawDependencies, DrawOrchestrator, DrawRepository, DrawVerifier, InMemoryDrawRepository,
    InMemoryTicketStore, InMemoryUserLedger, TicketStore, UserLedger,
};
use lottery_telemetry::DrawMetrics;
use shared_types::TimeSource;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Runtime startup errors.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Failed to bind HTTP listener on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
}

/// Ticket, draw and points persistence used by the runtime.
#[derive(Clone)]
pub struct Stores {
    pub tickets: Arc<dyn TicketStore>,
    pub draws: Arc<dyn DrawRepository>,
    pub ledger: Arc<dyn UserLedger>,
}

impl Stores {
    /// Process-local stores; state is lost on restart.
    pub fn in_memory() -> Self {
        Self {
            tickets: Arc::new(InMemoryTicketStore::new()),
            draws: Arc::new(InMemoryDrawRepository::new()),
            ledger: Arc::new(InMemoryUserLedger::new()),
        }
    }
}

/// Running scheduler and HTTP server.
pub struct RuntimeHandles {
    /// Address the HTTP server is bound to.
    pub api_addr: SocketAddr,
    pub scheduler: JoinHandle<()>,
    pub server: JoinHandle<()>,
}

impl RuntimeHandles {
    /// Wait for both tasks to finish.
    pub async fn join(self) {
        if let Err(e) = self.scheduler.await {
            error!(error = %e, "Scheduler task panicked");
        }
        if let Err(e) = self.server.await {
            error!(error = %e, "HTTP server task panicked");
        }
    }
}

/// The draw service: scheduler plus query surface over one set of subsystems.
pub struct DrawRuntime {
    config: RuntimeConfig,
    state: AppState,
    scheduler: Arc<DrawScheduler>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl DrawRuntime {
    /// Wire the subsystems. Provider calls are metered before they reach
    /// the locator's retry loop.
    pub fn new(
        config: RuntimeConfig,
        provider: Arc<dyn ChainDataProvider>,
        stores: Stores,
        clock: Arc<dyn TimeSource>,
        metrics: DrawMetrics,
    ) -> Self {
        let metered = Arc::new(MeteredProvider::new(provider, metrics.clone()));
        let locator = Arc::new(BlockTimeLocator::new(config.locator.clone(), metered));

        let deps = DrawDependencies {
            locator,
            tickets: stores.tickets,
            draws: stores.draws,
            ledger: stores.ledger,
            clock: Arc::clone(&clock),
        };

        let orchestrator = Arc::new(DrawOrchestrator::new(config.draw.clone(), deps.clone()));
        let verifier = Arc::new(DrawVerifier::new(deps));

        let scheduler = Arc::new(DrawScheduler::new(
            orchestrator.clone(),
            Arc::clone(&clock),
            config.schedule.clone(),
            metrics.clone(),
        ));

        let state = AppState {
            lottery: orchestrator,
            verifier,
            metrics,
            clock,
        };

        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Self {
            config,
            state,
            scheduler,
            shutdown_tx,
            shutdown_rx,
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Handler state, for mounting the routes elsewhere.
    pub fn app_state(&self) -> AppState {
        self.state.clone()
    }

    /// Bind the HTTP listener and spawn the scheduler and the server.
    pub async fn start(&self) -> Result<RuntimeHandles, RuntimeError> {
        info!("===========================================");
        info!("  Lottery Draw Runtime v{}", VERSION);
        info!("===========================================");

        let addr = self.config.api.listen_addr;
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|source| RuntimeError::Bind { addr, source })?;
        let api_addr = listener
            .local_addr()
            .map_err(|source| RuntimeError::Bind { addr, source })?;
        info!(addr = %api_addr, "[api] HTTP query surface listening");

        let scheduler = Arc::clone(&self.scheduler);
        let shutdown = self.shutdown_rx.clone();
        let scheduler = tokio::spawn(async move { scheduler.run(shutdown).await });

        let app = router(self.app_state());
        let mut shutdown = self.shutdown_rx.clone();
        let server = tokio::spawn(async move {
            let result = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown.changed().await;
                    info!("[api] Shutdown signal received");
                })
                .await;
            if let Err(e) = result {
                error!(error = %e, "[api] HTTP server error");
            }
        });

        Ok(RuntimeHandles {
            api_addr,
            scheduler,
            server,
        })
    }

    /// Signal every task to stop.
    pub fn shutdown(&self) {
        info!("Initiating graceful shutdown...");
        let _ = self.shutdown_tx.send(true);
    }
}
