//! # HTTP Query Surface
//!
//! Read-only lottery projections plus ticket issuance.
//!
//! | Route | Operation |
//! |-------|-----------|
//! | `GET /health` | liveness |
//! | `GET /lottery/today` | today's draw summary |
//! | `GET /lottery/draws?date=YYYY-MM-DD` | draw for a date (today when omitted) |
//! | `GET /lottery/tickets/:user` | all tickets of a user |
//! | `POST /lottery/tickets/:user` | issue a ticket for the next draw |
//! | `GET /lottery/tickets/:user/active` | tickets still waiting for a draw |
//! | `GET /lottery/verify/:draw` | re-derive a recorded draw |
//! | `GET /metrics` | Prometheus text format |

mod error;
mod handlers;

pub use error::ApiError;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use ld_03_draw_orchestrator::{DrawVerifierApi, LotteryApi};
use lottery_telemetry::DrawMetrics;
use shared_types::TimeSource;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub lottery: Arc<dyn LotteryApi>,
    pub verifier: Arc<dyn DrawVerifierApi>,
    pub metrics: DrawMetrics,
    pub clock: Arc<dyn TimeSource>,
}

/// Build the router for the query surface.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/lottery/today", get(handlers::today_draw))
        .route("/lottery/draws", get(handlers::draw_for_date))
        .route(
            "/lottery/tickets/:user",
            get(handlers::tickets_for_user).post(handlers::create_ticket),
        )
        .route(
            "/lottery/tickets/:user/active",
            get(handlers::active_tickets_for_user),
        )
        .route("/lottery/verify/:draw", get(handlers::verify_draw))
        .route("/metrics", get(handlers::metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
