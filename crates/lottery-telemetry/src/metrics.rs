//! Prometheus metrics for the draw engine.
//!
//! All metrics follow the naming convention: `ld_<noun>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: draws completed/skipped/failed, verifications, provider calls
//! - **Histogram**: locator round-trips per lookup, draw duration

use prometheus::{
    exponential_buckets, linear_buckets, Encoder, Histogram, HistogramOpts, IntCounter,
    IntCounterVec, Opts, Registry, TextEncoder,
};

use crate::TelemetryError;

/// Every draw-engine metric, registered in its own registry.
#[derive(Clone)]
pub struct DrawMetrics {
    registry: Registry,

    /// Draws committed
    pub draws_completed: IntCounter,

    /// Days skipped for lack of tickets
    pub draws_skipped: IntCounter,

    /// Failed attempts by reason
    pub draws_failed: IntCounterVec,

    /// Verifications by result (`valid`, `mismatch`, `error`)
    pub verifications: IntCounterVec,

    /// Chain-data provider calls by method, retries included
    pub provider_requests: IntCounterVec,

    /// Failed chain-data provider calls by method
    pub provider_errors: IntCounterVec,

    /// Provider round-trips per entropy-block lookup
    pub locator_round_trips: Histogram,

    /// Wall time of one draw attempt
    pub draw_duration: Histogram,
}

fn metric_err(e: prometheus::Error) -> TelemetryError {
    TelemetryError::MetricsInit(e.to_string())
}

impl DrawMetrics {
    /// Create and register all metrics.
    pub fn new() -> Result<Self, TelemetryError> {
        let registry = Registry::new();

        let draws_completed = IntCounter::new(
            "ld_draws_completed_total",
            "Total number of draws committed",
        )
        .map_err(metric_err)?;

        let draws_skipped = IntCounter::new(
            "ld_draws_skipped_total",
            "Total number of draw days skipped for lack of tickets",
        )
        .map_err(metric_err)?;

        let draws_failed = IntCounterVec::new(
            Opts::new("ld_draws_failed_total", "Failed draw attempts"),
            &["reason"],
        )
        .map_err(metric_err)?;

        let verifications = IntCounterVec::new(
            Opts::new("ld_verifications_total", "Draw verifications"),
            &["result"], // result: valid/mismatch/error
        )
        .map_err(metric_err)?;

        let provider_requests = IntCounterVec::new(
            Opts::new("ld_provider_requests_total", "Chain-data provider calls"),
            &["method"],
        )
        .map_err(metric_err)?;

        let provider_errors = IntCounterVec::new(
            Opts::new("ld_provider_errors_total", "Failed chain-data provider calls"),
            &["method"],
        )
        .map_err(metric_err)?;

        let locator_round_trips = Histogram::with_opts(
            HistogramOpts::new(
                "ld_locator_round_trips",
                "Provider round-trips per entropy-block lookup",
            )
            .buckets(linear_buckets(4.0, 4.0, 10).map_err(metric_err)?),
        )
        .map_err(metric_err)?;

        let draw_duration = Histogram::with_opts(
            HistogramOpts::new("ld_draw_duration_seconds", "Time spent on one draw attempt")
                .buckets(exponential_buckets(0.01, 2.0, 14).map_err(metric_err)?),
        )
        .map_err(metric_err)?;

        let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
            Box::new(draws_completed.clone()),
            Box::new(draws_skipped.clone()),
            Box::new(draws_failed.clone()),
            Box::new(verifications.clone()),
            Box::new(provider_requests.clone()),
            Box::new(provider_errors.clone()),
            Box::new(locator_round_trips.clone()),
            Box::new(draw_duration.clone()),
        ];
        for collector in collectors {
            registry.register(collector).map_err(metric_err)?;
        }

        Ok(Self {
            registry,
            draws_completed,
            draws_skipped,
            draws_failed,
            verifications,
            provider_requests,
            provider_errors,
            locator_round_trips,
            draw_duration,
        })
    }

    /// Registry holding every draw metric.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encode all metrics as Prometheus text format.
    pub fn encode(&self) -> Result<String, TelemetryError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(metric_err)?;
        String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
    }
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        self.histogram.observe(self.start.elapsed().as_secs_f64());
    }
}
