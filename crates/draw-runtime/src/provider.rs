//! Metered chain-data provider.
//!
//! Wraps any `ChainDataProvider` and counts calls and failures per JSON-RPC
//! method. Retries happen above this layer, so every attempt is counted.

use std::sync::Arc;

use async_trait::async_trait;
use ld_01_block_locator::{ChainDataProvider, ProviderError};
use lottery_telemetry::DrawMetrics;
use shared_types::BlockSummary;

const LATEST_BLOCK_METHOD: &str = "eth_blockNumber";
const BLOCK_METHOD: &str = "eth_getBlockByNumber";

/// `ChainDataProvider` decorator recording Prometheus counters.
pub struct MeteredProvider<P: ChainDataProvider + ?Sized> {
    inner: Arc<P>,
    metrics: DrawMetrics,
}

impl<P: ChainDataProvider + ?Sized> MeteredProvider<P> {
    pub fn new(inner: Arc<P>, metrics: DrawMetrics) -> Self {
        Self { inner, metrics }
    }

    fn record<T>(&self, method: &str, result: &Result<T, ProviderError>) {
        self.metrics
            .provider_requests
            .with_label_values(&[method])
            .inc();
        if let Err(e) = result {
            self.metrics.provider_errors.with_label_values(&[method]).inc();
            tracing::warn!(method, error = %e, "Provider call failed");
        }
    }
}

#[async_trait]
impl<P: ChainDataProvider + ?Sized> ChainDataProvider for MeteredProvider<P> {
    async fn latest_block_number(&self) -> Result<u64, ProviderError> {
        let result = self.inner.latest_block_number().await;
        self.record(LATEST_BLOCK_METHOD, &result);
        result
    }

    async fn block(&self, number: u64) -> Result<Option<BlockSummary>, ProviderError> {
        let result = self.inner.block(number).await;
        self.record(BLOCK_METHOD, &result);
        result
    }

    fn provider_id(&self) -> &str {
        self.inner.provider_id()
    }
}
