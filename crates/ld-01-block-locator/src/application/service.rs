//! # Block Time Locator Service
//!
//! Binds a chain-data provider to the block search. Read-only against the
//! remote chain.

use std::sync::Arc;

use async_trait::async_trait;
use shared_types::Timestamp;

use crate::algorithms::find_first_block_at_or_after;
use crate::config::LocatorConfig;
use crate::domain::{LocatedBlock, LocatorError};
use crate::ports::{BlockTimeLocatorApi, ChainDataProvider};

/// Block Time Locator - finds the entropy block for a target instant.
pub struct BlockTimeLocator<P: ChainDataProvider + ?Sized> {
    /// Configuration.
    config: LocatorConfig,
    /// Remote chain.
    provider: Arc<P>,
}

impl<P: ChainDataProvider + ?Sized> BlockTimeLocator<P> {
    /// Create a new locator.
    pub fn new(config: LocatorConfig, provider: Arc<P>) -> Self {
        Self { config, provider }
    }

    /// The underlying provider.
    pub fn provider(&self) -> &Arc<P> {
        &self.provider
    }
}

#[async_trait]
impl<P: ChainDataProvider + ?Sized + 'static> BlockTimeLocatorApi for BlockTimeLocator<P> {
    async fn locate(&self, target: Timestamp) -> Result<LocatedBlock, LocatorError> {
        tracing::debug!(target, provider = self.provider.provider_id(), "Locating entropy block");

        let result = find_first_block_at_or_after(self.provider.as_ref(), target, &self.config.retry).await;

        match &result {
            Ok(block) => tracing::info!(
                target,
                block_number = block.number,
                block_hash = %block.hash,
                round_trips = block.round_trips,
                "Entropy block located"
            ),
            Err(e) => tracing::warn!(target, error = %e, "Entropy block lookup failed"),
        }

        result
    }
}
