//! # Inbound Ports
//!
//! API trait defining what the Block Time Locator can do.

use async_trait::async_trait;
use shared_types::Timestamp;

use crate::domain::{LocatedBlock, LocatorError};

/// Block Time Locator API - inbound port.
#[async_trait]
pub trait BlockTimeLocatorApi: Send + Sync {
    /// Find the lowest block whose timestamp is at or after `target`.
    ///
    /// Never substitutes another block: a chain tip older than `target`
    /// is `NoBlockAfterTarget`.
    async fn locate(&self, target: Timestamp) -> Result<LocatedBlock, LocatorError>;
}
